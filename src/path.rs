//! A* pathfinding over grid points.
//!
//! Neighbor, cost, and heuristic functions are supplied by the caller, so
//! the AI can price occupied tiles without this module knowing about
//! entities. "No path" is an absent result, never an error.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use crate::ecs::Point;

/// Shortest path from `start` to `goal`, inclusive of both endpoints.
///
/// `cost(from, to)` must be at least 1 and `heuristic` must never
/// overestimate the remaining cost, or the result may not be optimal.
/// Returns `None` when the goal is unreachable; `Some(vec![start])` when
/// the goal is the start.
pub fn astar<N, C, H>(
    start: Point,
    goal: Point,
    mut neighbors: N,
    mut cost: C,
    mut heuristic: H,
) -> Option<Vec<Point>>
where
    N: FnMut(Point) -> Vec<Point>,
    C: FnMut(Point, Point) -> i32,
    H: FnMut(Point, Point) -> i32,
{
    if start == goal {
        return Some(vec![start]);
    }

    // Min-heap on (f, point); the point in the key makes tie-breaking
    // deterministic.
    let mut open = BinaryHeap::new();
    let mut g_score: FxHashMap<Point, i32> = FxHashMap::default();
    let mut came_from: FxHashMap<Point, Point> = FxHashMap::default();

    g_score.insert(start, 0);
    open.push(Reverse((heuristic(start, goal), start)));

    while let Some(Reverse((f, current))) = open.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        let g = g_score[&current];
        if f > g + heuristic(current, goal) {
            // Stale heap entry; a cheaper route to `current` already ran.
            continue;
        }
        for next in neighbors(current) {
            let tentative = g + cost(current, next);
            if g_score.get(&next).is_none_or(|&known| tentative < known) {
                g_score.insert(next, tentative);
                came_from.insert(next, current);
                open.push(Reverse((tentative + heuristic(next, goal), next)));
            }
        }
    }
    None
}

fn reconstruct(came_from: &FxHashMap<Point, Point>, start: Point, goal: Point) -> Vec<Point> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        current = came_from[&current];
        path.push(current);
    }
    path.reverse();
    path
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DIRS_8;
    use crate::map::Map;

    fn walk(map: &Map, start: Point, goal: Point) -> Option<Vec<Point>> {
        astar(
            start,
            goal,
            |p| {
                DIRS_8
                    .iter()
                    .map(|&d| p + d)
                    .filter(|&q| map.walkable(q))
                    .collect()
            },
            |_, _| 1,
            |p, q| p.chebyshev(q),
        )
    }

    #[test]
    fn start_equals_goal_is_a_single_point() {
        let map = Map::from_rows(&["..."]);
        let p = Point::new(1, 0);
        assert_eq!(walk(&map, p, p), Some(vec![p]));
    }

    #[test]
    fn path_spans_start_to_goal_in_adjacent_steps() {
        let map = Map::from_rows(&[
            ".....", //
            ".....", //
            ".....",
        ]);
        let start = Point::new(0, 0);
        let goal = Point::new(4, 2);
        let path = walk(&map, start, goal).expect("open field");
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for pair in path.windows(2) {
            assert_eq!(pair[0].chebyshev(pair[1]), 1, "non-adjacent step");
        }
        // Diagonal moves make this 4 steps, 5 points.
        assert_eq!(path.len(), 5);
    }

    #[test]
    fn routes_around_a_wall() {
        let map = Map::from_rows(&[
            ".#.", //
            ".#.", //
            "...",
        ]);
        let path = walk(&map, Point::new(0, 0), Point::new(2, 0)).expect("detour exists");
        assert_eq!(path.last(), Some(&Point::new(2, 0)));
        assert!(path.contains(&Point::new(1, 2)), "must pass under the wall");
    }

    #[test]
    fn unreachable_goal_is_none() {
        let map = Map::from_rows(&[
            ".#.", //
            ".#.", //
            ".#.",
        ]);
        assert_eq!(walk(&map, Point::new(0, 1), Point::new(2, 1)), None);
    }

    #[test]
    fn expensive_tiles_are_avoided_when_a_detour_exists() {
        let map = Map::from_rows(&[
            "...", //
            "...", //
            "...",
        ]);
        let pricey = Point::new(1, 1);
        let path = astar(
            Point::new(0, 1),
            Point::new(2, 1),
            |p| {
                DIRS_8
                    .iter()
                    .map(|&d| p + d)
                    .filter(|&q| map.walkable(q))
                    .collect()
            },
            |_, q| if q == pricey { 8 } else { 1 },
            |p, q| p.chebyshev(q),
        )
        .expect("open field");
        assert!(!path.contains(&pricey));
        assert_eq!(path.last(), Some(&Point::new(2, 1)));
    }

    #[test]
    fn expensive_tiles_are_crossed_when_there_is_no_other_way() {
        let map = Map::from_rows(&[
            "###", //
            "...", //
            "###",
        ]);
        let pricey = Point::new(1, 1);
        let path = astar(
            Point::new(0, 1),
            Point::new(2, 1),
            |p| {
                DIRS_8
                    .iter()
                    .map(|&d| p + d)
                    .filter(|&q| map.walkable(q))
                    .collect()
            },
            |_, q| if q == pricey { 8 } else { 1 },
            |p, q| p.chebyshev(q),
        )
        .expect("corridor is passable");
        assert!(path.contains(&pricey), "soft repulsion must not forbid");
    }
}
