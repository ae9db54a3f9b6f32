//! Shadowcasting visibility.
//!
//! Shared by the perception system (which tracks entities) and the
//! exploration system (which tracks terrain). The scan covers a square
//! window of the given radius, so every returned point is within Chebyshev
//! distance `radius` of the origin — the distance metric used throughout,
//! matching 8-directional movement.

use rustc_hash::FxHashSet;

use crate::ecs::Point;

/// Octant transforms: rows of (xx, xy, yx, yy) mapping scan-space (dx, dy)
/// into map space.
const OCTANTS: [[i32; 4]; 8] = [
    [1, 0, 0, 1],
    [0, 1, 1, 0],
    [0, -1, 1, 0],
    [-1, 0, 0, 1],
    [-1, 0, 0, -1],
    [0, -1, -1, 0],
    [0, 1, -1, 0],
    [1, 0, 0, -1],
];

/// Compute the set of points visible from `origin` out to `radius`.
///
/// `passable` decides what sight passes through; callers use "in bounds and
/// not a wall". Blocking cells are themselves visible (you can see a wall),
/// and points the predicate rejects can appear in the result — callers that
/// care should clip to their own domain. The origin is always visible.
pub fn shadowcast<F>(origin: Point, radius: i32, passable: F) -> FxHashSet<Point>
where
    F: Fn(Point) -> bool,
{
    let mut visible = FxHashSet::default();
    visible.insert(origin);
    if radius <= 0 {
        return visible;
    }
    for oct in &OCTANTS {
        cast_octant(&mut visible, origin, radius, 1, 1.0, 0.0, oct, &passable);
    }
    visible
}

/// Recursive scan of one octant between the `start` and `end` slopes.
#[allow(clippy::too_many_arguments)]
fn cast_octant<F>(
    visible: &mut FxHashSet<Point>,
    origin: Point,
    radius: i32,
    row: i32,
    mut start: f64,
    end: f64,
    oct: &[i32; 4],
    passable: &F,
) where
    F: Fn(Point) -> bool,
{
    if start < end {
        return;
    }
    let mut next_start = start;
    for j in row..=radius {
        let dy = -j;
        let mut blocked = false;
        for dx in -j..=0 {
            // Slopes of the cell's left and right extremities.
            let l_slope = (dx as f64 - 0.5) / (dy as f64 + 0.5);
            let r_slope = (dx as f64 + 0.5) / (dy as f64 - 0.5);
            if start < r_slope {
                continue;
            }
            if end > l_slope {
                break;
            }

            let p = Point::new(
                origin.x + dx * oct[0] + dy * oct[1],
                origin.y + dx * oct[2] + dy * oct[3],
            );
            visible.insert(p);

            if blocked {
                if !passable(p) {
                    next_start = r_slope;
                } else {
                    blocked = false;
                    start = next_start;
                }
            } else if !passable(p) && j < radius {
                // Entering shadow: scan the rest of this wedge in a child,
                // then continue past the blocker with a narrowed start.
                blocked = true;
                cast_octant(visible, origin, radius, j + 1, start, l_slope, oct, passable);
                next_start = r_slope;
            }
        }
        if blocked {
            break;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
