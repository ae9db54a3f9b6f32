//! Frame-based animation, advanced on a real-time clock.
//!
//! This system is driven by the presentation layer's timer subscription,
//! never by the turn pipeline: animations keep playing while the game sits
//! waiting for input.

use crate::ecs::components::Animation;
use crate::ecs::{EntityId, Registry};

pub fn update(registry: &mut Registry, entity: EntityId) {
    let mut finished = false;
    {
        let Some(anim) = registry.get_mut::<Animation>(entity) else {
            return;
        };
        if anim.frames.is_empty() {
            return;
        }
        anim.elapsed += 1;
        if anim.elapsed < anim.frames[anim.index].ticks {
            return;
        }
        anim.elapsed = 0;
        anim.index += 1;
        if anim.index >= anim.frames.len() {
            anim.index = 0;
            match anim.repeat {
                0 => finished = true,
                n if n > 0 => anim.repeat = n - 1,
                // Negative repeat loops forever.
                _ => {}
            }
        }
    }
    if finished {
        registry.delete(entity);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
