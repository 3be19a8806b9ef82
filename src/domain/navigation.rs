/// Guard navigation: greedy per-axis stepping, gated by a move cadence.
///
/// Per state:
///   - **Patrol**: walk the cyclic waypoint route. A waypoint counts as
///     reached within Chebyshev distance 1.
///   - **Suspicious**: stand still, turn toward the last known position.
///   - **Alert**: pursue the last known position.
///   - **Combat**: nothing; the session owns the fight.
///
/// Stepping tries the combined (diagonal) step first, then horizontal only,
/// then vertical only. No pathfinding: a guard can wedge itself behind a
/// wall, which is the intended "dumb guard" feel.

use std::time::Duration;

use crate::sim::world::Level;

use super::entity::{AlertState, Guard};
use super::geometry::{Facing, Pos};

/// Next tile from `from` toward `target`, or `None` if every candidate is
/// blocked (or `from == target`).
pub fn greedy_step(level: &Level, from: Pos, target: Pos) -> Option<Pos> {
    let sx = (target.x - from.x).signum();
    let sy = (target.y - from.y).signum();
    if sx == 0 && sy == 0 { return None; }

    let mut candidates: Vec<(i32, i32)> = Vec::with_capacity(3);
    candidates.push((sx, sy));
    if sx != 0 && sy != 0 {
        candidates.push((sx, 0));
        candidates.push((0, sy));
    }

    candidates
        .into_iter()
        .map(|(dx, dy)| from.offset(dx, dy))
        .find(|&p| level.passable_at(p))
}

/// Apply one tick of movement. Returns the new position if the guard moved.
pub fn advance(guard: &mut Guard, level: &Level, dt: Duration) -> Option<Pos> {
    if !guard.alive { return None; }

    match guard.state {
        AlertState::Combat => None,
        AlertState::Suspicious => {
            if let Some(facing) = guard.last_known_player.and_then(|t| Facing::toward(guard.pos, t)) {
                guard.facing = facing;
            }
            None
        }
        AlertState::Patrol | AlertState::Alert => {
            guard.move_timer += dt;
            if guard.move_timer < guard.move_interval { return None; }
            guard.move_timer = Duration::ZERO;

            let target = match guard.state {
                AlertState::Patrol => guard.current_waypoint()?,
                _ => guard.last_known_player?,
            };
            let moved = step_toward(guard, level, target);

            if guard.state == AlertState::Patrol && guard.pos.chebyshev(target) <= 1 {
                guard.advance_waypoint();
            }
            moved
        }
    }
}

fn step_toward(guard: &mut Guard, level: &Level, target: Pos) -> Option<Pos> {
    let next = greedy_step(level, guard.pos, target)?;
    if let Some(facing) = Facing::toward(guard.pos, target) {
        guard.facing = facing;
    }
    guard.pos = next;
    Some(next)
}
