/// Perception model: can a guard see the player right now?
///
/// ## Checks (in order)
///
///   0. Dead guard or off-map endpoint → never.
///   1. Adjacency (Chebyshev ≤ 1) → always. Short-circuits everything below.
///   2. Range: Euclidean distance must not exceed `vision_range`.
///   3. Cover: a cover tile beside the player, on the side facing the guard,
///      hides the player.
///   4. Cone: dot(facing, to_player), both normalized, must be ≥ 0.4.
///   5. Line of sight: Bresenham ray, every intermediate tile transparent.
///
/// 2–5 are ANDed.

use crate::config::PerceptionTuning;
use crate::sim::world::Level;

use super::entity::Guard;
use super::geometry::{bresenham, Pos};

const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

pub fn can_perceive(guard: &Guard, player: Pos, level: &Level, tuning: &PerceptionTuning) -> bool {
    if !guard.alive { return false; }
    if !level.in_bounds(guard.pos) || !level.in_bounds(player) { return false; }

    if guard.pos.chebyshev(player) <= tuning.adjacency_range { return true; }

    in_range(guard, player)
        && !behind_cover(guard.pos, player, level)
        && in_cone(guard, player, tuning.cone_threshold)
        && line_of_sight(level, guard.pos, player)
}

/// Tiles a guard could see, for overlay rendering. Applies range, cone and
/// line of sight; cover depends on where the player stands and is skipped.
pub fn vision_cone_tiles(guard: &Guard, level: &Level, tuning: &PerceptionTuning) -> Vec<Pos> {
    if !guard.alive || !level.in_bounds(guard.pos) { return vec![]; }

    let reach = guard.vision_range.max(0.0).ceil() as i32;
    let mut tiles = Vec::new();
    for y in (guard.pos.y - reach)..=(guard.pos.y + reach) {
        for x in (guard.pos.x - reach)..=(guard.pos.x + reach) {
            let p = Pos::new(x, y);
            if p == guard.pos || !level.in_bounds(p) { continue; }
            if in_range(guard, p)
                && in_cone(guard, p, tuning.cone_threshold)
                && line_of_sight(level, guard.pos, p)
            {
                tiles.push(p);
            }
        }
    }
    tiles
}

/// Unobstructed ray between two tiles. Endpoints themselves are not tested.
pub fn line_of_sight(level: &Level, from: Pos, to: Pos) -> bool {
    let line = bresenham(from, to);
    if line.len() <= 2 { return true; }
    line[1..line.len() - 1].iter().all(|&p| level.transparent_at(p))
}

fn in_range(guard: &Guard, target: Pos) -> bool {
    guard.pos.euclidean(target) <= guard.vision_range
}

/// Is there a cover tile next to `player` on the side facing `viewer`?
fn behind_cover(viewer: Pos, player: Pos, level: &Level) -> bool {
    let vx = viewer.x - player.x;
    let vy = viewer.y - player.y;
    CARDINALS.iter().any(|&(dx, dy)| {
        dx * vx + dy * vy > 0 && level.cover_at(player.offset(dx, dy))
    })
}

fn in_cone(guard: &Guard, target: Pos, threshold: f32) -> bool {
    let (fx, fy) = guard.facing.vector();
    let (fx, fy) = (fx as f32, fy as f32);
    let tx = (target.x - guard.pos.x) as f32;
    let ty = (target.y - guard.pos.y) as f32;
    let f_len = (fx * fx + fy * fy).sqrt();
    let t_len = (tx * tx + ty * ty).sqrt();
    if f_len == 0.0 || t_len == 0.0 { return false; }
    (fx * tx + fy * ty) / (f_len * t_len) >= threshold
}
