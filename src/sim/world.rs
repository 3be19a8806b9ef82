/// Level and Roster: the static map and the guards that live on it.
///
/// ## Level
///
/// Produced once by the compiler and treated as immutable afterwards, with
/// two exceptions owned by the session:
///   - objective completion flags (`complete_objective`)
///   - barrel consumption (`remove_barrel`, the player climbing inside)
///
/// Neither is visible to guards: barrels never block sight, and a removed
/// barrel leaves plain floor behind.
///
/// ## Roster
///
/// An arena of guards addressed by `GuardId`. Guards are never removed or
/// reordered; a dead guard is marked inert and skipped by every pass.

use crate::domain::entity::{Guard, GuardId, GuardSpawn, Objective};
use crate::domain::geometry::Pos;
use crate::domain::tile::Tile;

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    pub name: String,
    pub template_id: String,
    pub seed: u64,
    pub tiles: Vec<Vec<Tile>>,
    pub width: usize,
    pub height: usize,
    pub spawn_point: Pos,
    pub exit_point: Pos,
    pub objectives: Vec<Objective>,
    pub guard_spawns: Vec<GuardSpawn>,
}

// ── Tile queries (out of bounds = no interaction) ──

impl Level {
    #[inline]
    pub fn in_bounds(&self, p: Pos) -> bool {
        p.x >= 0 && p.y >= 0 && (p.x as usize) < self.width && (p.y as usize) < self.height
    }

    #[inline]
    pub fn tile_at(&self, p: Pos) -> Option<Tile> {
        if !self.in_bounds(p) { return None; }
        self.tiles.get(p.y as usize)?.get(p.x as usize).copied()
    }

    pub fn passable_at(&self, p: Pos) -> bool {
        self.tile_at(p).is_some_and(Tile::passable)
    }

    pub fn transparent_at(&self, p: Pos) -> bool {
        self.tile_at(p).is_some_and(Tile::transparent)
    }

    pub fn cover_at(&self, p: Pos) -> bool {
        self.tile_at(p).is_some_and(Tile::cover)
    }

    pub fn is_exit(&self, p: Pos) -> bool {
        p == self.exit_point
    }

    pub(crate) fn set_tile(&mut self, p: Pos, tile: Tile) {
        if self.in_bounds(p) {
            self.tiles[p.y as usize][p.x as usize] = tile;
        }
    }
}

// ── Session-owned mutations ──

impl Level {
    /// Mark an objective done. Returns false for an unknown index or one
    /// that was already completed.
    pub fn complete_objective(&mut self, index: usize) -> bool {
        match self.objectives.get_mut(index) {
            Some(obj) if !obj.completed => {
                obj.completed = true;
                true
            }
            _ => false,
        }
    }

    pub fn objectives_remaining(&self) -> usize {
        self.objectives.iter().filter(|o| !o.completed).count()
    }

    /// The player climbs into a barrel: the tile becomes floor.
    /// Returns false if there is no barrel at `p`.
    pub fn remove_barrel(&mut self, p: Pos) -> bool {
        if self.tile_at(p) != Some(Tile::Barrel) { return false; }
        self.set_tile(p, Tile::Floor);
        true
    }

    /// Text dump of the map with guard spawns overlaid as `G`.
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for (y, row) in self.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let here = Pos::new(x as i32, y as i32);
                if self.guard_spawns.iter().any(|g| g.pos == here) {
                    out.push('G');
                } else {
                    out.push(tile.glyph());
                }
            }
            out.push('\n');
        }
        out
    }
}

// ── Roster ──

#[derive(Clone, Debug, Default)]
pub struct Roster {
    guards: Vec<Guard>,
}

impl Roster {
    pub fn new(guards: Vec<Guard>) -> Self {
        Roster { guards }
    }

    /// Runtime guards for every spawn, with type templates applied.
    pub fn from_spawns(spawns: &[GuardSpawn]) -> Self {
        Roster { guards: spawns.iter().map(Guard::from_spawn).collect() }
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn get(&self, id: GuardId) -> Option<&Guard> {
        self.guards.get(id.0)
    }

    pub fn get_mut(&mut self, id: GuardId) -> Option<&mut Guard> {
        self.guards.get_mut(id.0)
    }

    pub fn ids(&self) -> impl Iterator<Item = GuardId> {
        (0..self.guards.len()).map(GuardId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GuardId, &Guard)> {
        self.guards.iter().enumerate().map(|(i, g)| (GuardId(i), g))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (GuardId, &mut Guard)> {
        self.guards.iter_mut().enumerate().map(|(i, g)| (GuardId(i), g))
    }

    pub fn living(&self) -> impl Iterator<Item = (GuardId, &Guard)> {
        self.iter().filter(|(_, g)| g.alive)
    }

    /// External combat outcome: the guard becomes inert. Never removes it.
    pub fn mark_dead(&mut self, id: GuardId) -> bool {
        match self.guards.get_mut(id.0) {
            Some(g) if g.alive => {
                g.alive = false;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{AlertState, GuardType};
    use crate::domain::geometry::Facing;

    fn tiny_level() -> Level {
        let rows = ["#####", "#.B.#", "#####"];
        let tiles: Vec<Vec<Tile>> = rows
            .iter()
            .map(|r| r.chars().map(Tile::from_legend).collect())
            .collect();
        Level {
            name: "tiny".into(),
            template_id: "tiny".into(),
            seed: 0,
            width: 5,
            height: 3,
            tiles,
            spawn_point: Pos::new(1, 1),
            exit_point: Pos::new(3, 1),
            objectives: vec![Objective { pos: Pos::new(3, 1), label: "ledger".into(), completed: false }],
            guard_spawns: vec![],
        }
    }

    #[test]
    fn out_of_bounds_is_no_interaction() {
        let level = tiny_level();
        for p in [Pos::new(-1, 0), Pos::new(0, -1), Pos::new(5, 1), Pos::new(1, 3)] {
            assert_eq!(level.tile_at(p), None);
            assert!(!level.passable_at(p));
            assert!(!level.transparent_at(p));
            assert!(!level.cover_at(p));
        }
    }

    #[test]
    fn exit_is_the_exit_point_only() {
        let level = tiny_level();
        assert!(level.is_exit(Pos::new(3, 1)));
        assert!(!level.is_exit(level.spawn_point));
        assert!(!level.is_exit(Pos::new(-3, 1)));
    }

    #[test]
    fn barrel_removal_only_hits_barrels() {
        let mut level = tiny_level();
        assert!(!level.remove_barrel(Pos::new(1, 1)));
        assert!(level.remove_barrel(Pos::new(2, 1)));
        assert_eq!(level.tile_at(Pos::new(2, 1)), Some(Tile::Floor));
        assert!(!level.remove_barrel(Pos::new(2, 1)));
    }

    #[test]
    fn objective_completion_is_once() {
        let mut level = tiny_level();
        assert_eq!(level.objectives_remaining(), 1);
        assert!(level.complete_objective(0));
        assert!(!level.complete_objective(0));
        assert!(!level.complete_objective(7));
        assert_eq!(level.objectives_remaining(), 0);
    }

    #[test]
    fn ascii_overlays_guards() {
        let mut level = tiny_level();
        level.guard_spawns.push(GuardSpawn {
            pos: Pos::new(3, 1),
            facing: Facing::West,
            waypoints: vec![],
            guard_type: GuardType::Patrol,
        });
        assert_eq!(level.to_ascii(), "#####\n#.BG#\n#####\n");
    }

    #[test]
    fn mark_dead_keeps_slot() {
        let mut roster = Roster::new(vec![
            Guard::new(Pos::new(1, 1), Facing::North),
            Guard::new(Pos::new(2, 1), Facing::North),
        ]);
        assert!(roster.mark_dead(GuardId(0)));
        assert!(!roster.mark_dead(GuardId(0)));
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.living().count(), 1);
        assert_eq!(roster.get(GuardId(0)).map(|g| g.state), Some(AlertState::Patrol));
    }
}
