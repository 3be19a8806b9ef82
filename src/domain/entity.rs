/// Entities: Guard, guard-type templates, spawn records, objectives.
/// The alert state machine is small: 4 states, Combat is terminal here.

use std::time::Duration;

use super::geometry::{Facing, Pos};

pub const DEFAULT_VISION_RANGE: f32 = 7.0;
pub const DEFAULT_MOVE_INTERVAL: Duration = Duration::from_millis(500);

/// Guard escalation stage.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AlertState {
    #[default]
    Patrol,
    Suspicious,
    Alert,
    Combat,
}

impl AlertState {
    pub fn label(self) -> &'static str {
        match self {
            AlertState::Patrol => "patrol",
            AlertState::Suspicious => "suspicious",
            AlertState::Alert => "alert",
            AlertState::Combat => "combat",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct CombatStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
}

/// Static per-type tuning. `cascade_range` and `combat` are consumed by the
/// session's combat layer, not by this crate's tick.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct GuardTemplate {
    pub vision_range: f32,
    pub move_interval: Duration,
    pub cascade_range: i32,
    pub combat: CombatStats,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GuardType {
    Patrol,
    Scout,
    Captain,
}

impl GuardType {
    pub fn template(self) -> GuardTemplate {
        match self {
            GuardType::Patrol => GuardTemplate {
                vision_range: 7.0,
                move_interval: Duration::from_millis(500),
                cascade_range: 10,
                combat: CombatStats { hp: 30, attack: 6, defense: 2 },
            },
            GuardType::Scout => GuardTemplate {
                vision_range: 9.0,
                move_interval: Duration::from_millis(350),
                cascade_range: 12,
                combat: CombatStats { hp: 20, attack: 5, defense: 1 },
            },
            GuardType::Captain => GuardTemplate {
                vision_range: 8.0,
                move_interval: Duration::from_millis(700),
                cascade_range: 14,
                combat: CombatStats { hp: 50, attack: 9, defense: 4 },
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            GuardType::Patrol => "patrol",
            GuardType::Scout => "scout",
            GuardType::Captain => "captain",
        }
    }
}

/// Guard spawn record produced by the level compiler.
#[derive(Clone, PartialEq, Debug)]
pub struct GuardSpawn {
    pub pos: Pos,
    pub facing: Facing,
    pub waypoints: Vec<Pos>,
    pub guard_type: GuardType,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Objective {
    pub pos: Pos,
    pub label: String,
    pub completed: bool,
}

/// Stable handle into the roster. Guards are never removed, so the index
/// stays valid for the whole mission.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct GuardId(pub usize);

#[derive(Clone, Debug)]
pub struct Guard {
    pub pos: Pos,
    pub facing: Facing,
    pub waypoints: Vec<Pos>,   // cyclic
    pub patrol_index: usize,
    pub state: AlertState,
    pub suspicion_timer: Duration,
    pub alert_timer: Duration,
    pub last_known_player: Option<Pos>,
    pub vision_range: f32,
    pub move_interval: Duration,
    pub move_timer: Duration,  // time accumulated toward the next step
    pub alive: bool,
    pub guard_type: Option<GuardType>,
}

impl Guard {
    pub fn new(pos: Pos, facing: Facing) -> Self {
        Guard {
            pos,
            facing,
            waypoints: vec![],
            patrol_index: 0,
            state: AlertState::Patrol,
            suspicion_timer: Duration::ZERO,
            alert_timer: Duration::ZERO,
            last_known_player: None,
            vision_range: DEFAULT_VISION_RANGE,
            move_interval: DEFAULT_MOVE_INTERVAL,
            move_timer: Duration::ZERO,
            alive: true,
            guard_type: None,
        }
    }

    /// Build the runtime guard from a spawn record, applying the type template.
    pub fn from_spawn(spawn: &GuardSpawn) -> Self {
        let template = spawn.guard_type.template();
        Guard {
            waypoints: spawn.waypoints.clone(),
            vision_range: template.vision_range,
            move_interval: template.move_interval,
            guard_type: Some(spawn.guard_type),
            ..Guard::new(spawn.pos, spawn.facing)
        }
    }

    pub fn with_vision_range(mut self, range: f32) -> Self {
        self.vision_range = range;
        self
    }

    pub fn with_waypoints(mut self, waypoints: Vec<Pos>) -> Self {
        self.waypoints = waypoints;
        self.patrol_index = 0;
        self
    }

    pub fn reset_timers(&mut self) {
        self.suspicion_timer = Duration::ZERO;
        self.alert_timer = Duration::ZERO;
    }

    /// Current patrol target, if the guard has a route.
    pub fn current_waypoint(&self) -> Option<Pos> {
        if self.waypoints.is_empty() { return None; }
        self.waypoints.get(self.patrol_index % self.waypoints.len()).copied()
    }

    pub fn advance_waypoint(&mut self) {
        if self.waypoints.is_empty() { return; }
        self.patrol_index = (self.patrol_index + 1) % self.waypoints.len();
    }
}
