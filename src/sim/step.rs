/// The tick driver: advances every guard by one frame.
///
/// Per guard, in roster order:
///   1. Perception (can the guard see the player?)
///   2. Concealment policy (the player's hiding flag)
///   3. Alert state machine
///   4. Cascade, if this guard just raised the alarm
///   5. Navigation
///
/// Guards are processed strictly in order. A cascade reaches a later guard
/// before that guard's own update in the same tick, and an earlier guard
/// only on the next tick. This ordering is observable and intentional.
///
/// Nothing here spawns, removes or reorders guards. Death is decided by the
/// session (`Roster::mark_dead`) and makes the guard inert.

use std::time::Duration;

use crate::config::TuningConfig;
use crate::domain::alert::{self, AlertStep};
use crate::domain::entity::{AlertState, Guard, GuardId};
use crate::domain::geometry::Pos;
use crate::domain::navigation;
use crate::domain::perception;
use super::event::{GuardEvent, GuardOutcome};
use super::world::{Level, Roster};

// ══════════════════════════════════════════════════════════════
// Concealment: the hiding-flag seam
// ══════════════════════════════════════════════════════════════

/// What a guard takes away from this tick's perception.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Sighting {
    pub sees: bool,
    pub barrel_noticed: bool,
}

/// Decides how the player's hiding flag changes a raw perception result.
///
/// How much a barrel should hide the player is an open design question, so
/// the default (`IgnoreHiding`) leaves perception untouched and never
/// reports a barrel. Sessions that want hiding to matter install their own.
pub trait ConcealmentPolicy {
    fn filter(&self, guard: &Guard, player: Pos, hiding: bool, perceived: bool) -> Sighting;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct IgnoreHiding;

impl ConcealmentPolicy for IgnoreHiding {
    fn filter(&self, _guard: &Guard, _player: Pos, _hiding: bool, perceived: bool) -> Sighting {
        Sighting { sees: perceived, barrel_noticed: false }
    }
}

// ══════════════════════════════════════════════════════════════
// Mission
// ══════════════════════════════════════════════════════════════

pub struct Mission {
    pub level: Level,
    pub roster: Roster,
    pub tuning: TuningConfig,
    policy: Box<dyn ConcealmentPolicy>,
}

impl Mission {
    /// Build the roster from the level's spawn records (types applied).
    pub fn new(level: Level, tuning: TuningConfig) -> Self {
        let roster = Roster::from_spawns(&level.guard_spawns);
        Mission::with_roster(level, roster, tuning)
    }

    pub fn with_roster(level: Level, roster: Roster, tuning: TuningConfig) -> Self {
        Mission { level, roster, tuning, policy: Box::new(IgnoreHiding) }
    }

    pub fn with_policy(mut self, policy: impl ConcealmentPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Advance every guard once. Returns everything that happened.
    pub fn tick(&mut self, player: Pos, hiding: bool, dt: Duration) -> Vec<GuardEvent> {
        let mut events = Vec::new();
        let ids: Vec<GuardId> = self.roster.ids().collect();
        for id in ids {
            self.update_guard(id, player, hiding, dt, &mut events);
        }
        events
    }

    /// Advance one guard. Returns `Some(Combat)` on the tick the guard
    /// enters Combat (never again after), or `Some(BarrelNoticed)` when the
    /// concealment policy reports it. Dead or unknown guards are skipped.
    pub fn update_guard(
        &mut self,
        id: GuardId,
        player: Pos,
        hiding: bool,
        dt: Duration,
        events: &mut Vec<GuardEvent>,
    ) -> Option<GuardOutcome> {
        let guard = self.roster.get_mut(id)?;
        if !guard.alive { return None; }

        let perceived = perception::can_perceive(guard, player, &self.level, &self.tuning.perception);
        let sighting = self.policy.filter(guard, player, hiding, perceived);

        let on_map = self.level.in_bounds(player).then_some(player);
        let step = alert::update_alert(guard, sighting.sees, on_map, dt, &self.tuning.alert);
        record_transition(id, step, events);

        if step.raised_alarm() {
            for target in alert::cascade(&mut self.roster, id, &self.tuning.alert) {
                events.push(GuardEvent::Cascaded { source: id, target });
                events.push(GuardEvent::StateChanged {
                    id: target,
                    from: AlertState::Patrol,
                    to: AlertState::Suspicious,
                });
            }
        }

        let guard = self.roster.get_mut(id)?;
        if let Some(to) = navigation::advance(guard, &self.level, dt) {
            events.push(GuardEvent::Moved { id, to });
        }

        if sighting.barrel_noticed {
            events.push(GuardEvent::BarrelNoticed { id });
        }
        if step.engaged() {
            tracing::info!(guard = id.0, pos = %guard.pos, %player, "guard engages");
            events.push(GuardEvent::CombatStarted { id });
            return Some(GuardOutcome::Combat);
        }
        if sighting.barrel_noticed {
            return Some(GuardOutcome::BarrelNoticed);
        }
        None
    }

    /// Read-only overlay tiles for one guard.
    pub fn vision_cone_tiles(&self, id: GuardId) -> Vec<Pos> {
        match self.roster.get(id) {
            Some(g) => perception::vision_cone_tiles(g, &self.level, &self.tuning.perception),
            None => vec![],
        }
    }

    pub fn state_of(&self, id: GuardId) -> Option<AlertState> {
        self.roster.get(id).map(|g| g.state)
    }

    /// First living guard currently in Combat, if any.
    pub fn engaged_guard(&self) -> Option<GuardId> {
        self.roster
            .living()
            .find(|(_, g)| g.state == AlertState::Combat)
            .map(|(id, _)| id)
    }
}

fn record_transition(id: GuardId, step: AlertStep, events: &mut Vec<GuardEvent>) {
    if step.changed() {
        events.push(GuardEvent::StateChanged { id, from: step.from, to: step.to });
    }
}
