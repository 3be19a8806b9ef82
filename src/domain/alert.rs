/// Alert state machine: one guard, one tick.
///
/// ```text
///   Patrol ──1.5s seen──▶ Suspicious ──3.0s seen──▶ Alert ──adjacent──▶ Combat
///     ▲                       │                        │
///     └──────3.0s unseen──────┘                        │
///     └──────────────────8.0s unseen───────────────────┘
/// ```
///
/// Every transition resets both timers. Combat is terminal for this crate:
/// the session resolves the fight and decides the guard's fate.
///
/// Cascade: when a guard goes Suspicious → Alert, every other living Patrol
/// guard within Manhattan range becomes Suspicious and inherits the last
/// known player position.

use std::time::Duration;

use crate::config::AlertTuning;
use crate::sim::world::Roster;

use super::entity::{AlertState, Guard, GuardId};
use super::geometry::Pos;

/// What one update did to a guard.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AlertStep {
    pub from: AlertState,
    pub to: AlertState,
}

impl AlertStep {
    fn stay(state: AlertState) -> Self {
        AlertStep { from: state, to: state }
    }

    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    /// Suspicious → Alert: the cascade trigger.
    pub fn raised_alarm(&self) -> bool {
        self.from == AlertState::Suspicious && self.to == AlertState::Alert
    }

    pub fn engaged(&self) -> bool {
        self.changed() && self.to == AlertState::Combat
    }
}

/// `player` is `None` when the player stands off the map. Nothing off the
/// map can be remembered or fought.
pub fn update_alert(
    guard: &mut Guard,
    sees: bool,
    player: Option<Pos>,
    dt: Duration,
    tuning: &AlertTuning,
) -> AlertStep {
    let from = guard.state;
    if !guard.alive { return AlertStep::stay(from); }

    match from {
        AlertState::Patrol => {
            if sees {
                guard.suspicion_timer += dt;
                remember(guard, player);
            } else {
                let drain = decay_drain(dt, tuning.suspicion_decay);
                guard.suspicion_timer = guard.suspicion_timer.saturating_sub(drain);
            }
            if guard.suspicion_timer >= tuning.suspicion_threshold {
                enter(guard, AlertState::Suspicious);
            }
        }
        AlertState::Suspicious => {
            if sees {
                guard.alert_timer += dt;
                remember(guard, player);
                if guard.alert_timer >= tuning.alert_threshold {
                    enter(guard, AlertState::Alert);
                }
            } else {
                guard.suspicion_timer += dt;
                if guard.suspicion_timer >= tuning.suspicious_calm {
                    enter(guard, AlertState::Patrol);
                }
            }
        }
        AlertState::Alert => {
            if player.is_some_and(|p| guard.pos.chebyshev(p) <= tuning.combat_range) {
                enter(guard, AlertState::Combat);
            } else if sees {
                remember(guard, player);
                guard.alert_timer = Duration::ZERO;
            } else {
                guard.alert_timer += dt;
                if guard.alert_timer >= tuning.alert_calm {
                    enter(guard, AlertState::Patrol);
                }
            }
        }
        AlertState::Combat => {}
    }

    let step = AlertStep { from, to: guard.state };
    if step.changed() {
        tracing::debug!(from = from.label(), to = step.to.label(), pos = %guard.pos, "guard state change");
    }
    step
}

fn remember(guard: &mut Guard, player: Option<Pos>) {
    if player.is_some() {
        guard.last_known_player = player;
    }
}

/// `dt * rate`, saturating instead of panicking on huge or non-finite rates.
fn decay_drain(dt: Duration, rate: f64) -> Duration {
    Duration::try_from_secs_f64(dt.as_secs_f64() * rate).unwrap_or(Duration::MAX)
}

fn enter(guard: &mut Guard, state: AlertState) {
    guard.state = state;
    guard.reset_timers();
}

/// Propagate an alarm raised by `source`. Returns the guards that were
/// pulled into Suspicious, in roster order.
pub fn cascade(roster: &mut Roster, source: GuardId, tuning: &AlertTuning) -> Vec<GuardId> {
    let (origin, last_known) = match roster.get(source) {
        Some(g) if g.alive => (g.pos, g.last_known_player),
        _ => return vec![],
    };

    let mut pulled = Vec::new();
    for (id, guard) in roster.iter_mut() {
        if id == source || !guard.alive { continue; }
        if guard.state != AlertState::Patrol { continue; }
        if guard.pos.manhattan(origin) > tuning.cascade_range { continue; }

        guard.state = AlertState::Suspicious;
        guard.last_known_player = last_known;
        guard.reset_timers();
        pulled.push(id);
    }

    if !pulled.is_empty() {
        tracing::debug!(source = source.0, count = pulled.len(), "alert cascade");
    }
    pulled
}
