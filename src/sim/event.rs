/// Events emitted during a simulation tick.
/// The session consumes these for HUD coloring and to branch into melee.

use std::fmt;

use crate::domain::entity::{AlertState, GuardId};
use crate::domain::geometry::Pos;

#[derive(Clone, Debug, PartialEq)]
pub enum GuardEvent {
    StateChanged { id: GuardId, from: AlertState, to: AlertState },
    /// `target` was pulled into Suspicious by `source` raising the alarm.
    Cascaded { source: GuardId, target: GuardId },
    Moved { id: GuardId, to: Pos },
    /// Emitted exactly once, on the tick the guard enters Combat.
    CombatStarted { id: GuardId },
    BarrelNoticed { id: GuardId },
}

impl fmt::Display for GuardEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardEvent::StateChanged { id, from, to } => {
                write!(f, "guard {}: {} -> {}", id.0, from.label(), to.label())
            }
            GuardEvent::Cascaded { source, target } => {
                write!(f, "guard {} alerted by guard {}", target.0, source.0)
            }
            GuardEvent::Moved { id, to } => write!(f, "guard {} moved to {}", id.0, to),
            GuardEvent::CombatStarted { id } => write!(f, "guard {} engages", id.0),
            GuardEvent::BarrelNoticed { id } => write!(f, "guard {} eyes a barrel", id.0),
        }
    }
}

/// Result of a single guard update that the session must react to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GuardOutcome {
    Combat,
    BarrelNoticed,
}
