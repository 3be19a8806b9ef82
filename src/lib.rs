//! Guard AI for a top-down infiltration game.
//!
//! - `sim::level` compiles a seeded, playable deck plan from a template.
//! - `sim::step::Mission` advances every guard once per frame: perception,
//!   alert escalation, cascade, navigation.
//! - `config` loads the alert and perception tuning.
//!
//! The crate has no notion of the player beyond a position and a hiding
//! flag. Melee, scoring, rendering and input belong to the session.

pub mod config;
pub mod domain;
pub mod sim;

pub use config::{AlertTuning, ConfigError, PerceptionTuning, TuningConfig};
pub use domain::entity::{AlertState, Guard, GuardId, GuardSpawn, GuardType, Objective};
pub use domain::geometry::{Facing, Pos};
pub use domain::tile::Tile;
pub use sim::event::{GuardEvent, GuardOutcome};
pub use sim::level::{compile, compile_layout, CompileOptions, Difficulty};
pub use sim::step::{ConcealmentPolicy, IgnoreHiding, Mission, Sighting};
pub use sim::world::{Level, Roster};
