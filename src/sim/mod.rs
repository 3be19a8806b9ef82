/// Level compilation, world state and the per-tick driver.

pub mod event;
pub mod level;
pub mod rng;
pub mod step;
pub mod world;
