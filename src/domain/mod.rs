/// Pure game rules: tiles, guards, and how guards see, react and move.
/// Nothing in here owns the level or the roster; `sim` does.

pub mod alert;
pub mod entity;
pub mod geometry;
pub mod navigation;
pub mod perception;
pub mod tile;
