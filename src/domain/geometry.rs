/// Grid geometry shared by perception, navigation and the level compiler.
///
/// Coordinates are signed so that positions off the map can be expressed
/// and rejected by bounds checks instead of wrapping.
/// y grows downward; North is (0, -1).

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Pos {
    pub x: i32,
    pub y: i32,
}

impl Pos {
    pub const fn new(x: i32, y: i32) -> Self {
        Pos { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Pos { x: self.x + dx, y: self.y + dy }
    }

    /// King-move distance: max of the axis deltas.
    /// Saturates at `i32::MAX` for coordinates at opposite ends of the range.
    pub fn chebyshev(self, other: Pos) -> i32 {
        saturate(self.x.abs_diff(other.x).max(self.y.abs_diff(other.y)))
    }

    pub fn manhattan(self, other: Pos) -> i32 {
        saturate(self.x.abs_diff(other.x).saturating_add(self.y.abs_diff(other.y)))
    }

    pub fn euclidean(self, other: Pos) -> f32 {
        let dx = self.x.abs_diff(other.x) as f64;
        let dy = self.y.abs_diff(other.y) as f64;
        (dx * dx + dy * dy).sqrt() as f32
    }
}

fn saturate(d: u32) -> i32 {
    i32::try_from(d).unwrap_or(i32::MAX)
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePosError {
    #[error("expected `x,y`, got `{0}`")]
    Shape(String),
    #[error("bad coordinate `{0}`")]
    Coordinate(String),
}

impl FromStr for Pos {
    type Err = ParsePosError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (x, y) = s
            .split_once(',')
            .ok_or_else(|| ParsePosError::Shape(s.to_string()))?;
        let coord = |t: &str| {
            t.trim()
                .parse::<i32>()
                .map_err(|_| ParsePosError::Coordinate(t.trim().to_string()))
        };
        Ok(Pos::new(coord(x)?, coord(y)?))
    }
}

/// One of eight facings, clockwise from North.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Facing {
    #[default]
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl Facing {
    pub const ALL: [Facing; 8] = [
        Facing::North,
        Facing::NorthEast,
        Facing::East,
        Facing::SouthEast,
        Facing::South,
        Facing::SouthWest,
        Facing::West,
        Facing::NorthWest,
    ];

    /// Bucket index 0..8 (0 = North).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(i: usize) -> Facing {
        Facing::ALL[i % 8]
    }

    /// Grid step for this facing. Diagonals are (±1, ±1), not normalized.
    pub fn vector(self) -> (i32, i32) {
        match self {
            Facing::North => (0, -1),
            Facing::NorthEast => (1, -1),
            Facing::East => (1, 0),
            Facing::SouthEast => (1, 1),
            Facing::South => (0, 1),
            Facing::SouthWest => (-1, 1),
            Facing::West => (-1, 0),
            Facing::NorthWest => (-1, -1),
        }
    }

    /// Bucket nearest the true angle from `from` to `to`:
    /// `round(angle / 45°) mod 8`, 0° = North, clockwise.
    /// Returns `None` when the points coincide (no angle).
    pub fn toward(from: Pos, to: Pos) -> Option<Facing> {
        let dx = (i64::from(to.x) - i64::from(from.x)) as f32;
        let dy = (i64::from(to.y) - i64::from(from.y)) as f32;
        if dx == 0.0 && dy == 0.0 {
            return None;
        }
        // atan2(east, north) measures clockwise from North.
        let degrees = dx.atan2(-dy).to_degrees();
        let bucket = (degrees / 45.0).round() as i32;
        Some(Facing::from_index(bucket.rem_euclid(8) as usize))
    }
}

/// Bresenham line from `from` to `to`, both endpoints included.
pub fn bresenham(from: Pos, to: Pos) -> Vec<Pos> {
    let mut points = Vec::new();
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (from.x, from.y);

    loop {
        points.push(Pos::new(x, y));
        if x == to.x && y == to.y { break; }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    points
}
