/// Tile types and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Tile {
    #[default]
    Water,
    Floor,
    Wall,
    Door,
    Crate,     // Cover, blocks movement, see-through
    Barrel,    // Blocks movement; the player can climb inside
    Objective,
    Exit,
    Entry,
    Window,
    Torch,
}

impl Tile {
    /// Can an agent stand on this tile?
    pub fn passable(self) -> bool {
        matches!(
            self,
            Tile::Floor | Tile::Door | Tile::Objective | Tile::Exit | Tile::Entry
        )
    }

    /// Does line-of-sight pass through this tile?
    pub fn transparent(self) -> bool {
        !matches!(self, Tile::Wall)
    }

    /// Can this tile shield someone standing next to it from one side?
    pub fn cover(self) -> bool {
        matches!(self, Tile::Wall | Tile::Crate)
    }

    /// Legend character → tile. Entity markers (`G`) are handled by the
    /// compiler before this is called; anything unknown becomes water.
    pub fn from_legend(ch: char) -> Tile {
        match ch {
            '.' => Tile::Floor,
            '#' => Tile::Wall,
            '+' => Tile::Door,
            'C' => Tile::Crate,
            'B' => Tile::Barrel,
            '!' => Tile::Objective,
            'E' => Tile::Exit,
            'S' => Tile::Entry,
            'W' => Tile::Window,
            'T' => Tile::Torch,
            _ => Tile::Water,
        }
    }

    /// Inverse of `from_legend`.
    pub fn glyph(self) -> char {
        match self {
            Tile::Water => '~',
            Tile::Floor => '.',
            Tile::Wall => '#',
            Tile::Door => '+',
            Tile::Crate => 'C',
            Tile::Barrel => 'B',
            Tile::Objective => '!',
            Tile::Exit => 'E',
            Tile::Entry => 'S',
            Tile::Window => 'W',
            Tile::Torch => 'T',
        }
    }
}
