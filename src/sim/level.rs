/// Level compiler: ASCII deck plan + seed → `Level`.
///
/// ## Pipeline (fixed order; the RNG draw order is part of the output)
///   1. Scan rows top-to-bottom, left-to-right. Each `G` draws a facing.
///   2. Shuffle the objective label pool (Fisher–Yates) and hand labels out
///      in scan order, cycling if there are more objectives than labels.
///   3. Barrel jitter: each barrel, in scan order, has a 40% chance to slide
///      one cardinal step onto an adjacent Floor tile.
///   4. Guard types: spawn 0 is Captain when there are ≥ 3 guards; the rest
///      alternate by index parity (even → Patrol, odd → Scout).
///   5. Hard difficulty: one extra Scout on a Floor tile far from both the
///      entry (Manhattan > 8) and the exit (Manhattan > 6).
///
/// Compilation never fails. An unknown template id is replaced by
/// `DEFAULT_TEMPLATE`; this fallback is deliberate.
///
/// ## Legend
///   '~' = Water     '.' = Floor     '#' = Wall      '+' = Door
///   'C' = Crate     'B' = Barrel    'W' = Window    'T' = Torch
///   'S' = Entry (player spawn)      'E' = Exit
///   '!' = Objective                 'G' = Guard spawn (floor underneath)

use crate::domain::entity::{GuardSpawn, GuardType, Objective};
use crate::domain::geometry::{Facing, Pos};
use crate::domain::tile::Tile;
use crate::sim::rng::Lcg;
use crate::sim::world::Level;

pub const DEFAULT_TEMPLATE: &str = "ship_hold";
pub const TEMPLATE_IDS: [&str; 3] = ["fort", "ship_hold", "warehouse"];

const BARREL_JITTER_CHANCE: f32 = 0.4;
const HARD_MIN_SPAWN_DISTANCE: i32 = 8;
const HARD_MIN_EXIT_DISTANCE: i32 = 6;
const CARDINALS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

const OBJECTIVE_LABELS: [&str; 8] = [
    "Cargo Manifest",
    "Harbor Chart",
    "Signal Codes",
    "Strongbox Key",
    "Captain's Log",
    "Smuggled Spice",
    "Admiralty Seal",
    "Powder Ledger",
];

/// Patrol routes as offsets from the spawn tile, picked round-robin.
const PATROL_PATTERNS: [&[(i32, i32)]; 5] = [
    &[(0, 0), (4, 0), (4, 3), (0, 3)],
    &[(0, 0), (6, 0)],
    &[(0, 0), (0, 4)],
    &[(0, 0), (3, 0), (3, -3), (0, -3)],
    &[(0, 0), (-4, 0), (-4, 2), (0, 2)],
];

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Difficulty {
    #[default]
    Normal,
    Hard,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct CompileOptions {
    pub difficulty: Difficulty,
}

impl CompileOptions {
    pub fn hard() -> Self {
        CompileOptions { difficulty: Difficulty::Hard }
    }
}

struct Template {
    id: &'static str,
    name: &'static str,
    rows: &'static [&'static str],
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Compile a built-in template. Unknown ids fall back to `DEFAULT_TEMPLATE`.
pub fn compile(template_id: &str, seed: u64, options: CompileOptions) -> Level {
    let template = match find_template(template_id) {
        Some(t) => t,
        None => {
            tracing::warn!(requested = template_id, fallback = DEFAULT_TEMPLATE, "unknown template");
            default_template()
        }
    };
    compile_layout(template.id, template.name, template.rows, seed, options)
}

/// Run the same pipeline over an in-memory layout. Short rows are padded
/// with water so the grid is always rectangular.
pub fn compile_layout(
    template_id: &str,
    name: &str,
    rows: &[&str],
    seed: u64,
    options: CompileOptions,
) -> Level {
    let mut rng = Lcg::new(seed);

    let height = rows.len();
    let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);

    let mut level = Level {
        name: name.to_string(),
        template_id: template_id.to_string(),
        seed,
        tiles: vec![vec![Tile::Water; width]; height],
        width,
        height,
        spawn_point: Pos::default(),
        exit_point: Pos::default(),
        objectives: vec![],
        guard_spawns: vec![],
    };

    // ── 1. Scan ──
    let mut spawn = None;
    let mut exit = None;
    let mut barrels: Vec<Pos> = Vec::new();
    let mut guards: Vec<(Pos, Facing, Vec<Pos>)> = Vec::new();

    for (y, row) in rows.iter().enumerate() {
        for (x, ch) in row.chars().enumerate() {
            let here = Pos::new(x as i32, y as i32);
            let tile = match ch {
                'S' => {
                    spawn.get_or_insert(here);
                    Tile::Entry
                }
                'E' => {
                    exit.get_or_insert(here);
                    Tile::Exit
                }
                '!' => {
                    level.objectives.push(Objective {
                        pos: here,
                        label: String::new(),
                        completed: false,
                    });
                    Tile::Objective
                }
                'G' => {
                    let facing = Facing::from_index(rng.below(8));
                    let route = patrol_route(here, guards.len(), width, height);
                    guards.push((here, facing, route));
                    Tile::Floor
                }
                other => {
                    let tile = Tile::from_legend(other);
                    if tile == Tile::Barrel { barrels.push(here); }
                    tile
                }
            };
            level.set_tile(here, tile);
        }
    }

    level.spawn_point = spawn.unwrap_or_else(|| {
        tracing::warn!(template = template_id, "layout has no entry marker");
        Pos::default()
    });
    level.exit_point = exit.unwrap_or_else(|| {
        tracing::warn!(template = template_id, "layout has no exit marker");
        Pos::default()
    });

    // ── 2. Labels ──
    assign_labels(&mut level.objectives, &mut rng);

    // ── 3. Barrel jitter ──
    jitter_barrels(&mut level, &barrels, &mut rng);

    // ── 4. Guard types ──
    let count = guards.len();
    level.guard_spawns = guards
        .into_iter()
        .enumerate()
        .map(|(i, (pos, facing, waypoints))| GuardSpawn {
            pos,
            facing,
            waypoints,
            guard_type: guard_type_for(i, count),
        })
        .collect();

    // ── 5. Hard difficulty ──
    if options.difficulty == Difficulty::Hard {
        place_extra_guard(&mut level, &mut rng);
    }

    level
}

/// Spawn 0 leads when the roster is big enough; the rest alternate.
pub fn guard_type_for(index: usize, count: usize) -> GuardType {
    if index == 0 && count >= 3 {
        GuardType::Captain
    } else if index % 2 == 0 {
        GuardType::Patrol
    } else {
        GuardType::Scout
    }
}

// ══════════════════════════════════════════════════════════════
// Internal: generation steps
// ══════════════════════════════════════════════════════════════

fn patrol_route(origin: Pos, guard_index: usize, width: usize, height: usize) -> Vec<Pos> {
    let max_x = width.saturating_sub(1) as i32;
    let max_y = height.saturating_sub(1) as i32;
    PATROL_PATTERNS[guard_index % PATROL_PATTERNS.len()]
        .iter()
        .map(|&(dx, dy)| {
            Pos::new((origin.x + dx).clamp(0, max_x), (origin.y + dy).clamp(0, max_y))
        })
        .collect()
}

fn assign_labels(objectives: &mut [Objective], rng: &mut Lcg) {
    let mut pool: Vec<&str> = OBJECTIVE_LABELS.to_vec();
    rng.shuffle(&mut pool);
    for (i, obj) in objectives.iter_mut().enumerate() {
        obj.label = pool[i % pool.len()].to_string();
    }
}

fn jitter_barrels(level: &mut Level, barrels: &[Pos], rng: &mut Lcg) {
    for &origin in barrels {
        if !rng.chance(BARREL_JITTER_CHANCE) { continue; }
        let (dx, dy) = CARDINALS[rng.below(CARDINALS.len())];
        let dest = origin.offset(dx, dy);
        if level.tile_at(dest) == Some(Tile::Floor) {
            level.set_tile(dest, Tile::Barrel);
            level.set_tile(origin, Tile::Floor);
        }
    }
}

fn place_extra_guard(level: &mut Level, rng: &mut Lcg) {
    let mut candidates: Vec<Pos> = Vec::new();
    for y in 0..level.height {
        for x in 0..level.width {
            let p = Pos::new(x as i32, y as i32);
            if level.tile_at(p) != Some(Tile::Floor) { continue; }
            if p.manhattan(level.spawn_point) <= HARD_MIN_SPAWN_DISTANCE { continue; }
            if p.manhattan(level.exit_point) <= HARD_MIN_EXIT_DISTANCE { continue; }
            if level.guard_spawns.iter().any(|g| g.pos == p) { continue; }
            candidates.push(p);
        }
    }

    if candidates.is_empty() {
        tracing::debug!(template = %level.template_id, "no tile qualifies for the extra guard");
        return;
    }

    let pos = candidates[rng.below(candidates.len())];
    let facing = Facing::from_index(rng.below(8));
    let route = patrol_route(pos, level.guard_spawns.len(), level.width, level.height);
    tracing::debug!(template = %level.template_id, %pos, "hard difficulty: extra scout");
    level.guard_spawns.push(GuardSpawn {
        pos,
        facing,
        waypoints: route,
        guard_type: GuardType::Scout,
    });
}

fn find_template(id: &str) -> Option<&'static Template> {
    TEMPLATES.iter().find(|t| t.id == id)
}

fn default_template() -> &'static Template {
    find_template(DEFAULT_TEMPLATE).unwrap_or(&TEMPLATES[1])
}

// ══════════════════════════════════════════════════════════════
// Built-in deck plans
// ══════════════════════════════════════════════════════════════

static TEMPLATES: [Template; 3] = [
    Template {
        id: "fort",
        name: "Harbor Fort",
        rows: &[
            "~~~~~~~~~~~~~~~~~~~~~~~~",
            "~#########W####W#######~",
            "~#S....#.........C..!.#~",
            "~#..B..+...G......C...#~",
            "~#.....#..........##+##~",
            "~###+###..T....B..#...#~",
            "~#.C......##+##...#.!.#~",
            "~#...G....#...#...#G..#~",
            "~#..!..B..#.!.#.....B.#~",
            "~#........#...#..G...E#~",
            "~##########W######W####~",
            "~~~~~~~~~~~~~~~~~~~~~~~~",
        ],
    },
    Template {
        id: "ship_hold",
        name: "Ship's Hold",
        rows: &[
            "~~~~~~~~~~~~~~~~~~~~~~~~",
            "~~~####################~",
            "~~#S..C.....B.....C...#~",
            "~#....C..G.....CC.....#~",
            "~#.B......####.....!..#~",
            "~#....!...#..+...G....#~",
            "~#..CC....#..#........#~",
            "~#......G.#!.#..B..C..E~",
            "~#..B.....####........#~",
            "~~#....!.....C....B..#~~",
            "~~~###################~~",
            "~~~~~~~~~~~~~~~~~~~~~~~~",
        ],
    },
    Template {
        id: "warehouse",
        name: "Dockside Warehouse",
        rows: &[
            "~~~~~~~~~~~~~~~~~~~~~~~~",
            "~######################~",
            "~#S..+.....T......T...#~",
            "~#...#.CC..CC..CC..CC.#~",
            "~#####.......G........#~",
            "~#.!.+.CC..CC..CC..CC.#~",
            "~#...#................#~",
            "~##+##.CC..CC.!CC..CC.#~",
            "~#...B......G......B..#~",
            "~#.B.#..............!.E~",
            "~######################~",
            "~~~~~~~~~~~~~~~~~~~~~~~~",
        ],
    },
];
