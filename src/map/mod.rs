use std::collections::{HashMap, HashSet};
use std::ops::RangeInclusive;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use tracing::debug;

use crate::data::{CatalogEntry, ResourceCatalog, Rgb, TileType};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TileKind {
    Grass,
    Resource(TileType),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    pub kind: TileKind,
    pub color: Rgb,
}

impl Default for Tile {
    fn default() -> Self {
        Tile::grass()
    }
}

impl Tile {
    pub fn grass() -> Self {
        Self {
            kind: TileKind::Grass,
            color: Rgb::GRASS,
        }
    }

    pub fn resource(entry: &CatalogEntry) -> Self {
        Self {
            kind: TileKind::Resource(entry.tile_type),
            color: entry.color,
        }
    }

    pub fn tile_type(&self) -> TileType {
        match self.kind {
            TileKind::Grass => TileType::GRASS,
            TileKind::Resource(tile_type) => tile_type,
        }
    }

    pub fn is_grass(&self) -> bool {
        self.kind == TileKind::Grass
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerationReport {
    pub skipped: bool,
    pub created: usize,
    pub resources: usize,
}

/// Infinite, lazily populated tile map keyed by world coordinate.
///
/// Entries are only ever inserted or replaced, never removed. `explored`
/// remembers which viewport centers already ran a generation pass.
#[derive(Clone, Debug)]
pub struct WorldGrid {
    tiles: HashMap<Point, Tile>,
    explored: HashSet<Point>,
}

impl Default for WorldGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl WorldGrid {
    /// Starts with a single grass tile under the origin.
    pub fn new() -> Self {
        let mut tiles = HashMap::new();
        tiles.insert(Point::new(0, 0), Tile::grass());
        Self {
            tiles,
            explored: HashSet::new(),
        }
    }

    pub fn empty() -> Self {
        Self {
            tiles: HashMap::new(),
            explored: HashSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile_at(&self, point: Point) -> Option<&Tile> {
        self.tiles.get(&point)
    }

    /// Unknown coordinates read as grass.
    pub fn tile_or_grass(&self, point: Point) -> Tile {
        self.tiles.get(&point).copied().unwrap_or_default()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.tiles.contains_key(&point)
    }

    pub fn set_tile(&mut self, point: Point, tile: Tile) {
        self.tiles.insert(point, tile);
    }

    pub fn is_explored(&self, center: Point) -> bool {
        self.explored.contains(&center)
    }

    pub fn forget_explored(&mut self) {
        self.explored.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Point, &Tile)> {
        self.tiles.iter()
    }

    /// Populates every missing cell of the window around `center`.
    ///
    /// Existing cells are never re-rolled, whatever their type. A center that
    /// already ran a pass is a no-op until `forget_explored` is called.
    pub fn generate_map(
        &mut self,
        center: Point,
        range_x: RangeInclusive<i32>,
        range_y: RangeInclusive<i32>,
        catalog: &ResourceCatalog,
        rng: &mut RandomNumberGenerator,
    ) -> GenerationReport {
        if self.explored.contains(&center) {
            return GenerationReport {
                skipped: true,
                ..GenerationReport::default()
            };
        }

        let mut report = GenerationReport::default();
        for x in range_x {
            for y in range_y.clone() {
                let point = Point::new(x, y);
                if self.tiles.contains_key(&point) {
                    continue;
                }
                let tile = match roll_spawn(catalog, rng) {
                    Some(entry) => {
                        report.resources += 1;
                        Tile::resource(entry)
                    }
                    None => Tile::grass(),
                };
                self.tiles.insert(point, tile);
                report.created += 1;
            }
        }
        self.explored.insert(center);

        debug!(
            x = center.x,
            y = center.y,
            created = report.created,
            resources = report.resources,
            "generation pass"
        );
        report
    }
}

/// Rolls every spawn table entry once; the last entry that hits wins.
fn roll_spawn<'a>(
    catalog: &'a ResourceCatalog,
    rng: &mut RandomNumberGenerator,
) -> Option<&'a CatalogEntry> {
    let mut winner = None;
    for (tile_type, spawn_rate) in catalog.spawn_table() {
        if rng.range(0, spawn_rate as i64 + 1) == 0 {
            winner = Some(tile_type);
        }
    }
    winner.and_then(|tile_type| catalog.lookup(tile_type))
}
