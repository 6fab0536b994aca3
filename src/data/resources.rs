use super::{CatalogEntry, DropRule, Rgb, TileType};

#[derive(Clone, Debug)]
pub struct ResourceTemplate {
    pub tile_type: u32,
    pub name: &'static str,
    pub drops: &'static [(&'static str, f64, (u32, u32))],
    pub disappearance_probability: f64,
    pub spawn_rate: u32,
    pub color: Rgb,
}

impl ResourceTemplate {
    pub const fn new(
        tile_type: u32,
        name: &'static str,
        drops: &'static [(&'static str, f64, (u32, u32))],
        disappearance_probability: f64,
        spawn_rate: u32,
        color: Rgb,
    ) -> Self {
        Self {
            tile_type,
            name,
            drops,
            disappearance_probability,
            spawn_rate,
            color,
        }
    }

    pub fn to_entry(&self) -> CatalogEntry {
        CatalogEntry {
            tile_type: TileType(self.tile_type),
            name: self.name.to_string(),
            drops: self
                .drops
                .iter()
                .map(|&(name, probability, quantity)| DropRule::new(name, probability, quantity))
                .collect(),
            disappearance_probability: self.disappearance_probability,
            spawn_rate: self.spawn_rate,
            color: self.color,
        }
    }
}

pub const TREE: ResourceTemplate = ResourceTemplate::new(
    2,
    "tree",
    &[
        ("wood", 1.0, (2, 3)),
        ("apple", 0.05, (1, 1)),
        ("fairy", 0.001, (1, 1)),
    ],
    0.2,
    50,
    Rgb(0, 100, 0),
);

pub const ROCK: ResourceTemplate = ResourceTemplate::new(
    3,
    "rock",
    &[("stone", 1.0, (1, 2)), ("flint", 0.1, (1, 1))],
    0.1,
    120,
    Rgb(139, 69, 19),
);

pub fn builtin_entries() -> Vec<CatalogEntry> {
    [TREE, ROCK].iter().map(ResourceTemplate::to_entry).collect()
}
