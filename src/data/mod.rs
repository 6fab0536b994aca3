pub mod resources;

use std::collections::HashSet;
use std::fmt;

use bracket_terminal::prelude::RGB;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const GRASS: Rgb = Rgb(0, 255, 0);
    pub const PLAYER: Rgb = Rgb(255, 0, 0);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

impl From<Rgb> for RGB {
    fn from(value: Rgb) -> Self {
        RGB::from_u8(value.0, value.1, value.2)
    }
}

impl From<Rgb> for image::Rgb<u8> {
    fn from(value: Rgb) -> Self {
        image::Rgb([value.0, value.1, value.2])
    }
}

impl From<image::Rgb<u8>> for Rgb {
    fn from(value: image::Rgb<u8>) -> Self {
        let [r, g, b] = value.0;
        Rgb(r, g, b)
    }
}

/// Integer tag of a grid cell. `1` is grass and never has a catalog entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileType(pub u32);

impl TileType {
    pub const GRASS: TileType = TileType(1);
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DropRule {
    pub name: String,
    pub drop_probability: f64,
    /// Inclusive `(min, max)`.
    pub quantity: (u32, u32),
}

impl DropRule {
    pub fn new(name: &str, drop_probability: f64, quantity: (u32, u32)) -> Self {
        Self {
            name: name.to_string(),
            drop_probability,
            quantity,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub tile_type: TileType,
    pub name: String,
    pub drops: Vec<DropRule>,
    pub disappearance_probability: f64,
    pub spawn_rate: u32,
    pub color: Rgb,
}

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("tile type {0} is reserved for grass")]
    ReservedTileType(TileType),
    #[error("tile type {0} is defined more than once")]
    DuplicateTileType(TileType),
    #[error("catalog entry for tile type {0} has an empty name")]
    EmptyName(TileType),
    #[error("tile type {tile_type}: spawn rate must be positive")]
    ZeroSpawnRate { tile_type: TileType },
    #[error("tile type {tile_type}: {field} probability {value} is outside [0, 1]")]
    ProbabilityOutOfRange {
        tile_type: TileType,
        field: String,
        value: f64,
    },
    #[error("tile type {tile_type}: drop '{drop}' has quantity range {min}..={max}")]
    InvertedQuantity {
        tile_type: TileType,
        drop: String,
        min: u32,
        max: u32,
    },
}

/// Ordered table of harvestable tile types.
///
/// Order is significant: generation rolls every entry per cell and the last
/// successful roll decides the cell's type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceCatalog {
    entries: Vec<CatalogEntry>,
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ResourceCatalog {
    pub fn builtin() -> Self {
        Self {
            entries: resources::builtin_entries(),
        }
    }

    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut seen = HashSet::new();
        for entry in &self.entries {
            let tile_type = entry.tile_type;
            if tile_type.0 <= TileType::GRASS.0 {
                return Err(CatalogError::ReservedTileType(tile_type));
            }
            if !seen.insert(tile_type) {
                return Err(CatalogError::DuplicateTileType(tile_type));
            }
            if entry.name.trim().is_empty() {
                return Err(CatalogError::EmptyName(tile_type));
            }
            if entry.spawn_rate == 0 {
                return Err(CatalogError::ZeroSpawnRate { tile_type });
            }
            check_probability(tile_type, "disappearance", entry.disappearance_probability)?;
            for drop in &entry.drops {
                check_probability(tile_type, &drop.name, drop.drop_probability)?;
                let (min, max) = drop.quantity;
                if min > max {
                    return Err(CatalogError::InvertedQuantity {
                        tile_type,
                        drop: drop.name.clone(),
                        min,
                        max,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn lookup(&self, tile_type: TileType) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.tile_type == tile_type)
    }

    pub fn spawn_table(&self) -> impl Iterator<Item = (TileType, u32)> + '_ {
        self.entries
            .iter()
            .map(|entry| (entry.tile_type, entry.spawn_rate))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn color_of(&self, tile_type: TileType) -> Rgb {
        self.lookup(tile_type)
            .map_or(Rgb::GRASS, |entry| entry.color)
    }
}

fn check_probability(tile_type: TileType, field: &str, value: f64) -> Result<(), CatalogError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(CatalogError::ProbabilityOutOfRange {
            tile_type,
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_is_valid() {
        let catalog = ResourceCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert!(catalog.lookup(TileType(2)).is_some());
        assert!(catalog.lookup(TileType(3)).is_some());
    }

    #[test]
    fn grass_and_unknown_types_have_no_entry() {
        let catalog = ResourceCatalog::builtin();
        assert!(catalog.lookup(TileType::GRASS).is_none());
        assert!(catalog.lookup(TileType(99)).is_none());
        assert_eq!(catalog.color_of(TileType::GRASS), Rgb::GRASS);
    }

    #[test]
    fn spawn_table_keeps_definition_order() {
        let catalog = ResourceCatalog::builtin();
        let order: Vec<TileType> = catalog.spawn_table().map(|(tile_type, _)| tile_type).collect();
        assert_eq!(order, vec![TileType(2), TileType(3)]);
    }

    fn entry(tile_type: u32) -> CatalogEntry {
        CatalogEntry {
            tile_type: TileType(tile_type),
            name: "bush".to_string(),
            drops: vec![DropRule::new("berry", 0.5, (1, 2))],
            disappearance_probability: 0.5,
            spawn_rate: 10,
            color: Rgb(10, 20, 30),
        }
    }

    #[test]
    fn rejects_reserved_and_duplicate_types() {
        assert_eq!(
            ResourceCatalog::new(vec![entry(1)]),
            Err(CatalogError::ReservedTileType(TileType(1)))
        );
        assert_eq!(
            ResourceCatalog::new(vec![entry(4), entry(4)]),
            Err(CatalogError::DuplicateTileType(TileType(4)))
        );
    }

    #[test]
    fn rejects_bad_probabilities_and_ranges() {
        let mut bad = entry(4);
        bad.disappearance_probability = 1.5;
        assert!(matches!(
            ResourceCatalog::new(vec![bad]),
            Err(CatalogError::ProbabilityOutOfRange { .. })
        ));

        let mut inverted = entry(4);
        inverted.drops[0].quantity = (3, 1);
        assert!(matches!(
            ResourceCatalog::new(vec![inverted]),
            Err(CatalogError::InvertedQuantity { min: 3, max: 1, .. })
        ));

        let mut never = entry(4);
        never.spawn_rate = 0;
        assert_eq!(
            ResourceCatalog::new(vec![never]),
            Err(CatalogError::ZeroSpawnRate {
                tile_type: TileType(4)
            })
        );
    }

    #[test]
    fn catalog_parses_from_json() {
        let text = r#"[{
            "tile_type": 5,
            "name": "cactus",
            "drops": [{"name": "spine", "drop_probability": 1.0, "quantity": [1, 4]}],
            "disappearance_probability": 0.0,
            "spawn_rate": 30,
            "color": [40, 160, 60]
        }]"#;
        let catalog: ResourceCatalog = serde_json::from_str(text).unwrap();
        let cactus = catalog.lookup(TileType(5)).unwrap();
        assert_eq!(cactus.drops[0].quantity, (1, 4));
        assert_eq!(cactus.color, Rgb(40, 160, 60));
    }
}
