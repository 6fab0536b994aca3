use std::fmt;

use bracket_geometry::prelude::Point;
use bracket_random::prelude::RandomNumberGenerator;
use tracing::{debug, info};

use crate::data::ResourceCatalog;
use crate::map::{Tile, TileKind, WorldGrid};

/// Neighbour order used by `harvest`: north, east, south, west.
pub const HARVEST_DIRECTIONS: [Point; 4] = [
    Point { x: 0, y: 1 },
    Point { x: 1, y: 0 },
    Point { x: 0, y: -1 },
    Point { x: -1, y: 0 },
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventorySlot {
    pub name: String,
    pub quantity: u32,
}

impl fmt::Display for InventorySlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.quantity)
    }
}

/// Item counts in order of first acquisition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    pub slots: Vec<InventorySlot>,
}

impl Inventory {
    pub fn add(&mut self, name: &str, quantity: u32) {
        match self.slots.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => slot.quantity = slot.quantity.saturating_add(quantity),
            None => self.slots.push(InventorySlot {
                name: name.to_string(),
                quantity,
            }),
        }
    }

    pub fn quantity(&self, name: &str) -> u32 {
        self.slots
            .iter()
            .find(|slot| slot.name == name)
            .map_or(0, |slot| slot.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn lines(&self) -> Vec<String> {
        self.slots.iter().map(ToString::to_string).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceDrop {
    pub name: String,
    pub quantity: u32,
    pub source: Point,
}

impl fmt::Display for ResourceDrop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.name, self.quantity)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HarvestReport {
    pub drops: Vec<ResourceDrop>,
    pub depleted: Vec<Point>,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub position: Point,
    pub inventory: Inventory,
}

impl Player {
    pub fn new(position: Point) -> Self {
        Self {
            position,
            inventory: Inventory::default(),
        }
    }

    pub fn step(&mut self, delta: Point) {
        self.position = self.position + delta;
    }

    /// Gathers from every harvestable neighbour.
    ///
    /// Each drop rule rolls independently, then the tile rolls once against its
    /// disappearance chance and, on success, reverts to grass for good.
    pub fn harvest(
        &mut self,
        grid: &mut WorldGrid,
        catalog: &ResourceCatalog,
        rng: &mut RandomNumberGenerator,
    ) -> HarvestReport {
        let mut report = HarvestReport::default();
        for direction in HARVEST_DIRECTIONS {
            let target = self.position + direction;
            let TileKind::Resource(tile_type) = grid.tile_or_grass(target).kind else {
                continue;
            };
            let Some(entry) = catalog.lookup(tile_type) else {
                continue;
            };

            for rule in &entry.drops {
                if rng.rand::<f64>() < rule.drop_probability {
                    let quantity = roll_quantity(rule.quantity, rng);
                    self.inventory.add(&rule.name, quantity);
                    info!(resource = %rule.name, quantity, "obtained");
                    report.drops.push(ResourceDrop {
                        name: rule.name.clone(),
                        quantity,
                        source: target,
                    });
                }
            }

            if rng.rand::<f64>() < entry.disappearance_probability {
                grid.set_tile(target, Tile::grass());
                debug!(x = target.x, y = target.y, tile = %entry.name, "tile depleted");
                report.depleted.push(target);
            }
        }
        report
    }
}

/// Uniform draw from the inclusive `(min, max)` range.
fn roll_quantity((min, max): (u32, u32), rng: &mut RandomNumberGenerator) -> u32 {
    let drawn = rng.range(u64::from(min), u64::from(max) + 1);
    u32::try_from(drawn).unwrap_or(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_accumulates_in_acquisition_order() {
        let mut inventory = Inventory::default();
        inventory.add("wood", 2);
        inventory.add("apple", 1);
        inventory.add("wood", 3);

        assert_eq!(inventory.quantity("wood"), 5);
        assert_eq!(inventory.quantity("fairy"), 0);
        assert_eq!(inventory.lines(), vec!["wood: 5", "apple: 1"]);
    }

    #[test]
    fn drop_formats_as_console_line() {
        let drop = ResourceDrop {
            name: "stone".to_string(),
            quantity: 2,
            source: Point::new(1, 0),
        };
        assert_eq!(drop.to_string(), "stone x 2");
    }

    #[test]
    fn step_combines_deltas() {
        let mut player = Player::new(Point::new(0, 0));
        player.step(Point::new(1, -1));
        player.step(Point::new(1, 0));
        assert_eq!(player.position, Point::new(2, -1));
    }

    #[test]
    fn quantity_covers_both_bounds() {
        let mut rng = RandomNumberGenerator::seeded(9);
        let mut seen = [false; 2];
        for _ in 0..200 {
            let quantity = roll_quantity((2, 3), &mut rng);
            assert!((2..=3).contains(&quantity));
            seen[(quantity - 2) as usize] = true;
        }
        assert_eq!(seen, [true, true]);
        assert_eq!(roll_quantity((u32::MAX, u32::MAX), &mut rng), u32::MAX);
        assert_eq!(roll_quantity((0, 0), &mut rng), 0);
    }

    #[test]
    fn harvest_on_unexplored_neighbours_is_harmless() {
        let mut grid = WorldGrid::empty();
        let mut player = Player::new(Point::new(100, 100));
        let mut rng = RandomNumberGenerator::seeded(1);
        let report = player.harvest(&mut grid, &ResourceCatalog::builtin(), &mut rng);

        assert_eq!(report, HarvestReport::default());
        assert!(grid.is_empty());
        assert!(player.inventory.is_empty());
    }
}
