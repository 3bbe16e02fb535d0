use nalgebra::{Vector2, Vector3};
use noise::{NoiseFn, OpenSimplex};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_PI_2, TAU};
use std::fmt;

use super::world::{TileKey, WorldConfig};
use crate::utils::{clamp01, RngManager};

/// Source of static building placements for a world tile.
pub trait TileContentProvider {
    fn buildings(&self, tile: TileKey) -> Vec<BuildingPlacement>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildingArchetype {
    pub id: &'static str,
    /// Footprint along local X [m]
    pub width: f32,
    /// Footprint along local Z [m]
    pub depth: f32,
    pub height: f32,
    pub has_collider: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildingKind {
    #[serde(rename = "cottage-1")]
    Cottage,
    #[serde(rename = "house-2")]
    House,
    #[serde(rename = "row-3")]
    Row,
    #[serde(rename = "midrise-4")]
    Midrise,
    #[serde(rename = "tower-5")]
    Tower,
    #[serde(rename = "warehouse-1")]
    Warehouse,
    #[serde(rename = "hangar-2")]
    Hangar,
    #[serde(rename = "watchtower-3")]
    Watchtower,
    #[serde(rename = "radar-hut-2")]
    RadarHut,
}

impl BuildingKind {
    pub const ALL: [BuildingKind; 9] = [
        BuildingKind::Cottage,
        BuildingKind::House,
        BuildingKind::Row,
        BuildingKind::Midrise,
        BuildingKind::Tower,
        BuildingKind::Warehouse,
        BuildingKind::Hangar,
        BuildingKind::Watchtower,
        BuildingKind::RadarHut,
    ];

    pub const fn archetype(self) -> BuildingArchetype {
        const fn arch(id: &'static str, width: f32, depth: f32, height: f32, has_collider: bool) -> BuildingArchetype {
            BuildingArchetype {
                id,
                width,
                depth,
                height,
                has_collider,
            }
        }

        match self {
            BuildingKind::Cottage => arch("cottage-1", 4.0, 4.5, 3.0, false),
            BuildingKind::House => arch("house-2", 4.8, 5.2, 6.0, true),
            BuildingKind::Row => arch("row-3", 7.5, 4.5, 9.0, true),
            BuildingKind::Midrise => arch("midrise-4", 8.0, 6.5, 12.0, true),
            BuildingKind::Tower => arch("tower-5", 9.0, 7.5, 15.0, true),
            BuildingKind::Warehouse => arch("warehouse-1", 10.0, 7.0, 3.0, true),
            BuildingKind::Hangar => arch("hangar-2", 14.0, 9.0, 6.0, true),
            BuildingKind::Watchtower => arch("watchtower-3", 3.0, 3.0, 9.0, true),
            BuildingKind::RadarHut => arch("radar-hut-2", 4.0, 4.0, 6.0, true),
        }
    }
}

const VILLAGE_VARIANTS: &[BuildingKind] = &[BuildingKind::Cottage, BuildingKind::House, BuildingKind::Row];
const TOWN_VARIANTS: &[BuildingKind] = &[
    BuildingKind::House,
    BuildingKind::Row,
    BuildingKind::Midrise,
    BuildingKind::Tower,
    BuildingKind::Warehouse,
    BuildingKind::Hangar,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Biome {
    Temperate,
    Farmland,
    Industrial,
    Greenbelt,
}

impl Biome {
    /// Mean building count per tile before jitter
    pub fn building_density(self) -> f32 {
        match self {
            Biome::Temperate => 0.2,
            Biome::Farmland => 0.25,
            Biome::Industrial => 0.4,
            Biome::Greenbelt => 0.1,
        }
    }

    pub fn building_variants(self) -> &'static [BuildingKind] {
        match self {
            Biome::Temperate => &[BuildingKind::Cottage, BuildingKind::House],
            Biome::Farmland => &[BuildingKind::Cottage, BuildingKind::House, BuildingKind::Warehouse],
            Biome::Industrial => &[
                BuildingKind::Warehouse,
                BuildingKind::Hangar,
                BuildingKind::Watchtower,
                BuildingKind::RadarHut,
            ],
            Biome::Greenbelt => &[BuildingKind::Cottage],
        }
    }
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Biome::Temperate => "temperate",
            Biome::Farmland => "farmland",
            Biome::Industrial => "industrial",
            Biome::Greenbelt => "greenbelt",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SettlementKind {
    Village,
    Town,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BuildingPlacement {
    pub kind: BuildingKind,
    /// Ground-level anchor in world space
    pub position: Vector3<f32>,
    /// Yaw [rad], always a multiple of a quarter turn
    pub rotation: f32,
}

impl BuildingPlacement {
    pub fn archetype(&self) -> BuildingArchetype {
        self.kind.archetype()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileDressing {
    pub tile: TileKey,
    pub biome: Biome,
    pub road_column: bool,
    pub road_row: bool,
    pub settlement: Option<SettlementKind>,
    pub buildings: Vec<BuildingPlacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropDressingConfig {
    pub seed: u64,
    pub max_buildings_per_tile: u32,
    /// Every n-th tile column and row carries a road
    pub road_spacing_tiles: i32,
    /// Frequency of the biome noise field, in cycles per tile
    pub biome_noise_scale: f64,
    pub settlement_village_chance: f32,
    pub settlement_town_chance: f32,
    pub settlement_road_chance: f32,
    pub settlement_village_buildings: CountRange,
    pub settlement_town_buildings: CountRange,
    /// Cluster radius as a fraction of the tile size
    pub settlement_village_radius: f32,
    pub settlement_town_radius: f32,
}

impl Default for PropDressingConfig {
    fn default() -> Self {
        Self {
            seed: 48291,
            max_buildings_per_tile: 6,
            road_spacing_tiles: 6,
            biome_noise_scale: 0.37,
            settlement_village_chance: 0.35,
            settlement_town_chance: 0.2,
            settlement_road_chance: 0.12,
            settlement_village_buildings: CountRange { min: 2, max: 4 },
            settlement_town_buildings: CountRange { min: 3, max: 6 },
            settlement_village_radius: 0.35,
            settlement_town_radius: 0.45,
        }
    }
}

/// Deterministic per-tile building layout.
///
/// Every tile owns its own RNG streams derived from the dressing seed and the
/// tile key, so a tile always dresses the same way regardless of visit order.
pub struct PropDressing {
    config: PropDressingConfig,
    world: WorldConfig,
    rng: RngManager,
    biome_noise: OpenSimplex,
}

impl PropDressing {
    pub fn new(config: PropDressingConfig, world: WorldConfig) -> Self {
        Self {
            rng: RngManager::new(config.seed),
            biome_noise: OpenSimplex::new(config.seed as u32),
            config,
            world,
        }
    }

    pub fn config(&self) -> &PropDressingConfig {
        &self.config
    }

    pub fn biome_at(&self, tile: TileKey) -> Biome {
        let scale = self.config.biome_noise_scale;
        let sample = self.biome_noise.get([
            (f64::from(tile.x) + 0.5) * scale,
            (f64::from(tile.z) + 0.5) * scale,
        ]) as f32;
        let roll = clamp01(0.5 + sample);

        if roll < 0.35 {
            Biome::Temperate
        } else if roll < 0.6 {
            Biome::Farmland
        } else if roll < 0.85 {
            Biome::Greenbelt
        } else {
            Biome::Industrial
        }
    }

    pub fn is_road_column(&self, tile: TileKey) -> bool {
        self.config.road_spacing_tiles > 0 && tile.x.rem_euclid(self.config.road_spacing_tiles) == 0
    }

    pub fn is_road_row(&self, tile: TileKey) -> bool {
        self.config.road_spacing_tiles > 0 && tile.z.rem_euclid(self.config.road_spacing_tiles) == 0
    }

    pub fn tile_dressing(&self, tile: TileKey) -> TileDressing {
        let biome = self.biome_at(tile);
        let origin = self.world.tile_origin(tile);
        let size = self.world.tile_size;
        let mut random = self.rng.stream(&format!("buildings:{tile}"));

        let count = sample_count(
            biome.building_density(),
            self.config.max_buildings_per_tile,
            &mut random,
        );

        let mut buildings = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let kind = pick(biome.building_variants(), &mut random);
            let x = origin.x + random.gen::<f32>() * size;
            let z = origin.y + random.gen::<f32>() * size;
            buildings.push(BuildingPlacement {
                kind,
                position: Vector3::new(x, 0.0, z),
                rotation: cardinal_rotation(&mut random),
            });
        }

        let settlement = self.place_settlement(tile, &mut buildings);

        TileDressing {
            tile,
            biome,
            road_column: self.is_road_column(tile),
            road_row: self.is_road_row(tile),
            settlement,
            buildings,
        }
    }

    fn place_settlement(&self, tile: TileKey, buildings: &mut Vec<BuildingPlacement>) -> Option<SettlementKind> {
        let mut random = self.rng.stream(&format!("settlement:{tile}"));
        let kind = self.pick_settlement_kind(tile, &mut random)?;

        let (variants, range, radius_fraction) = match kind {
            SettlementKind::Village => (
                VILLAGE_VARIANTS,
                self.config.settlement_village_buildings,
                self.config.settlement_village_radius,
            ),
            SettlementKind::Town => (
                TOWN_VARIANTS,
                self.config.settlement_town_buildings,
                self.config.settlement_town_radius,
            ),
        };

        let size = self.world.tile_size;
        let origin = self.world.tile_origin(tile);
        let max_corner = origin + Vector2::new(size, size);
        let jitter = size * 0.15;
        let center = self.world.tile_center(tile)
            + Vector2::new(
                (random.gen::<f32>() - 0.5) * jitter,
                (random.gen::<f32>() - 0.5) * jitter,
            );

        let span = range.max.saturating_sub(range.min) + 1;
        let count = range.min + ((random.gen::<f32>() * span as f32) as u32).min(span - 1);
        let radius = radius_fraction * size;

        for _ in 0..count {
            let angle = random.gen::<f32>() * TAU;
            let distance = random.gen::<f32>().sqrt() * radius;
            let x = (center.x + angle.cos() * distance).clamp(origin.x, max_corner.x);
            let z = (center.y + angle.sin() * distance).clamp(origin.y, max_corner.y);
            let rotation = cardinal_rotation(&mut random);
            let kind = pick(variants, &mut random);
            buildings.push(BuildingPlacement {
                kind,
                position: Vector3::new(x, 0.0, z),
                rotation,
            });
        }

        Some(kind)
    }

    fn pick_settlement_kind(&self, tile: TileKey, random: &mut ChaCha8Rng) -> Option<SettlementKind> {
        let on_column = self.is_road_column(tile);
        let on_row = self.is_road_row(tile);
        let roll = random.gen::<f32>();

        if on_column && on_row {
            if roll < self.config.settlement_town_chance {
                Some(SettlementKind::Town)
            } else if roll < self.config.settlement_town_chance + self.config.settlement_village_chance {
                Some(SettlementKind::Village)
            } else {
                None
            }
        } else if (on_column || on_row) && roll < self.config.settlement_road_chance {
            Some(SettlementKind::Village)
        } else {
            None
        }
    }
}

impl TileContentProvider for PropDressing {
    fn buildings(&self, tile: TileKey) -> Vec<BuildingPlacement> {
        self.tile_dressing(tile).buildings
    }
}

/// Jittered count around `density`, with the fractional part resolved by a coin flip.
fn sample_count<R: Rng + ?Sized>(density: f32, max_count: u32, random: &mut R) -> u32 {
    let jitter = 0.7 + random.gen::<f32>() * 0.6;
    let target = density * jitter;
    let base = target.floor();
    let extra = if random.gen::<f32>() < target - base { 1 } else { 0 };
    (base as u32 + extra).min(max_count)
}

fn pick<R: Rng + ?Sized>(items: &[BuildingKind], random: &mut R) -> BuildingKind {
    let index = ((random.gen::<f32>() * items.len() as f32) as usize).min(items.len() - 1);
    items[index]
}

fn cardinal_rotation<R: Rng + ?Sized>(random: &mut R) -> f32 {
    (random.gen::<f32>() * 4.0).floor().min(3.0) * FRAC_PI_2
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dressing() -> PropDressing {
        PropDressing::new(PropDressingConfig::default(), WorldConfig::default())
    }

    fn all_tiles() -> impl Iterator<Item = TileKey> {
        (0..10).flat_map(|x| (0..10).map(move |z| TileKey::new(x, z)))
    }

    #[test]
    fn test_same_tile_same_dressing() {
        let a = dressing();
        let b = dressing();
        for tile in all_tiles() {
            assert_eq!(a.tile_dressing(tile), b.tile_dressing(tile));
        }
    }

    #[test]
    fn test_buildings_stay_inside_their_tile() {
        let props = dressing();
        let world = WorldConfig::default();
        for tile in all_tiles() {
            let origin = world.tile_origin(tile);
            for building in props.buildings(tile) {
                assert!(building.position.x >= origin.x && building.position.x <= origin.x + 10.0);
                assert!(building.position.z >= origin.y && building.position.z <= origin.y + 10.0);
                assert_eq!(building.position.y, 0.0);
            }
        }
    }

    #[test]
    fn test_settlements_only_on_roads() {
        let props = dressing();
        for tile in all_tiles() {
            let tile_dressing = props.tile_dressing(tile);
            if tile_dressing.settlement.is_some() {
                assert!(tile_dressing.road_column || tile_dressing.road_row, "settlement off-road at {tile}");
            }
        }
    }

    #[test]
    fn test_biome_variants_match_biome() {
        let props = dressing();
        for tile in all_tiles() {
            let tile_dressing = props.tile_dressing(tile);
            if tile_dressing.settlement.is_none() {
                let allowed = tile_dressing.biome.building_variants();
                assert!(tile_dressing.buildings.iter().all(|b| allowed.contains(&b.kind)));
                assert!(tile_dressing.buildings.len() as u32 <= props.config().max_buildings_per_tile);
            }
        }
    }

    #[test]
    fn test_sample_count_is_capped() {
        let mut random = RngManager::new(5).stream("count");
        for _ in 0..100 {
            assert!(sample_count(40.0, 6, &mut random) <= 6);
        }
        assert_eq!(sample_count(0.0, 6, &mut random), 0);
    }

    #[test]
    fn test_archetype_catalogue() {
        let without_collider: Vec<&str> = BuildingKind::ALL
            .iter()
            .map(|kind| kind.archetype())
            .filter(|archetype| !archetype.has_collider)
            .map(|archetype| archetype.id)
            .collect();
        assert_eq!(without_collider, vec!["cottage-1"]);
        assert_eq!(BuildingKind::Hangar.archetype().width, 14.0);
    }
}
