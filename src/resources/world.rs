use nalgebra::Vector2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;
use std::fmt;

use super::errors::{require_finite, require_ordered, require_positive, Result, SimError};

/// Axis-aligned horizontal extent of the playable world [m]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl WorldBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn depth(&self) -> f32 {
        self.max_z - self.min_z
    }

    pub fn clamp(&self, point: Vector2<f32>) -> Vector2<f32> {
        Vector2::new(
            point.x.clamp(self.min_x, self.max_x),
            point.y.clamp(self.min_z, self.max_z),
        )
    }

    pub fn contains(&self, point: Vector2<f32>) -> bool {
        (self.min_x..=self.max_x).contains(&point.x) && (self.min_z..=self.max_z).contains(&point.y)
    }
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            min_x: -50.0,
            max_x: 50.0,
            min_z: -50.0,
            max_z: 50.0,
        }
    }
}

/// Static ground slab layout for streamed terrain tiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainPhysicsConfig {
    /// Tiles kept live around the player in each direction
    pub tile_radius: i32,
    /// Height of the slab center; the top surface sits at `ground_offset_y + collider_half_height`
    pub ground_offset_y: f32,
    pub collider_half_height: f32,
    pub friction: f32,
}

impl Default for TerrainPhysicsConfig {
    fn default() -> Self {
        Self {
            tile_radius: 2,
            ground_offset_y: -2.0,
            collider_half_height: 2.0,
            friction: 1.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnZone {
    pub id: String,
    /// World (x, z)
    pub center: Vector2<f32>,
    pub radius: f32,
}

impl SpawnZone {
    pub fn new(id: &str, x: f32, z: f32, radius: f32) -> Self {
        Self {
            id: id.to_string(),
            center: Vector2::new(x, z),
            radius,
        }
    }
}

/// Identity of a world tile. Displays as `"x:z"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileKey {
    pub x: i32,
    pub z: i32,
}

impl TileKey {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.x, self.z)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub bounds: WorldBounds,
    pub tile_size: f32,
    pub physics: TerrainPhysicsConfig,
    pub spawn_zones: Vec<SpawnZone>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            bounds: WorldBounds::default(),
            tile_size: 10.0,
            physics: TerrainPhysicsConfig::default(),
            spawn_zones: vec![
                SpawnZone::new("north", 0.0, -30.0, 8.0),
                SpawnZone::new("south", 0.0, 30.0, 8.0),
                SpawnZone::new("east", 30.0, 0.0, 8.0),
                SpawnZone::new("west", -30.0, 0.0, 8.0),
            ],
        }
    }
}

impl WorldConfig {
    pub fn validate(&self) -> Result<()> {
        require_positive("tile_size", self.tile_size)?;
        require_ordered("bounds.min_x", self.bounds.min_x, "bounds.max_x", self.bounds.max_x)?;
        require_ordered("bounds.min_z", self.bounds.min_z, "bounds.max_z", self.bounds.max_z)?;
        if !(self.bounds.width() > 0.0 && self.bounds.depth() > 0.0) {
            return Err(SimError::InvalidConfig(
                "world bounds must have a positive extent".to_string(),
            ));
        }
        if self.spawn_zones.is_empty() {
            return Err(SimError::InvalidConfig(
                "at least one spawn zone is required".to_string(),
            ));
        }
        for zone in &self.spawn_zones {
            require_finite(&format!("spawn zone {} center.x", zone.id), zone.center.x)?;
            require_finite(&format!("spawn zone {} center.z", zone.id), zone.center.y)?;
            if !(zone.radius.is_finite() && zone.radius >= 0.0) {
                return Err(SimError::InvalidConfig(format!(
                    "spawn zone {} radius must be non-negative, got {}",
                    zone.id, zone.radius
                )));
            }
        }
        if self.physics.tile_radius < 0 {
            return Err(SimError::InvalidConfig(format!(
                "terrain tile_radius must be non-negative, got {}",
                self.physics.tile_radius
            )));
        }
        require_finite("ground_offset_y", self.physics.ground_offset_y)?;
        require_positive("collider_half_height", self.physics.collider_half_height)?;
        require_finite("friction", self.physics.friction)
    }

    /// Number of tiles along X and Z.
    pub fn tile_count(&self) -> (i32, i32) {
        (
            (self.bounds.width() / self.tile_size).round() as i32,
            (self.bounds.depth() / self.tile_size).round() as i32,
        )
    }

    pub fn clamp_to_bounds(&self, point: Vector2<f32>) -> Vector2<f32> {
        self.bounds.clamp(point)
    }

    /// Tile containing the world point `(x, z)`.
    ///
    /// Points outside the world map to the nearest edge tile; the max edge
    /// itself belongs to the last tile.
    pub fn tile_index_for_position(&self, x: f32, z: f32) -> TileKey {
        let clamped = self.clamp_to_bounds(Vector2::new(x, z));
        let (tiles_x, tiles_z) = self.tile_count();
        let tile_x = ((clamped.x - self.bounds.min_x) / self.tile_size).floor() as i32;
        let tile_z = ((clamped.y - self.bounds.min_z) / self.tile_size).floor() as i32;
        TileKey::new(
            tile_x.clamp(0, (tiles_x - 1).max(0)),
            tile_z.clamp(0, (tiles_z - 1).max(0)),
        )
    }

    pub fn tile_center(&self, tile: TileKey) -> Vector2<f32> {
        Vector2::new(
            self.bounds.min_x + self.tile_size * (tile.x as f32 + 0.5),
            self.bounds.min_z + self.tile_size * (tile.z as f32 + 0.5),
        )
    }

    /// Minimum (x, z) corner of a tile
    pub fn tile_origin(&self, tile: TileKey) -> Vector2<f32> {
        Vector2::new(
            self.bounds.min_x + self.tile_size * tile.x as f32,
            self.bounds.min_z + self.tile_size * tile.z as f32,
        )
    }

    pub fn contains_tile(&self, tile: TileKey) -> bool {
        let (tiles_x, tiles_z) = self.tile_count();
        (0..tiles_x).contains(&tile.x) && (0..tiles_z).contains(&tile.z)
    }

    /// Square window of tiles around `center`, clipped to the world.
    pub fn tiles_within_radius(&self, center: TileKey, radius: i32) -> Vec<TileKey> {
        let (tiles_x, tiles_z) = self.tile_count();
        let x_range =
            center.x.saturating_sub(radius).max(0)..=center.x.saturating_add(radius).min(tiles_x - 1);
        let z_range =
            center.z.saturating_sub(radius).max(0)..=center.z.saturating_add(radius).min(tiles_z - 1);

        let mut tiles = Vec::new();
        for x in x_range {
            for z in z_range.clone() {
                tiles.push(TileKey::new(x, z));
            }
        }
        tiles
    }
}

/// Picks a uniformly distributed point inside a random spawn zone.
///
/// Draws three values from `rng`: zone, angle, radius. The result is clamped
/// to the world bounds.
pub fn pick_spawn_point<R: Rng + ?Sized>(world: &WorldConfig, rng: &mut R) -> Result<Vector2<f32>> {
    if world.spawn_zones.is_empty() {
        return Err(SimError::InvalidConfig(
            "cannot pick a spawn point without spawn zones".to_string(),
        ));
    }

    let count = world.spawn_zones.len();
    let zone_index = ((rng.gen::<f32>() * count as f32).floor() as usize).min(count - 1);
    let zone = &world.spawn_zones[zone_index];

    let angle = rng.gen::<f32>() * TAU;
    let radius = rng.gen::<f32>().sqrt() * zone.radius;
    let raw = zone.center + Vector2::new(angle.cos(), angle.sin()) * radius;

    Ok(world.clamp_to_bounds(raw))
}
