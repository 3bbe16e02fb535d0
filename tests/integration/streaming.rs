use heliflight::resources::TileKey;
use nalgebra::Vector3;

use crate::common::{assert_physics_accounted, create_pinned_world, TestSimBuilder};

#[test]
fn test_initial_window_around_spawn() {
    let sim = TestSimBuilder::new().with_world(create_pinned_world(-30.0, 0.0)).build();
    let world = &sim.sim.world;

    // (-30, 0) sits in tile 2:5; the 5x5 window is fully inside the world.
    assert_eq!(world.terrain.tile_count(), 25);
    assert!(world.terrain.contains_tile(TileKey::new(2, 5)));
    assert!(world.terrain.contains_tile(TileKey::new(0, 3)));
    assert!(!world.terrain.contains_tile(TileKey::new(5, 5)));
    assert_physics_accounted(world);
}

#[test]
fn test_resting_does_not_restream() {
    let mut sim = TestSimBuilder::new().with_seed(7).build();
    let colliders = sim.sim.world.physics.collider_count();

    sim.run_seconds(1.0);
    assert_eq!(sim.sim.world.physics.collider_count(), colliders);
    assert_physics_accounted(&sim.sim.world);
}

#[test]
fn test_window_follows_airframe() {
    let mut sim = TestSimBuilder::new().with_world(create_pinned_world(-30.0, 0.0)).build();
    sim.teleport(Vector3::new(5.0, 20.0, 5.0));
    sim.run_steps(1);

    let world = &sim.sim.world;
    assert!(world.terrain.contains_tile(TileKey::new(5, 5)));
    assert!(world.terrain.contains_tile(TileKey::new(3, 7)));
    assert!(!world.terrain.contains_tile(TileKey::new(2, 5)));
    assert_eq!(world.terrain.tile_count(), 25);
    assert_physics_accounted(world);
}

#[test]
fn test_buildings_stream_with_terrain() {
    let mut sim = TestSimBuilder::new()
        .with_config(heliflight::SimulationConfig::default())
        .with_world(create_pinned_world(-30.0, 0.0))
        .build();
    assert_physics_accounted(&sim.sim.world);

    sim.teleport(Vector3::new(40.0, 30.0, 40.0));
    sim.run_steps(1);
    assert_eq!(sim.sim.world.props.tile_count(), 9);
    assert_physics_accounted(&sim.sim.world);
}

#[test]
fn test_dispose_releases_all_physics() {
    let mut sim = TestSimBuilder::new().build();
    sim.run_steps(10);
    sim.sim.world.dispose();

    let world = &sim.sim.world;
    assert!(world.player_transform().is_none());
    assert_eq!(world.physics.body_count(), 0);
    assert_eq!(world.physics.collider_count(), 0);
    assert_eq!(world.terrain.tile_count(), 0);
    assert_eq!(world.props.tile_count(), 0);
}
