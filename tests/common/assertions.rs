use approx::assert_relative_eq;
use heliflight::{
    components::{AltimeterState, LandingState},
    physics::EntityTransform,
    SimWorld,
};
use nalgebra::Vector3;

/// Assert that a transform holds only finite values
#[track_caller]
pub fn assert_transform_valid(transform: &EntityTransform) {
    assert!(
        transform.translation.iter().all(|v| v.is_finite()),
        "Translation is not finite: {:?}",
        transform.translation
    );
    assert!(
        transform.rotation.coords.iter().all(|v| v.is_finite()),
        "Rotation is not finite: {:?}",
        transform.rotation
    );
}

#[track_caller]
pub fn assert_position_near(actual: &Vector3<f32>, expected: &Vector3<f32>, epsilon: f32) {
    assert_relative_eq!(actual.x, expected.x, epsilon = epsilon);
    assert_relative_eq!(actual.y, expected.y, epsilon = epsilon);
    assert_relative_eq!(actual.z, expected.z, epsilon = epsilon);
}

/// Assert a settled touchdown
#[track_caller]
pub fn assert_landed(altimeter: &AltimeterState) {
    assert!(altimeter.is_grounded, "Expected grounded, got {:?}", altimeter);
    assert_eq!(altimeter.landing_state, LandingState::Landed);
    assert!(altimeter.altitude <= 0.9, "Altitude {} above ground threshold", altimeter.altitude);
}

/// Every collider in the physics world belongs to the airframe or a streamed tile.
#[track_caller]
pub fn assert_physics_accounted(world: &SimWorld) {
    let streamed = world.terrain.collider_count() + world.props.collider_count();
    assert_eq!(world.physics.collider_count(), streamed + 1);
    assert_eq!(world.physics.body_count(), streamed + 1);
}
