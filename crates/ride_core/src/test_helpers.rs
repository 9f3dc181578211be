//! Shared fixtures for tests: a minimal demo world, addresses in the
//! original demo's San Francisco area, and a spawnable test driver.

use bevy_ecs::prelude::{Entity, World};

use crate::ecs::{
    Address, Driver, DriverId, DriverProfile, Position, User, UserId, Vehicle, VehicleKind,
};
use crate::geo::{cell_for, LatLng};
use crate::scenario::{build_demo, DemoParams};
use crate::spatial::SpatialIndex;

/// The demo rider's position (downtown San Francisco).
pub const TEST_ORIGIN: LatLng = LatLng {
    latitude: 37.7849,
    longitude: -122.4000,
};

pub fn test_user() -> User {
    User::new(UserId("u1".into()), "+14155550123")
}

pub fn test_address(label: &str, location: LatLng) -> Address {
    Address {
        address: label.to_string(),
        location,
    }
}

pub fn test_pickup() -> Address {
    test_address("123 Market St, San Francisco, CA", TEST_ORIGIN)
}

pub fn test_dropoff() -> Address {
    test_address(
        "456 Valencia St, San Francisco, CA",
        LatLng::new(37.7649, -122.4214),
    )
}

/// A world with all demo resources and no fleet; spawn drivers explicitly
/// with [spawn_test_driver].
pub fn create_test_world() -> World {
    let mut world = World::new();
    build_demo(
        &mut world,
        DemoParams::default()
            .with_seed(7)
            .with_num_drivers(0)
            .with_speed_range(40.0, 40.0),
    );
    world
}

static TEST_DRIVER_NAMES: &[&str] = &["Test Driver A", "Test Driver B", "Test Driver C"];

/// Spawns one available driver at `location` and indexes it. Ids count up
/// from `d1` per world.
pub fn spawn_test_driver(world: &mut World, location: LatLng) -> Entity {
    let count = world.query::<&DriverProfile>().iter(world).count();
    let id = DriverId(format!("d{}", count + 1));
    let profile = DriverProfile {
        name: TEST_DRIVER_NAMES[count % TEST_DRIVER_NAMES.len()].to_string(),
        phone_number: "+15555550100".into(),
        rating: 4.8,
        photo: format!("https://photos.example.com/drivers/{id}.jpg"),
        vehicle: Vehicle {
            model: "Toyota Camry".into(),
            color: "Silver".into(),
            plate: "ABC123".into(),
            kind: VehicleKind::Sedan,
        },
        id,
    };
    let entity = world
        .spawn((Driver::available(), profile, Position(location)))
        .id();
    if let Some(cell) = cell_for(location) {
        world
            .resource_mut::<SpatialIndex>()
            .set_driver_cell(entity, cell);
    }
    entity
}
