use bevy_ecs::prelude::{Entity, World};

use crate::clock::SimulationClock;
use crate::ecs::{ActiveRide, Driver, Position, RideEta, RideIds};
use crate::fleet::{spawn_fleet, FleetParams};
use crate::geo::cell_for;
use crate::history::{EpochMs, RideLog};
use crate::scenario::params::DemoParams;
use crate::spatial::SpatialIndex;
use crate::speed::SpeedModel;
use crate::telemetry::RideTelemetry;

/// Builds a demo world: inserts all resources and spawns the driver fleet.
/// Returns the spawned driver entities.
pub fn build_demo(world: &mut World, params: DemoParams) -> Vec<Entity> {
    world.insert_resource(SimulationClock::default());
    world.insert_resource(RideTelemetry::default());
    world.insert_resource(RideLog::default());
    world.insert_resource(ActiveRide::default());
    world.insert_resource(RideEta::default());
    world.insert_resource(RideIds::default());
    world.insert_resource(SpatialIndex::default());
    world.insert_resource(params.dwell);
    world.insert_resource(params.movement);
    world.insert_resource(SpeedModel::with_range(
        params.seed,
        params.min_speed_kmh,
        params.max_speed_kmh,
    ));
    world.insert_resource(EpochMs(params.epoch_ms.unwrap_or(0)));

    let fleet = FleetParams {
        num_drivers: params.num_drivers,
        lat_min: params.lat_min,
        lat_max: params.lat_max,
        lng_min: params.lng_min,
        lng_max: params.lng_max,
        seed: params.seed,
    };
    let drivers = spawn_fleet(world, &fleet);
    seed_spatial_index(world);
    drivers
}

/// Indexes the freshly spawned fleet; afterwards the index is kept in sync
/// by the schedule after every event.
fn seed_spatial_index(world: &mut World) {
    let placements: Vec<_> = world
        .query::<(Entity, &Driver, &Position)>()
        .iter(world)
        .filter_map(|(entity, _, position)| cell_for(position.0).map(|cell| (entity, cell)))
        .collect();
    let mut index = world.resource_mut::<SpatialIndex>();
    for (entity, cell) in placements {
        index.set_driver_cell(entity, cell);
    }
}
