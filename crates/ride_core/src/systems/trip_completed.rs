use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{
    ActiveRide, Driver, DriverState, Position, Ride, RideEta, RideOutcome, RideStatus, RideTiming,
};
use crate::geo::{eta_minutes, haversine_km};
use crate::history::{wall_clock_date, EpochMs, RideLog, RideRecord};
use crate::pricing::fare_for_distance_km;
use crate::telemetry::{CompletedRideRecord, RideTelemetry};

/// The driver reaches the dropoff: the ride completes, fare/distance/
/// duration are computed, the driver becomes available at the dropoff, and
/// the ride is recorded in history and telemetry.
#[allow(clippy::too_many_arguments)]
pub fn trip_completed_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    epoch: Res<EpochMs>,
    mut telemetry: ResMut<RideTelemetry>,
    mut ride_log: ResMut<RideLog>,
    mut active: ResMut<ActiveRide>,
    mut eta: ResMut<RideEta>,
    mut rides: Query<(&mut Ride, &mut RideTiming, &mut RideOutcome)>,
    mut drivers: Query<(&mut Driver, &mut Position)>,
) {
    if event.0.kind != EventKind::TripCompleted {
        return;
    }
    let Some(ride_entity) = event.0.subject else {
        return;
    };
    let Ok((mut ride, mut timing, mut outcome)) = rides.get_mut(ride_entity) else {
        return;
    };
    if ride.status != RideStatus::InProgress {
        return;
    }

    let now = clock.now();
    ride.status = RideStatus::Completed;
    timing.completed_at = Some(now);

    let distance_km = haversine_km(ride.pickup.location, ride.dropoff.location);
    let fare = fare_for_distance_km(distance_km);
    let duration_min = eta_minutes(distance_km);
    outcome.fare = Some(fare);
    outcome.distance_km = Some(distance_km);
    outcome.duration_min = Some(duration_min);

    if let Ok((mut driver, mut position)) = drivers.get_mut(ride.driver) {
        driver.state = DriverState::Available;
        driver.active_ride = None;
        position.0 = ride.dropoff.location;
    }

    telemetry.completed_rides.push(CompletedRideRecord {
        ride_entity,
        driver_entity: ride.driver,
        ride_id: ride.id,
        requested_at: timing.requested_at,
        accepted_at: timing.accepted_at.unwrap_or(timing.requested_at),
        started_at: timing.started_at.unwrap_or(timing.requested_at),
        completed_at: now,
    });
    ride_log.push(RideRecord {
        id: ride.id,
        driver_id: ride.driver_id.clone(),
        user_id: ride.user.clone(),
        status: RideStatus::Completed,
        pickup: ride.pickup.clone(),
        dropoff: ride.dropoff.clone(),
        fare: Some(fare),
        distance_km: Some(distance_km),
        duration_min: Some(duration_min),
        date: wall_clock_date(*epoch, timing.requested_at),
        user_rating: None,
        driver_rating: None,
    });

    active.0 = None;
    eta.0 = None;
    log::info!(
        "ride {} completed: {distance_km:.2} km, ${fare:.2}",
        ride.id
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::Schedule;

    use crate::clock::Event;
    use crate::rides::request_ride;
    use crate::test_helpers::{
        create_test_world, spawn_test_driver, test_dropoff, test_pickup, test_user, TEST_ORIGIN,
    };

    #[test]
    fn completion_prices_records_and_frees_the_driver() {
        let mut world = create_test_world();
        let driver = spawn_test_driver(&mut world, TEST_ORIGIN);
        let ride = request_ride(
            &mut world,
            &test_user().id,
            driver,
            test_pickup(),
            test_dropoff(),
        )
        .expect("ride");
        world.get_mut::<Ride>(ride).expect("ride").status = RideStatus::InProgress;

        world.insert_resource(CurrentEvent(Event {
            timestamp: 0,
            kind: EventKind::TripCompleted,
            subject: Some(ride),
        }));
        let mut schedule = Schedule::default();
        schedule.add_systems(trip_completed_system);
        schedule.run(&mut world);

        let (status, outcome) = {
            let entity = world.entity(ride);
            (
                entity.get::<Ride>().expect("ride").status,
                *entity.get::<RideOutcome>().expect("outcome"),
            )
        };
        assert_eq!(status, RideStatus::Completed);
        let distance = outcome.distance_km.expect("distance");
        assert!(distance > 2.5 && distance < 3.5);
        assert_eq!(
            outcome.fare.expect("fare"),
            crate::pricing::fare_for_distance_km(distance)
        );
        assert!(outcome.duration_min.expect("duration") >= 1);

        let (driver_state, driver_pos) = {
            let entity = world.entity(driver);
            (
                entity.get::<Driver>().expect("driver").state,
                entity.get::<Position>().expect("position").0,
            )
        };
        assert_eq!(driver_state, DriverState::Available);
        assert_eq!(driver_pos, test_dropoff().location);

        assert_eq!(world.resource::<ActiveRide>().0, None);
        assert_eq!(world.resource::<RideLog>().len(), 1);
        assert_eq!(world.resource::<RideTelemetry>().completed_rides.len(), 1);
    }
}
