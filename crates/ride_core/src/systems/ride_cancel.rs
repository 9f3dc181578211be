use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock};
use crate::ecs::{ActiveRide, Driver, DriverState, Ride, RideEta, RideStatus, RideTiming};
use crate::history::{wall_clock_date, EpochMs, RideLog, RideRecord};
use crate::telemetry::RideTelemetry;

/// Cancels the ride: one-way exit from any non-terminal state. Frees the
/// driver where they stand, records the ride, and clears the active slot.
/// Events for rides that already ended are ignored.
#[allow(clippy::too_many_arguments)]
pub fn ride_cancel_system(
    event: Res<CurrentEvent>,
    clock: Res<SimulationClock>,
    epoch: Res<EpochMs>,
    mut telemetry: ResMut<RideTelemetry>,
    mut ride_log: ResMut<RideLog>,
    mut active: ResMut<ActiveRide>,
    mut eta: ResMut<RideEta>,
    mut rides: Query<(&mut Ride, &mut RideTiming)>,
    mut drivers: Query<&mut Driver>,
) {
    if event.0.kind != EventKind::RideCancel {
        return;
    }
    let Some(ride_entity) = event.0.subject else {
        return;
    };
    let Ok((mut ride, mut timing)) = rides.get_mut(ride_entity) else {
        return;
    };
    if !ride.status.can_cancel() {
        return;
    }

    ride.status = RideStatus::Cancelled;
    timing.cancelled_at = Some(clock.now());

    if let Ok(mut driver) = drivers.get_mut(ride.driver) {
        if driver.active_ride == Some(ride_entity) {
            driver.state = DriverState::Available;
            driver.active_ride = None;
        }
    }

    ride_log.push(RideRecord {
        id: ride.id,
        driver_id: ride.driver_id.clone(),
        user_id: ride.user.clone(),
        status: RideStatus::Cancelled,
        pickup: ride.pickup.clone(),
        dropoff: ride.dropoff.clone(),
        fare: None,
        distance_km: None,
        duration_min: None,
        date: wall_clock_date(*epoch, timing.requested_at),
        user_rating: None,
        driver_rating: None,
    });
    telemetry.rides_cancelled_total = telemetry.rides_cancelled_total.saturating_add(1);

    if active.0 == Some(ride_entity) {
        active.0 = None;
    }
    eta.0 = None;
    log::info!("ride {} cancelled", ride.id);
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

    fn run_cancel(world: &mut bevy_ecs::prelude::World, ride: bevy_ecs::prelude::Entity) {
        world.insert_resource(CurrentEvent(Event {
            timestamp: 0,
            kind: EventKind::RideCancel,
            subject: Some(ride),
        }));
        let mut schedule = Schedule::default();
        schedule.add_systems(ride_cancel_system);
        schedule.run(world);
    }

    #[test]
    fn cancel_frees_driver_and_records_the_ride() {
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

        run_cancel(&mut world, ride);

        assert_eq!(
            world.entity(ride).get::<Ride>().expect("ride").status,
            RideStatus::Cancelled
        );
        assert_eq!(
            world.entity(driver).get::<Driver>().expect("driver").state,
            DriverState::Available
        );
        assert_eq!(world.resource::<ActiveRide>().0, None);
        assert_eq!(world.resource::<RideTelemetry>().rides_cancelled_total, 1);

        let log = world.resource::<RideLog>();
        let record = log.history()[0];
        assert_eq!(record.status, RideStatus::Cancelled);
        assert_eq!(record.fare, None);
    }

    #[test]
    fn completed_rides_are_not_cancelled_twice() {
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
        world.get_mut::<Ride>(ride).expect("ride").status = RideStatus::Completed;

        run_cancel(&mut world, ride);

        assert_eq!(
            world.entity(ride).get::<Ride>().expect("ride").status,
            RideStatus::Completed
        );
        assert_eq!(world.resource::<RideTelemetry>().rides_cancelled_total, 0);
        assert!(world.resource::<RideLog>().is_empty());
    }
}
