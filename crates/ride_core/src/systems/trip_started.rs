use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock, ONE_SEC_MS};
use crate::ecs::{Driver, DriverState, Ride, RideStatus, RideTiming};
use crate::scenario::DwellConfig;

/// The rider boards at the pickup; the driver is now on trip. Schedules the
/// dropoff.
pub fn trip_started_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    dwell: Res<DwellConfig>,
    mut rides: Query<(&mut Ride, &mut RideTiming)>,
    mut drivers: Query<&mut Driver>,
) {
    if event.0.kind != EventKind::TripStarted {
        return;
    }
    let Some(ride_entity) = event.0.subject else {
        return;
    };
    let Ok((mut ride, mut timing)) = rides.get_mut(ride_entity) else {
        return;
    };
    if ride.status != RideStatus::Arriving {
        return;
    }

    ride.status = RideStatus::InProgress;
    timing.started_at = Some(clock.now());
    if let Ok(mut driver) = drivers.get_mut(ride.driver) {
        driver.state = DriverState::OnTrip;
    }
    clock.schedule_in(
        dwell.dropoff_after_secs * ONE_SEC_MS,
        EventKind::TripCompleted,
        Some(ride_entity),
    );
    log::debug!("ride {} started", ride.id);
}
