use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock, ONE_SEC_MS};
use crate::ecs::{Ride, RideStatus, RideTiming};
use crate::scenario::DwellConfig;

/// The driver announces they are close to the pickup. Schedules the trip
/// start.
pub fn driver_arriving_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    dwell: Res<DwellConfig>,
    mut rides: Query<(&mut Ride, &mut RideTiming)>,
) {
    if event.0.kind != EventKind::DriverArriving {
        return;
    }
    let Some(ride_entity) = event.0.subject else {
        return;
    };
    let Ok((mut ride, mut timing)) = rides.get_mut(ride_entity) else {
        return;
    };
    if ride.status != RideStatus::Accepted {
        return;
    }

    ride.status = RideStatus::Arriving;
    timing.arriving_at = Some(clock.now());
    clock.schedule_in(
        dwell.pickup_after_secs * ONE_SEC_MS,
        EventKind::TripStarted,
        Some(ride_entity),
    );
    log::debug!("ride {}: driver {} arriving", ride.id, ride.driver_id);
}
