use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock, ONE_SEC_MS};
use crate::ecs::{Ride, RideStatus, RideTiming};
use crate::scenario::DwellConfig;

/// The driver accepts the request and heads for the pickup. Schedules the
/// arrival announcement. Stale events for rides no longer in `Requested`
/// (e.g. already cancelled) are ignored.
pub fn ride_accepted_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    dwell: Res<DwellConfig>,
    mut rides: Query<(&mut Ride, &mut RideTiming)>,
) {
    if event.0.kind != EventKind::RideAccepted {
        return;
    }
    let Some(ride_entity) = event.0.subject else {
        return;
    };
    let Ok((mut ride, mut timing)) = rides.get_mut(ride_entity) else {
        return;
    };
    if ride.status != RideStatus::Requested {
        return;
    }

    ride.status = RideStatus::Accepted;
    timing.accepted_at = Some(clock.now());
    clock.schedule_in(
        dwell.arrive_after_secs * ONE_SEC_MS,
        EventKind::DriverArriving,
        Some(ride_entity),
    );
    log::debug!("ride {} accepted by driver {}", ride.id, ride.driver_id);
}
