use bevy_ecs::prelude::{Query, Res, ResMut};

use crate::clock::{CurrentEvent, EventKind, SimulationClock, ONE_SEC_MS};
use crate::ecs::{Position, Ride, RideEta, RideStatus};
use crate::geo::{eta_minutes, haversine_km, LatLng};
use crate::scenario::MovementConfig;
use crate::speed::SpeedModel;

/// Advances the assigned driver toward the current target and refreshes the
/// arrival estimate, then reschedules itself. The chain stops once the ride
/// reaches a terminal state.
///
/// Before pickup the target is the pickup location; during the trip it is
/// the dropoff. Straight-line approach; the demo has no road network.
pub fn movement_system(
    event: Res<CurrentEvent>,
    mut clock: ResMut<SimulationClock>,
    movement: Res<MovementConfig>,
    mut speed: ResMut<SpeedModel>,
    mut eta: ResMut<RideEta>,
    rides: Query<&Ride>,
    mut positions: Query<&mut Position>,
) {
    if event.0.kind != EventKind::MoveStep {
        return;
    }
    let Some(ride_entity) = event.0.subject else {
        return;
    };
    let Ok(ride) = rides.get(ride_entity) else {
        return;
    };
    if ride.status.is_terminal() {
        return;
    }
    let target = match ride.status {
        RideStatus::Requested | RideStatus::Accepted | RideStatus::Arriving => {
            ride.pickup.location
        }
        RideStatus::InProgress => ride.dropoff.location,
        RideStatus::Completed | RideStatus::Cancelled => return,
    };
    let Ok(mut position) = positions.get_mut(ride.driver) else {
        return;
    };

    let remaining_km = haversine_km(position.0, target);
    let step_km = speed.sample_kmh() * movement.step_secs as f64 / 3600.0;
    if remaining_km <= step_km {
        position.0 = target;
    } else {
        let t = step_km / remaining_km;
        position.0 = LatLng::new(
            position.0.latitude + (target.latitude - position.0.latitude) * t,
            position.0.longitude + (target.longitude - position.0.longitude) * t,
        );
    }
    eta.0 = Some(eta_minutes(haversine_km(position.0, target)));

    clock.schedule_in(
        movement.step_secs * ONE_SEC_MS,
        EventKind::MoveStep,
        Some(ride_entity),
    );
}
