//! Ride operations: request, cancel, rate.
//!
//! User intents enter the world as scheduled clock events, the same way the
//! scripted progression runs; the systems in [crate::systems] react to them.

use bevy_ecs::prelude::{Entity, World};
use thiserror::Error;

use crate::clock::{EventKind, SimulationClock, ONE_SEC_MS};
use crate::ecs::{
    ActiveRide, Address, Driver, DriverProfile, DriverState, Ride, RideId, RideIds, RideOutcome,
    RideStatus, RideTiming, UserId,
};
use crate::history::RideLog;
use crate::scenario::{DwellConfig, MovementConfig};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RideError {
    #[error("destination address must not be empty")]
    EmptyDestination,
    #[error("another ride is already in progress")]
    RideInProgress,
    #[error("driver is not available")]
    DriverUnavailable,
    #[error("ride not found")]
    NotFound,
    #[error("ride can no longer be cancelled")]
    NotCancellable,
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    #[error("only completed rides can be rated")]
    NotRateable,
    #[error("ride has already been rated")]
    AlreadyRated,
}

/// Requests a ride with the chosen driver. Spawns the ride entity, assigns
/// the driver, and schedules the acceptance event plus the first movement
/// tick. Returns the ride entity.
pub fn request_ride(
    world: &mut World,
    user: &UserId,
    driver_entity: Entity,
    pickup: Address,
    dropoff: Address,
) -> Result<Entity, RideError> {
    if dropoff.address.trim().is_empty() {
        return Err(RideError::EmptyDestination);
    }
    if world.resource::<ActiveRide>().0.is_some() {
        return Err(RideError::RideInProgress);
    }
    let driver = world
        .get::<Driver>(driver_entity)
        .ok_or(RideError::DriverUnavailable)?;
    if driver.state != DriverState::Available {
        return Err(RideError::DriverUnavailable);
    }
    let driver_id = world
        .get::<DriverProfile>(driver_entity)
        .ok_or(RideError::DriverUnavailable)?
        .id
        .clone();

    let now = world.resource::<SimulationClock>().now();
    let id = world.resource_mut::<RideIds>().allocate();
    let ride_entity = world
        .spawn((
            Ride {
                id,
                user: user.clone(),
                driver: driver_entity,
                driver_id: driver_id.clone(),
                status: RideStatus::Requested,
                pickup,
                dropoff,
            },
            RideTiming::new(now),
            RideOutcome::default(),
        ))
        .id();

    if let Some(mut driver) = world.get_mut::<Driver>(driver_entity) {
        driver.state = DriverState::Assigned;
        driver.active_ride = Some(ride_entity);
    }
    world.resource_mut::<ActiveRide>().0 = Some(ride_entity);

    let accept_after = world.resource::<DwellConfig>().accept_after_secs;
    let step_secs = world.resource::<MovementConfig>().step_secs;
    let mut clock = world.resource_mut::<SimulationClock>();
    clock.schedule_in(accept_after * ONE_SEC_MS, EventKind::RideAccepted, Some(ride_entity));
    clock.schedule_in(step_secs * ONE_SEC_MS, EventKind::MoveStep, Some(ride_entity));

    log::info!("ride {id} requested with driver {driver_id}");
    Ok(ride_entity)
}

/// Cancels the ride. One-way, and only while the ride has not reached a
/// terminal state; the actual teardown happens in the cancel system.
pub fn cancel_ride(world: &mut World, ride_entity: Entity) -> Result<(), RideError> {
    let ride = world.get::<Ride>(ride_entity).ok_or(RideError::NotFound)?;
    if !ride.status.can_cancel() {
        return Err(RideError::NotCancellable);
    }
    let id = ride.id;
    let mut clock = world.resource_mut::<SimulationClock>();
    let now = clock.now();
    clock.schedule_at(now, EventKind::RideCancel, Some(ride_entity));
    log::info!("ride {id} cancellation requested");
    Ok(())
}

/// Records the rider's rating for a completed ride.
pub fn rate_ride(world: &mut World, ride_id: RideId, rating: u8) -> Result<(), RideError> {
    if !(1..=5).contains(&rating) {
        return Err(RideError::InvalidRating);
    }
    let mut ride_log = world.resource_mut::<RideLog>();
    let record = ride_log.find_mut(ride_id).ok_or(RideError::NotFound)?;
    if record.status != RideStatus::Completed {
        return Err(RideError::NotRateable);
    }
    if record.user_rating.is_some() {
        return Err(RideError::AlreadyRated);
    }
    record.user_rating = Some(rating);
    Ok(())
}
