//! Simulation runner: advances the clock and routes events into the ECS.
//!
//! Each step pops the next event from [SimulationClock], inserts it as
//! [CurrentEvent], then runs the schedule. Systems are gated on the event
//! kind so only the relevant one reacts.

use bevy_ecs::prelude::{Res, Schedule, World};
use bevy_ecs::schedule::IntoSystemConfigs;

use crate::clock::{CurrentEvent, Event, EventKind, SimulationClock};
use crate::systems::{
    driver_arriving::driver_arriving_system, movement::movement_system,
    ride_accepted::ride_accepted_system, ride_cancel::ride_cancel_system,
    spatial_index::update_spatial_index_system, trip_completed::trip_completed_system,
    trip_started::trip_started_system,
};

fn is_ride_accepted(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::RideAccepted)
        .unwrap_or(false)
}

fn is_driver_arriving(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::DriverArriving)
        .unwrap_or(false)
}

fn is_trip_started(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::TripStarted)
        .unwrap_or(false)
}

fn is_trip_completed(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::TripCompleted)
        .unwrap_or(false)
}

fn is_ride_cancel(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::RideCancel)
        .unwrap_or(false)
}

fn is_move_step(event: Option<Res<CurrentEvent>>) -> bool {
    event
        .map(|e| e.0.kind == EventKind::MoveStep)
        .unwrap_or(false)
}

/// Runs one step: pops the next event, inserts it as [CurrentEvent], then
/// runs the schedule. Returns `false` once the clock is empty.
pub fn run_next_event(world: &mut World, schedule: &mut Schedule) -> bool {
    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    true
}

/// Runs one step and invokes `hook` after the schedule completes.
pub fn run_next_event_with_hook<F>(world: &mut World, schedule: &mut Schedule, mut hook: F) -> bool
where
    F: FnMut(&World, &Event),
{
    let event = match world.resource_mut::<SimulationClock>().pop_next() {
        Some(e) => e,
        None => return false,
    };
    world.insert_resource(CurrentEvent(event));
    schedule.run(world);
    hook(world, &event);
    true
}

/// Runs steps until the event queue is empty or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(world: &mut World, schedule: &mut Schedule, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps && run_next_event(world, schedule) {
        steps += 1;
    }
    steps
}

/// Runs steps until empty and invokes `hook` after each step.
pub fn run_until_empty_with_hook<F>(
    world: &mut World,
    schedule: &mut Schedule,
    max_steps: usize,
    mut hook: F,
) -> usize
where
    F: FnMut(&World, &Event),
{
    let mut steps = 0;
    while steps < max_steps && run_next_event_with_hook(world, schedule, &mut hook) {
        steps += 1;
    }
    steps
}

/// Builds the demo schedule: each lifecycle system behind its event-kind
/// condition, plus the spatial index sync on every event.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();

    schedule.add_systems((
        ride_accepted_system.run_if(is_ride_accepted),
        driver_arriving_system.run_if(is_driver_arriving),
        trip_started_system.run_if(is_trip_started),
        trip_completed_system.run_if(is_trip_completed),
        ride_cancel_system.run_if(is_ride_cancel),
        movement_system.run_if(is_move_step),
    ));

    // Runs on every event to keep nearby-driver queries current.
    schedule.add_systems(update_spatial_index_system);

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_helpers::create_test_world;

    #[test]
    fn runner_drains_the_clock_and_advances_time() {
        let mut world = create_test_world();
        {
            let mut clock = world.resource_mut::<SimulationClock>();
            clock.schedule_at(1_000, EventKind::MoveStep, None);
            clock.schedule_at(2_000, EventKind::MoveStep, None);
        }

        let mut schedule = simulation_schedule();
        let mut seen = Vec::new();
        let steps = run_until_empty_with_hook(&mut world, &mut schedule, 100, |_, event| {
            seen.push(event.timestamp);
        });

        assert_eq!(steps, 2);
        assert_eq!(seen, vec![1_000, 2_000]);
        assert_eq!(world.resource::<SimulationClock>().now(), 2_000);
        assert!(!run_next_event(&mut world, &mut schedule));
    }
}
