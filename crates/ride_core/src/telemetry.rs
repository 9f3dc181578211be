//! Telemetry / KPIs: records finished rides for analysis.

use bevy_ecs::prelude::{Entity, Resource};

use crate::ecs::RideId;

/// One completed ride, recorded when the driver reaches the dropoff.
/// Timestamps are simulation ms; use the helper methods for derived KPIs.
#[derive(Debug, Clone)]
pub struct CompletedRideRecord {
    pub ride_entity: Entity,
    pub driver_entity: Entity,
    pub ride_id: RideId,
    pub requested_at: u64,
    pub accepted_at: u64,
    pub started_at: u64,
    pub completed_at: u64,
}

impl CompletedRideRecord {
    /// Time from request to driver acceptance.
    pub fn time_to_accept(&self) -> u64 {
        self.accepted_at.saturating_sub(self.requested_at)
    }

    /// Time from driver acceptance to pickup (trip started).
    pub fn time_to_pickup(&self) -> u64 {
        self.started_at.saturating_sub(self.accepted_at)
    }

    /// Time from pickup to dropoff (rider on board).
    pub fn trip_duration(&self) -> u64 {
        self.completed_at.saturating_sub(self.started_at)
    }
}

/// Collects ride telemetry. Insert as a resource to record finished rides.
#[derive(Debug, Default, Resource)]
pub struct RideTelemetry {
    pub completed_rides: Vec<CompletedRideRecord>,
    pub rides_cancelled_total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_kpis_subtract_adjacent_timestamps() {
        let record = CompletedRideRecord {
            ride_entity: Entity::from_raw(1),
            driver_entity: Entity::from_raw(2),
            ride_id: RideId(1),
            requested_at: 0,
            accepted_at: 5_000,
            started_at: 30_000,
            completed_at: 42_000,
        };
        assert_eq!(record.time_to_accept(), 5_000);
        assert_eq!(record.time_to_pickup(), 25_000);
        assert_eq!(record.trip_duration(), 12_000);
    }
}
