//! Ride history: serializable records of finished rides and their ratings.

use bevy_ecs::prelude::Resource;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::ecs::{Address, DriverId, RideId, RideStatus, UserId};

/// Real-world time (ms since the Unix epoch) corresponding to simulation
/// time zero. Ride dates in the history are derived from it.
#[derive(Debug, Clone, Copy, Resource)]
pub struct EpochMs(pub i64);

impl Default for EpochMs {
    fn default() -> Self {
        Self(0)
    }
}

/// Wall-clock date for a simulation timestamp.
pub fn wall_clock_date(epoch: EpochMs, sim_ms: u64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(epoch.0.saturating_add(sim_ms as i64))
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// One finished (completed or cancelled) ride as shown in the history view.
/// Field names match the record format the original client stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RideRecord {
    pub id: RideId,
    pub driver_id: DriverId,
    pub user_id: UserId,
    pub status: RideStatus,
    pub pickup: Address,
    pub dropoff: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare: Option<f64>,
    #[serde(rename = "distance", default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(rename = "duration", default, skip_serializing_if = "Option::is_none")]
    pub duration_min: Option<u32>,
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_rating: Option<u8>,
}

/// Accumulates finished rides. Insert as a resource next to the telemetry.
#[derive(Debug, Default, Resource)]
pub struct RideLog {
    records: Vec<RideRecord>,
}

impl RideLog {
    pub fn push(&mut self, record: RideRecord) {
        self.records.push(record);
    }

    /// All records, newest first.
    pub fn history(&self) -> Vec<&RideRecord> {
        let mut records: Vec<&RideRecord> = self.records.iter().collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        records
    }

    pub fn find(&self, id: RideId) -> Option<&RideRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn find_mut(&mut self, id: RideId) -> Option<&mut RideRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::LatLng;

    fn record(id: u64, date_ms: i64) -> RideRecord {
        let address = Address {
            address: "somewhere".into(),
            location: LatLng::new(37.78, -122.40),
        };
        RideRecord {
            id: RideId(id),
            driver_id: DriverId("d1".into()),
            user_id: UserId("u1".into()),
            status: RideStatus::Completed,
            pickup: address.clone(),
            dropoff: address,
            fare: Some(12.75),
            distance_km: Some(1.8),
            duration_min: Some(12),
            date: wall_clock_date(EpochMs(date_ms), 0),
            user_rating: None,
            driver_rating: None,
        }
    }

    #[test]
    fn history_is_newest_first() {
        let mut log = RideLog::default();
        log.push(record(1, 1_000));
        log.push(record(2, 3_000));
        log.push(record(3, 2_000));

        let ids: Vec<RideId> = log.history().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![RideId(2), RideId(3), RideId(1)]);
    }

    #[test]
    fn record_serializes_with_client_field_names() {
        let json = serde_json::to_string(&record(1, 0)).expect("serialize");
        assert!(json.contains("\"driverId\":\"d1\""));
        assert!(json.contains("\"distance\":1.8"));
        assert!(json.contains("\"duration\":12"));
        assert!(json.contains("\"id\":\"r1\""));
    }

    #[test]
    fn wall_clock_date_offsets_epoch_by_sim_time() {
        let date = wall_clock_date(EpochMs(1_000), 500);
        assert_eq!(date.timestamp_millis(), 1_500);
    }
}
