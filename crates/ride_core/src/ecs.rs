//! Components and shared records for the ride-hailing world.

use std::fmt;
use std::str::FromStr;

use bevy_ecs::prelude::{Component, Entity, Resource};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::geo::LatLng;

/// Ride lifecycle. Rides advance through the first five states in order;
/// `Cancelled` is a separate terminal state reachable from any non-terminal
/// one via explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideStatus {
    Requested,
    Accepted,
    Arriving,
    InProgress,
    Completed,
    Cancelled,
}

impl RideStatus {
    /// The next state in the scripted progression, if any.
    pub fn next(self) -> Option<RideStatus> {
        match self {
            RideStatus::Requested => Some(RideStatus::Accepted),
            RideStatus::Accepted => Some(RideStatus::Arriving),
            RideStatus::Arriving => Some(RideStatus::InProgress),
            RideStatus::InProgress => Some(RideStatus::Completed),
            RideStatus::Completed | RideStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RideStatus::Completed | RideStatus::Cancelled)
    }

    /// Cancellation is one-way and only available before the ride ends.
    pub fn can_cancel(self) -> bool {
        !self.is_terminal()
    }
}

impl fmt::Display for RideStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RideStatus::Requested => "requested",
            RideStatus::Accepted => "accepted",
            RideStatus::Arriving => "arriving",
            RideStatus::InProgress => "in_progress",
            RideStatus::Completed => "completed",
            RideStatus::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DriverId(pub String);

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ride identifier, formatted `r<N>`. Allocated from [RideIds].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RideId(pub u64);

impl fmt::Display for RideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

#[derive(Debug, Error)]
#[error("ride ids look like r42")]
pub struct ParseRideIdError;

impl FromStr for RideId {
    type Err = ParseRideIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('r')
            .and_then(|n| n.parse::<u64>().ok())
            .map(RideId)
            .ok_or(ParseRideIdError)
    }
}

impl Serialize for RideId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RideId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The authenticated rider. Serialized camelCase to stay compatible with the
/// session record format the original client persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub phone_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl User {
    pub fn new(id: UserId, phone_number: impl Into<String>) -> Self {
        Self {
            id,
            phone_number: phone_number.into(),
            name: None,
            email: None,
            photo: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleKind {
    Sedan,
    #[serde(rename = "SUV")]
    Suv,
    Van,
    Electric,
}

impl fmt::Display for VehicleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleKind::Sedan => "Sedan",
            VehicleKind::Suv => "SUV",
            VehicleKind::Van => "Van",
            VehicleKind::Electric => "Electric",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub model: String,
    pub color: String,
    pub plate: String,
    #[serde(rename = "type")]
    pub kind: VehicleKind,
}

/// Static driver profile shown in the directory and on ride cards.
#[derive(Debug, Clone, PartialEq, Component, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfile {
    pub id: DriverId,
    pub name: String,
    pub phone_number: String,
    pub rating: f64,
    pub photo: String,
    pub vehicle: Vehicle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    Available,
    Assigned,
    OnTrip,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct Driver {
    pub state: DriverState,
    pub active_ride: Option<Entity>,
}

impl Driver {
    pub fn available() -> Self {
        Self {
            state: DriverState::Available,
            active_ride: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Component)]
pub struct Position(pub LatLng);

/// Free-text address with a resolved coordinate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub location: LatLng,
}

/// One ride from request to completion or cancellation.
#[derive(Debug, Clone, Component)]
pub struct Ride {
    pub id: RideId,
    pub user: UserId,
    pub driver: Entity,
    pub driver_id: DriverId,
    pub status: RideStatus,
    pub pickup: Address,
    pub dropoff: Address,
}

/// Simulation timestamps (ms) for each lifecycle transition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Component)]
pub struct RideTiming {
    pub requested_at: u64,
    pub accepted_at: Option<u64>,
    pub arriving_at: Option<u64>,
    pub started_at: Option<u64>,
    pub completed_at: Option<u64>,
    pub cancelled_at: Option<u64>,
}

impl RideTiming {
    pub fn new(requested_at: u64) -> Self {
        Self {
            requested_at,
            ..Self::default()
        }
    }
}

/// Fare, distance, duration, and ratings; filled in when the ride ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Component)]
pub struct RideOutcome {
    pub fare: Option<f64>,
    pub distance_km: Option<f64>,
    pub duration_min: Option<u32>,
    pub user_rating: Option<u8>,
    pub driver_rating: Option<u8>,
}

/// The single active ride, mirroring the original's one `currentRide` slot.
#[derive(Debug, Default, Resource)]
pub struct ActiveRide(pub Option<Entity>);

/// Latest arrival estimate in minutes for the active ride.
#[derive(Debug, Default, Resource)]
pub struct RideEta(pub Option<u32>);

/// Monotonic ride id allocator.
#[derive(Debug, Default, Resource)]
pub struct RideIds {
    next: u64,
}

impl RideIds {
    pub fn allocate(&mut self) -> RideId {
        self.next += 1;
        RideId(self.next)
    }
}
