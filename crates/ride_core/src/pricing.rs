//! Simple pricing for completed rides.

/// Base fare in currency units (e.g., dollars).
pub const BASE_FARE: f64 = 2.50;

/// Per-kilometer rate in currency units.
pub const PER_KM_RATE: f64 = 1.50;

/// Fare for a trip of the given length, rounded to cents.
///
/// Formula: `fare = BASE_FARE + (distance_km * PER_KM_RATE)`
pub fn fare_for_distance_km(distance_km: f64) -> f64 {
    round_cents(BASE_FARE + distance_km * PER_KM_RATE)
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
