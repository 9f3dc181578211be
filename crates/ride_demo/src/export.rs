//! Ride-history export to JSON and CSV.

use std::error::Error;
use std::fs::File;
use std::path::Path;

use ride_core::history::RideRecord;

pub fn export_history_json(records: &[&RideRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, records)?;
    Ok(())
}

pub fn export_history_csv(records: &[&RideRecord], path: &Path) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(File::create(path)?);

    wtr.write_record([
        "id",
        "driver_id",
        "user_id",
        "status",
        "pickup",
        "dropoff",
        "fare",
        "distance_km",
        "duration_min",
        "date",
        "user_rating",
        "driver_rating",
    ])?;
    for record in records {
        wtr.write_record([
            record.id.to_string(),
            record.driver_id.to_string(),
            record.user_id.to_string(),
            record.status.to_string(),
            record.pickup.address.clone(),
            record.dropoff.address.clone(),
            record.fare.map(|f| format!("{f:.2}")).unwrap_or_default(),
            record
                .distance_km
                .map(|d| format!("{d:.3}"))
                .unwrap_or_default(),
            record
                .duration_min
                .map(|m| m.to_string())
                .unwrap_or_default(),
            record.date.to_rfc3339(),
            record
                .user_rating
                .map(|r| r.to_string())
                .unwrap_or_default(),
            record
                .driver_rating
                .map(|r| r.to_string())
                .unwrap_or_default(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
