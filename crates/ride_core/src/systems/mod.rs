pub mod driver_arriving;
pub mod movement;
pub mod ride_accepted;
pub mod ride_cancel;
pub mod spatial_index;
pub mod trip_completed;
pub mod trip_started;
