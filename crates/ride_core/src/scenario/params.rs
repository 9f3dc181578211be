use bevy_ecs::prelude::Resource;

/// Default bounding box: downtown San Francisco (approx).
const DEFAULT_LAT_MIN: f64 = 37.76;
const DEFAULT_LAT_MAX: f64 = 37.81;
const DEFAULT_LNG_MIN: f64 = -122.45;
const DEFAULT_LNG_MAX: f64 = -122.39;

/// Dwell times between scripted lifecycle transitions, in seconds.
/// The progression fires on these fixed delays regardless of any external
/// signal; it is a scripted demo, not a reactive dispatch system.
#[derive(Debug, Clone, Copy, Resource)]
pub struct DwellConfig {
    /// Request → accepted.
    pub accept_after_secs: u64,
    /// Accepted → arriving.
    pub arrive_after_secs: u64,
    /// Arriving → in progress (pickup).
    pub pickup_after_secs: u64,
    /// In progress → completed (dropoff).
    pub dropoff_after_secs: u64,
}

impl Default for DwellConfig {
    fn default() -> Self {
        Self {
            accept_after_secs: 5,
            arrive_after_secs: 10,
            pickup_after_secs: 15,
            dropoff_after_secs: 12,
        }
    }
}

/// Cadence of driver movement / ETA refresh ticks while a ride is active.
#[derive(Debug, Clone, Copy, Resource)]
pub struct MovementConfig {
    pub step_secs: u64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self { step_secs: 3 }
    }
}

/// Parameters for building a demo world.
#[derive(Debug, Clone)]
pub struct DemoParams {
    pub num_drivers: usize,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
    pub seed: Option<u64>,
    pub dwell: DwellConfig,
    pub movement: MovementConfig,
    pub min_speed_kmh: f64,
    pub max_speed_kmh: f64,
    /// Optional epoch for ride dates. If None, defaults to 0.
    pub epoch_ms: Option<i64>,
}

impl Default for DemoParams {
    fn default() -> Self {
        Self {
            num_drivers: 8,
            lat_min: DEFAULT_LAT_MIN,
            lat_max: DEFAULT_LAT_MAX,
            lng_min: DEFAULT_LNG_MIN,
            lng_max: DEFAULT_LNG_MAX,
            seed: None,
            dwell: DwellConfig::default(),
            movement: MovementConfig::default(),
            min_speed_kmh: 25.0,
            max_speed_kmh: 45.0,
            epoch_ms: None,
        }
    }
}

impl DemoParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_num_drivers(mut self, num_drivers: usize) -> Self {
        self.num_drivers = num_drivers;
        self
    }

    pub fn with_bounding_box(
        mut self,
        lat_min: f64,
        lat_max: f64,
        lng_min: f64,
        lng_max: f64,
    ) -> Self {
        self.lat_min = lat_min;
        self.lat_max = lat_max;
        self.lng_min = lng_min;
        self.lng_max = lng_max;
        self
    }

    pub fn with_dwell(mut self, dwell: DwellConfig) -> Self {
        self.dwell = dwell;
        self
    }

    pub fn with_speed_range(mut self, min_kmh: f64, max_kmh: f64) -> Self {
        self.min_speed_kmh = min_kmh;
        self.max_speed_kmh = max_kmh;
        self
    }

    /// Set the epoch in milliseconds (real-world time corresponding to
    /// simulation time 0).
    pub fn with_epoch_ms(mut self, epoch_ms: i64) -> Self {
        self.epoch_ms = Some(epoch_ms);
        self
    }
}
