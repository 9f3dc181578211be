//! Demo fleet: seeded generation of driver profiles and positions.

use bevy_ecs::prelude::{Entity, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ecs::{Driver, DriverId, DriverProfile, Position, Vehicle, VehicleKind};
use crate::geo::LatLng;

/// Default bounding box: downtown San Francisco (approx).
const DEFAULT_LAT_MIN: f64 = 37.76;
const DEFAULT_LAT_MAX: f64 = 37.81;
const DEFAULT_LNG_MIN: f64 = -122.45;
const DEFAULT_LNG_MAX: f64 = -122.39;

const DRIVER_NAMES: &[&str] = &[
    "John Davis",
    "Sarah Johnson",
    "Michael Rodriguez",
    "Emily Chen",
    "Aisha Patel",
    "Daniel Kim",
    "Lucia Alvarez",
    "Tom Becker",
    "Nadia Hassan",
    "Grace Liu",
    "Peter Novak",
    "Omar Farouk",
];

const VEHICLE_CATALOGUE: &[(&str, &str, VehicleKind)] = &[
    ("Toyota Camry", "Silver", VehicleKind::Sedan),
    ("Honda Civic", "Black", VehicleKind::Sedan),
    ("Ford Explorer", "White", VehicleKind::Suv),
    ("Tesla Model 3", "Blue", VehicleKind::Electric),
    ("Hyundai Sonata", "Gray", VehicleKind::Sedan),
    ("Kia Carnival", "White", VehicleKind::Van),
    ("Nissan Leaf", "Red", VehicleKind::Electric),
];

#[derive(Debug, Clone)]
pub struct FleetParams {
    pub num_drivers: usize,
    pub lat_min: f64,
    pub lat_max: f64,
    pub lng_min: f64,
    pub lng_max: f64,
    pub seed: Option<u64>,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            num_drivers: 8,
            lat_min: DEFAULT_LAT_MIN,
            lat_max: DEFAULT_LAT_MAX,
            lng_min: DEFAULT_LNG_MIN,
            lng_max: DEFAULT_LNG_MAX,
            seed: None,
        }
    }
}

fn random_plate(rng: &mut StdRng) -> String {
    let letters: String = (0..3)
        .map(|_| (b'A' + rng.gen_range(0..26)) as char)
        .collect();
    format!("{letters}{:03}", rng.gen_range(0..1000))
}

/// Spawns `params.num_drivers` available drivers with generated profiles and
/// uniform positions inside the bounding box. Returns the spawned entities.
pub fn spawn_fleet(world: &mut World, params: &FleetParams) -> Vec<Entity> {
    let mut rng = match params.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    (0..params.num_drivers)
        .map(|i| {
            let id = DriverId(format!("d{}", i + 1));
            let (model, color, kind) = VEHICLE_CATALOGUE[i % VEHICLE_CATALOGUE.len()];
            let profile = DriverProfile {
                photo: format!("https://photos.example.com/drivers/{id}.jpg"),
                name: DRIVER_NAMES[i % DRIVER_NAMES.len()].to_string(),
                phone_number: format!("+1555{:07}", rng.gen_range(0..10_000_000)),
                rating: rng.gen_range(43..=50) as f64 / 10.0,
                vehicle: Vehicle {
                    model: model.to_string(),
                    color: color.to_string(),
                    plate: random_plate(&mut rng),
                    kind,
                },
                id,
            };
            let position = LatLng::new(
                rng.gen_range(params.lat_min..=params.lat_max),
                rng.gen_range(params.lng_min..=params.lng_max),
            );
            world
                .spawn((Driver::available(), profile, Position(position)))
                .id()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::DriverState;

    fn params(seed: u64) -> FleetParams {
        FleetParams {
            num_drivers: 6,
            seed: Some(seed),
            ..FleetParams::default()
        }
    }

    #[test]
    fn spawns_the_requested_count_available() {
        let mut world = World::new();
        let drivers = spawn_fleet(&mut world, &params(3));
        assert_eq!(drivers.len(), 6);
        for entity in drivers {
            let driver = world.entity(entity).get::<Driver>().expect("driver");
            assert_eq!(driver.state, DriverState::Available);
            assert_eq!(driver.active_ride, None);
        }
    }

    #[test]
    fn positions_stay_inside_the_bounding_box() {
        let mut world = World::new();
        let p = params(4);
        for entity in spawn_fleet(&mut world, &p) {
            let pos = world.entity(entity).get::<Position>().expect("position").0;
            assert!((p.lat_min..=p.lat_max).contains(&pos.latitude));
            assert!((p.lng_min..=p.lng_max).contains(&pos.longitude));
        }
    }

    #[test]
    fn ratings_look_like_driver_ratings() {
        let mut world = World::new();
        for entity in spawn_fleet(&mut world, &params(5)) {
            let profile = world
                .entity(entity)
                .get::<DriverProfile>()
                .expect("profile");
            assert!((4.3..=5.0).contains(&profile.rating));
        }
    }

    #[test]
    fn same_seed_generates_the_same_roster() {
        let mut a = World::new();
        let mut b = World::new();
        let roster_a: Vec<DriverProfile> = spawn_fleet(&mut a, &params(9))
            .into_iter()
            .map(|e| a.entity(e).get::<DriverProfile>().expect("profile").clone())
            .collect();
        let roster_b: Vec<DriverProfile> = spawn_fleet(&mut b, &params(9))
            .into_iter()
            .map(|e| b.entity(e).get::<DriverProfile>().expect("profile").clone())
            .collect();
        assert_eq!(roster_a, roster_b);
    }
}
