//! Scripted ride-hailing demo: sign in with a phone, pick a nearby driver,
//! and watch one ride run through its fixed lifecycle on a simulated clock.

mod export;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::exit;

use bevy_ecs::prelude::World;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::ProgressBar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use ride_core::auth::{self, Session};
use ride_core::clock::EventKind;
use ride_core::directory::{driver_details, nearby_drivers, DEFAULT_SEARCH_RADIUS_K};
use ride_core::ecs::{Address, DriverProfile, Position, Ride, RideEta};
use ride_core::geo::LatLng;
use ride_core::history::RideLog;
use ride_core::rides::{rate_ride, request_ride};
use ride_core::runner::{run_until_empty, run_until_empty_with_hook, simulation_schedule};
use ride_core::scenario::{build_demo, DemoParams};
use ride_core::session::{MemoryBackend, SessionStore};

use crate::export::{export_history_csv, export_history_json};

const DEMO_PHONE: &str = "+14155550123";
const PICKUP_ADDRESS: &str = "123 Market St, San Francisco, CA";
const PICKUP: LatLng = LatLng {
    latitude: 37.7849,
    longitude: -122.4000,
};

/// Destinations the demo cycles through.
const DESTINATIONS: &[(&str, f64, f64)] = &[
    ("456 Valencia St, San Francisco, CA", 37.7649, -122.4214),
    ("555 California St, San Francisco, CA", 37.7925, -122.4070),
    ("1 Ferry Building, San Francisco, CA", 37.7955, -122.3937),
];

#[derive(Parser)]
#[command(
    name = "ride_demo",
    about = "Client-side ride-hailing demo on a simulated clock"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in, pick the nearest driver, and run one scripted ride
    Ride {
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 8)]
        drivers: usize,
    },
    /// Print the generated driver roster
    Fleet {
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, default_value_t = 8)]
        drivers: usize,
    },
    /// Run a few scripted rides and export the history
    History {
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
        format: ExportFormat,
        #[arg(long, default_value = "ride_history.json")]
        output: PathBuf,
        #[arg(long, default_value_t = 3)]
        rides: usize,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExportFormat {
    Json,
    Csv,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Ride { seed, drivers } => run_ride(seed, drivers),
        Commands::Fleet { seed, drivers } => print_fleet(seed, drivers),
        Commands::History {
            seed,
            format,
            output,
            rides,
        } => run_history(seed, format, &output, rides),
    };
    if let Err(err) = result {
        eprintln!("error: {err}");
        exit(1);
    }
}

/// Mock phone sign-in: issue a code, verify it, open a session.
fn sign_in(seed: u64) -> Result<Session, Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let challenge = auth::send_verification_code(DEMO_PHONE, &mut rng)?;
    let session = auth::verify_code(DEMO_PHONE, &challenge.code, &mut rng)?;
    println!("signed in as {} ({DEMO_PHONE})", session.user.id);
    Ok(session)
}

fn demo_world(seed: u64, drivers: usize) -> World {
    let mut world = World::new();
    build_demo(
        &mut world,
        DemoParams::default()
            .with_seed(seed)
            .with_num_drivers(drivers)
            .with_epoch_ms(chrono::Utc::now().timestamp_millis()),
    );
    world
}

fn eta_suffix(minutes: Option<u32>) -> String {
    minutes.map(|m| format!(", eta {m} min")).unwrap_or_default()
}

fn run_ride(seed: u64, drivers: usize) -> Result<(), Box<dyn Error>> {
    let session = sign_in(seed)?;
    let mut store = SessionStore::new(MemoryBackend::default());
    store.persist(&session)?;

    let mut world = demo_world(seed, drivers);

    let nearby = nearby_drivers(&world, PICKUP, DEFAULT_SEARCH_RADIUS_K);
    let Some(chosen) = nearby.first() else {
        return Err("no drivers nearby".into());
    };
    println!(
        "{} drivers nearby; picking {} ({} {}, {:.1}*, {:.2} km away)",
        nearby.len(),
        chosen.profile.name,
        chosen.profile.vehicle.color,
        chosen.profile.vehicle.model,
        chosen.profile.rating,
        chosen.distance_km,
    );

    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let (name, lat, lng) = DESTINATIONS[rng.gen_range(0..DESTINATIONS.len())];
    let pickup = Address {
        address: PICKUP_ADDRESS.into(),
        location: PICKUP,
    };
    let dropoff = Address {
        address: name.into(),
        location: LatLng::new(lat, lng),
    };

    let user_id = session.user.id.clone();
    let chosen_entity = chosen.entity;
    let ride_entity = request_ride(&mut world, &user_id, chosen_entity, pickup, dropoff)?;
    let ride_id = world
        .get::<Ride>(ride_entity)
        .map(|r| r.id)
        .ok_or("ride entity missing")?;
    println!("ride {ride_id} requested to {name}");

    let bar = ProgressBar::new(4);
    let mut schedule = simulation_schedule();
    run_until_empty_with_hook(&mut world, &mut schedule, 10_000, |world, event| {
        let minutes = world.resource::<RideEta>().0;
        let t = event.timestamp / 1_000;
        match event.kind {
            EventKind::RideAccepted => {
                bar.inc(1);
                bar.println(format!("[{t:>3}s] driver accepted{}", eta_suffix(minutes)));
            }
            EventKind::DriverArriving => {
                bar.inc(1);
                bar.println(format!("[{t:>3}s] driver arriving{}", eta_suffix(minutes)));
            }
            EventKind::TripStarted => {
                bar.inc(1);
                bar.println(format!("[{t:>3}s] trip started{}", eta_suffix(minutes)));
            }
            EventKind::TripCompleted => {
                bar.inc(1);
                bar.println(format!("[{t:>3}s] trip completed"));
            }
            _ => {}
        }
    });
    bar.finish_and_clear();

    let record = world
        .resource::<RideLog>()
        .find(ride_id)
        .cloned()
        .ok_or("ride missing from history")?;
    println!(
        "fare ${:.2} for {:.2} km (~{} min)",
        record.fare.unwrap_or(0.0),
        record.distance_km.unwrap_or(0.0),
        record.duration_min.unwrap_or(0),
    );

    rate_ride(&mut world, record.id, 5)?;
    println!("rated {} 5/5", record.id);

    if let Some(details) = driver_details(&mut world, &record.driver_id) {
        println!(
            "driver {} is available again at ({:.4}, {:.4})",
            details.profile.name,
            details.position.latitude,
            details.position.longitude,
        );
    }

    store.clear()?;
    println!("signed out");
    Ok(())
}

fn print_fleet(seed: u64, drivers: usize) -> Result<(), Box<dyn Error>> {
    let mut world = demo_world(seed, drivers);

    println!(
        "{:<5} {:<20} {:<22} {:<8} {:>6}",
        "id", "name", "vehicle", "plate", "rating"
    );
    let roster: Vec<(DriverProfile, LatLng)> = world
        .query::<(&DriverProfile, &Position)>()
        .iter(&world)
        .map(|(profile, position)| (profile.clone(), position.0))
        .collect();
    for (profile, position) in roster {
        println!(
            "{:<5} {:<20} {:<22} {:<8} {:>6.1}  ({:.4}, {:.4})",
            profile.id.to_string(),
            profile.name,
            format!("{} {}", profile.vehicle.color, profile.vehicle.model),
            profile.vehicle.plate,
            profile.rating,
            position.latitude,
            position.longitude,
        );
    }
    Ok(())
}

fn run_history(
    seed: u64,
    format: ExportFormat,
    output: &Path,
    rides: usize,
) -> Result<(), Box<dyn Error>> {
    let session = sign_in(seed)?;
    let mut world = demo_world(seed, 8);
    let mut schedule = simulation_schedule();

    for i in 0..rides {
        let nearby = nearby_drivers(&world, PICKUP, DEFAULT_SEARCH_RADIUS_K);
        if nearby.is_empty() {
            return Err("no drivers nearby".into());
        }
        let choice = nearby[i % nearby.len()].entity;
        let (name, lat, lng) = DESTINATIONS[i % DESTINATIONS.len()];
        request_ride(
            &mut world,
            &session.user.id,
            choice,
            Address {
                address: PICKUP_ADDRESS.into(),
                location: PICKUP,
            },
            Address {
                address: name.into(),
                location: LatLng::new(lat, lng),
            },
        )?;
        run_until_empty(&mut world, &mut schedule, 10_000);
    }

    // Rate them like a rider would: mostly fives, the odd four.
    let ratings: Vec<_> = world
        .resource::<RideLog>()
        .history()
        .iter()
        .enumerate()
        .map(|(i, r)| (r.id, 5 - (i as u8 % 2)))
        .collect();
    for (id, rating) in ratings {
        rate_ride(&mut world, id, rating)?;
    }

    let log = world.resource::<RideLog>();
    let records = log.history();
    match format {
        ExportFormat::Json => export_history_json(&records, output)?,
        ExportFormat::Csv => export_history_csv(&records, output)?,
    }
    println!("exported {} rides to {}", records.len(), output.display());
    Ok(())
}
