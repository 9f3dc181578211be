//! Driver directory queries backing the map view.

use std::cmp::Ordering;

use bevy_ecs::prelude::{Entity, World};

use crate::ecs::{Driver, DriverId, DriverProfile, DriverState, Position};
use crate::geo::{cell_for, eta_minutes, haversine_km, LatLng};
use crate::spatial::{grid_disk_cached, SpatialIndex};

/// Grid-disk radius for nearby queries; resolution-9 cell centers sit
/// ~300 m apart, so k=25 covers roughly a 7 km radius.
pub const DEFAULT_SEARCH_RADIUS_K: u32 = 25;

/// A driver surfaced by a nearby query, closest first.
#[derive(Debug, Clone)]
pub struct NearbyDriver {
    pub entity: Entity,
    pub profile: DriverProfile,
    pub position: LatLng,
    pub distance_km: f64,
    pub eta_minutes: u32,
}

/// Available drivers within `radius_k` grid cells of `location`, sorted by
/// distance. Requires a synced [SpatialIndex] resource.
pub fn nearby_drivers(world: &World, location: LatLng, radius_k: u32) -> Vec<NearbyDriver> {
    let Some(origin) = cell_for(location) else {
        return Vec::new();
    };
    let cells = grid_disk_cached(origin, radius_k);
    let candidates = world.resource::<SpatialIndex>().drivers_in_cells(&cells);

    let mut result = Vec::new();
    for entity in candidates {
        let Some(driver) = world.get::<Driver>(entity) else {
            continue;
        };
        if driver.state != DriverState::Available {
            continue;
        }
        let (Some(profile), Some(position)) = (
            world.get::<DriverProfile>(entity),
            world.get::<Position>(entity),
        ) else {
            continue;
        };
        let distance_km = haversine_km(location, position.0);
        result.push(NearbyDriver {
            entity,
            profile: profile.clone(),
            position: position.0,
            distance_km,
            eta_minutes: eta_minutes(distance_km),
        });
    }
    result.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(Ordering::Equal)
    });
    result
}

/// Profile and current state of one driver.
#[derive(Debug, Clone)]
pub struct DriverDetails {
    pub entity: Entity,
    pub profile: DriverProfile,
    pub position: LatLng,
    pub state: DriverState,
}

/// Looks a driver up by its public id.
pub fn driver_details(world: &mut World, driver_id: &DriverId) -> Option<DriverDetails> {
    world
        .query::<(Entity, &DriverProfile, &Driver, &Position)>()
        .iter(world)
        .find(|(_, profile, _, _)| &profile.id == driver_id)
        .map(|(entity, profile, driver, position)| DriverDetails {
            entity,
            profile: profile.clone(),
            position: position.0,
            state: driver.state,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{Vehicle, VehicleKind};
    use crate::geo::LatLng;

    const ORIGIN: LatLng = LatLng {
        latitude: 37.7849,
        longitude: -122.4000,
    };

    fn profile(id: &str) -> DriverProfile {
        DriverProfile {
            id: DriverId(id.to_string()),
            name: "Test Driver".into(),
            phone_number: "+15555550100".into(),
            rating: 4.8,
            photo: String::new(),
            vehicle: Vehicle {
                model: "Toyota Camry".into(),
                color: "Silver".into(),
                plate: "ABC123".into(),
                kind: VehicleKind::Sedan,
            },
        }
    }

    fn spawn_driver(world: &mut World, id: &str, state: DriverState, position: LatLng) -> Entity {
        let entity = world
            .spawn((
                Driver {
                    state,
                    active_ride: None,
                },
                profile(id),
                Position(position),
            ))
            .id();
        let cell = cell_for(position).expect("cell");
        world
            .resource_mut::<SpatialIndex>()
            .set_driver_cell(entity, cell);
        entity
    }

    fn world_with_index() -> World {
        let mut world = World::new();
        world.insert_resource(SpatialIndex::default());
        world
    }

    #[test]
    fn nearby_is_sorted_by_distance_and_skips_busy_drivers() {
        let mut world = world_with_index();
        let far = spawn_driver(
            &mut world,
            "d-far",
            DriverState::Available,
            LatLng::new(37.7900, -122.4080),
        );
        let near = spawn_driver(
            &mut world,
            "d-near",
            DriverState::Available,
            LatLng::new(37.7851, -122.4005),
        );
        spawn_driver(
            &mut world,
            "d-busy",
            DriverState::OnTrip,
            LatLng::new(37.7850, -122.4001),
        );

        let found = nearby_drivers(&world, ORIGIN, DEFAULT_SEARCH_RADIUS_K);
        let entities: Vec<Entity> = found.iter().map(|d| d.entity).collect();
        assert_eq!(entities, vec![near, far]);
        assert!(found[0].distance_km <= found[1].distance_km);
        assert!(found.iter().all(|d| d.eta_minutes >= 1));
    }

    #[test]
    fn nearby_ignores_drivers_outside_the_radius() {
        let mut world = world_with_index();
        // Oakland, well outside a k=3 disk around downtown SF.
        spawn_driver(
            &mut world,
            "d-east-bay",
            DriverState::Available,
            LatLng::new(37.8044, -122.2712),
        );
        assert!(nearby_drivers(&world, ORIGIN, 3).is_empty());
    }

    #[test]
    fn driver_details_finds_by_public_id() {
        let mut world = world_with_index();
        let entity = spawn_driver(&mut world, "d7", DriverState::Available, ORIGIN);

        let details =
            driver_details(&mut world, &DriverId("d7".into())).expect("details");
        assert_eq!(details.entity, entity);
        assert_eq!(details.state, DriverState::Available);
        assert!(driver_details(&mut world, &DriverId("nope".into())).is_none());
    }
}
