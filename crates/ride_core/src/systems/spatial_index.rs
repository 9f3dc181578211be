use bevy_ecs::prelude::{Entity, Query, ResMut};

use crate::ecs::{Driver, DriverState, Position};
use crate::geo::cell_for;
use crate::spatial::SpatialIndex;

/// Keeps the driver spatial index in sync with positions and states. Runs
/// after every event; offline drivers are dropped from the index.
pub fn update_spatial_index_system(
    mut index: ResMut<SpatialIndex>,
    drivers: Query<(Entity, &Driver, &Position)>,
) {
    for (entity, driver, position) in drivers.iter() {
        if driver.state == DriverState::Offline {
            index.remove_driver(entity);
            continue;
        }
        let Some(cell) = cell_for(position.0) else {
            continue;
        };
        index.set_driver_cell(entity, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy_ecs::prelude::{Schedule, World};

    use crate::ecs::Driver;
    use crate::geo::LatLng;

    #[test]
    fn index_follows_position_and_state_changes() {
        let mut world = World::new();
        world.insert_resource(SpatialIndex::default());
        let home = LatLng::new(37.7849, -122.4000);
        let driver = world
            .spawn((Driver::available(), Position(home)))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(update_spatial_index_system);
        schedule.run(&mut world);
        assert_eq!(
            world.resource::<SpatialIndex>().driver_cell(driver),
            cell_for(home)
        );

        // Move across town; the index must follow.
        let away = LatLng::new(37.8000, -122.4300);
        world.get_mut::<Position>(driver).expect("position").0 = away;
        schedule.run(&mut world);
        assert_eq!(
            world.resource::<SpatialIndex>().driver_cell(driver),
            cell_for(away)
        );

        world.get_mut::<Driver>(driver).expect("driver").state = DriverState::Offline;
        schedule.run(&mut world);
        assert_eq!(world.resource::<SpatialIndex>().driver_cell(driver), None);
    }
}
