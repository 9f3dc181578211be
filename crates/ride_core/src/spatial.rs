//! Spatial lookups for the driver directory.
//!
//! - **GeoIndex**: wrapper for the H3 resolution configuration
//! - **Grid disk queries**: cells within K grid distance, lru-cached
//! - **SpatialIndex**: H3 cell → driver entity mappings

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, OnceLock};

use bevy_ecs::prelude::{Entity, Resource};
use h3o::{CellIndex, Resolution};
use lru::LruCache;

use crate::geo::INDEX_RESOLUTION;

#[derive(Debug, Clone, Copy)]
pub struct GeoIndex {
    resolution: Resolution,
}

impl GeoIndex {
    pub fn new(resolution: Resolution) -> Self {
        Self { resolution }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn grid_disk(&self, origin: CellIndex, k: u32) -> Vec<CellIndex> {
        debug_assert_eq!(
            origin.resolution(),
            self.resolution,
            "origin resolution must match GeoIndex resolution"
        );
        origin.grid_disk::<Vec<_>>(k)
    }
}

impl Default for GeoIndex {
    fn default() -> Self {
        Self {
            resolution: INDEX_RESOLUTION,
        }
    }
}

/// Grid disk cache for repeated nearby-driver queries around the same origin.
struct GridDiskCache {
    cache: Mutex<LruCache<(CellIndex, u32), Vec<CellIndex>>>,
}

impl GridDiskCache {
    fn new() -> Self {
        Self {
            cache: Mutex::new(LruCache::new(
                NonZeroUsize::new(500).expect("cache size must be non-zero"),
            )),
        }
    }

    fn get_or_compute(&self, origin: CellIndex, k: u32, geo: &GeoIndex) -> Vec<CellIndex> {
        let mut cache = match self.cache.lock() {
            Ok(guard) => guard,
            // Fallback: compute without cache if mutex poisoned
            Err(_) => return geo.grid_disk(origin, k),
        };
        cache
            .get_or_insert((origin, k), || geo.grid_disk(origin, k))
            .clone()
    }
}

static GRID_DISK_CACHE: OnceLock<GridDiskCache> = OnceLock::new();

/// Get grid disk with caching.
pub fn grid_disk_cached(origin: CellIndex, k: u32) -> Vec<CellIndex> {
    let geo = GeoIndex::default();
    GRID_DISK_CACHE
        .get_or_init(GridDiskCache::new)
        .get_or_compute(origin, k, &geo)
}

/// Spatial index for driver lookups by H3 cell.
///
/// Maintains cell → driver entity mappings so nearby-driver queries scan a
/// grid disk instead of every entity. Updated after each event as drivers move.
#[derive(Debug, Resource, Default)]
pub struct SpatialIndex {
    drivers_by_cell: HashMap<CellIndex, Vec<Entity>>,
    entity_to_cell: HashMap<Entity, CellIndex>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a driver in `cell`, moving it from its previous cell if needed.
    pub fn set_driver_cell(&mut self, entity: Entity, cell: CellIndex) {
        if self.entity_to_cell.get(&entity) == Some(&cell) {
            return;
        }
        self.detach(entity);
        self.drivers_by_cell.entry(cell).or_default().push(entity);
        self.entity_to_cell.insert(entity, cell);
    }

    /// Remove a driver from the index entirely.
    pub fn remove_driver(&mut self, entity: Entity) {
        self.detach(entity);
    }

    fn detach(&mut self, entity: Entity) {
        if let Some(cell) = self.entity_to_cell.remove(&entity) {
            if let Some(entities) = self.drivers_by_cell.get_mut(&cell) {
                entities.retain(|&e| e != entity);
                if entities.is_empty() {
                    self.drivers_by_cell.remove(&cell);
                }
            }
        }
    }

    /// All driver entities in the given cells.
    pub fn drivers_in_cells(&self, cells: &[CellIndex]) -> Vec<Entity> {
        let mut result = Vec::new();
        for cell in cells {
            if let Some(entities) = self.drivers_by_cell.get(cell) {
                result.extend(entities.iter().copied());
            }
        }
        result
    }

    /// The current cell for a driver entity.
    pub fn driver_cell(&self, entity: Entity) -> Option<CellIndex> {
        self.entity_to_cell.get(&entity).copied()
    }

    pub fn clear(&mut self) {
        self.drivers_by_cell.clear();
        self.entity_to_cell.clear();
    }
}
