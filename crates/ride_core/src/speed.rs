use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Samples a driving speed for each movement step, with jitter between a
/// configured range of city speeds.
#[derive(Resource)]
pub struct SpeedModel {
    rng: StdRng,
    min_kmh: f64,
    max_kmh: f64,
}

impl SpeedModel {
    pub fn new(seed: Option<u64>) -> Self {
        Self::with_range(seed, 25.0, 45.0)
    }

    pub fn with_range(seed: Option<u64>, min_kmh: f64, max_kmh: f64) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            min_kmh,
            max_kmh,
        }
    }

    pub fn sample_kmh(&mut self) -> f64 {
        self.rng.gen_range(self.min_kmh..=self.max_kmh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_range_always_returns_that_speed() {
        let mut model = SpeedModel::with_range(Some(1), 30.0, 30.0);
        assert_eq!(model.sample_kmh(), 30.0);
    }

    #[test]
    fn samples_stay_within_range() {
        let mut model = SpeedModel::with_range(Some(2), 25.0, 45.0);
        for _ in 0..100 {
            let kmh = model.sample_kmh();
            assert!((25.0..=45.0).contains(&kmh));
        }
    }
}
