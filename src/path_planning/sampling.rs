//! Random point sources for tree growth

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::{AreaBounds, Point2D};

/// Uniform sampler over the workspace, optionally seeded for reproducible runs
#[derive(Debug, Clone)]
pub struct WorkspaceSampler {
    bounds: AreaBounds,
    seed: Option<u64>,
    rng: StdRng,
}

impl WorkspaceSampler {
    pub fn new(bounds: AreaBounds, seed: Option<u64>) -> Self {
        WorkspaceSampler {
            bounds,
            seed,
            rng: Self::make_rng(seed),
        }
    }

    fn make_rng(seed: Option<u64>) -> StdRng {
        match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Restart the random stream; a seeded sampler replays the same points
    pub fn reset(&mut self) {
        self.rng = Self::make_rng(self.seed);
    }

    /// Uniform point inside the workspace bounds
    pub fn sample(&mut self) -> Point2D {
        Point2D::new(
            self.rng.gen_range(self.bounds.xmin..self.bounds.xmax),
            self.rng.gen_range(self.bounds.ymin..self.bounds.ymax),
        )
    }

    /// Integer-valued point in the square window `center ± half_width`
    pub fn sample_window(&mut self, center: Point2D, half_width: f64) -> Point2D {
        let x = self.rng.gen_range(Self::int_range(center.x, half_width));
        let y = self.rng.gen_range(Self::int_range(center.y, half_width));
        Point2D::new(x as f64, y as f64)
    }

    fn int_range(c: f64, half_width: f64) -> std::ops::RangeInclusive<i64> {
        let lo = (c - half_width).round() as i64;
        let hi = (c + half_width).round() as i64;
        lo..=hi.max(lo)
    }
}
