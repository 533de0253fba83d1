//! Sleep and jitter sources for the refresh loop.
//!
//! Both are traits so tests can run the loop instantly and with a known
//! refresh interval.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Something that can wait.
#[allow(async_fn_in_trait)]
pub trait Pacer {
    async fn sleep(&self, duration: Duration);
}

/// Real wall-clock sleeping on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioPacer;

impl Pacer for TokioPacer {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Picks a wait within a window.
pub trait Jitter {
    /// Returns a duration in `min..=max`. If `max < min`, returns `min`.
    fn pick(&mut self, min: Duration, max: Duration) -> Duration;
}

/// Uniformly random wait.
#[derive(Debug, Clone)]
pub struct UniformJitter {
    rng: StdRng,
}

impl UniformJitter {
    /// Seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Reproducible sequence from a fixed seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for UniformJitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Jitter for UniformJitter {
    fn pick(&mut self, min: Duration, max: Duration) -> Duration {
        if max <= min {
            return min;
        }
        self.rng.gen_range(min..=max)
    }
}

/// Always the same wait, ignoring the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedJitter(pub Duration);

impl Jitter for FixedJitter {
    fn pick(&mut self, _min: Duration, _max: Duration) -> Duration {
        self.0
    }
}
