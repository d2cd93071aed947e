//! Cosmetic candy-bean rain. Never read by gameplay code.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Frames between bean spawns.
pub const RAIN_SPAWN_INTERVAL: u32 = 15;
/// Drawn size of a bean.
pub const BEAN_SIZE: f32 = 20.0;
const FALL_SPEED_MIN: f32 = 1.5;
const FALL_SPEED_MAX: f32 = 3.5;
/// Number of bean sprite variants.
pub const BEAN_VARIANTS: u8 = 4;
/// Beans are dropped once this far below the viewport bottom.
const DESPAWN_MARGIN: f32 = 40.0;

/// A falling bean. `x` is in world space, `y` in screen space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CandyBean {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub variant: u8,
}

/// Seeded particle system for the background rain.
#[derive(Debug, Clone)]
pub struct CandyRain {
    rng: StdRng,
    seed: u64,
    timer: u32,
    beans: Vec<CandyBean>,
}

impl CandyRain {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
            timer: 0,
            beans: Vec::new(),
        }
    }

    /// Clear all beans and rewind the RNG so a new run replays the same rain.
    pub fn reset(&mut self) {
        *self = Self::new(self.seed);
    }

    pub fn beans(&self) -> &[CandyBean] {
        &self.beans
    }

    /// Spawn on schedule above the visible area, fall, and drop beans past the bottom.
    pub fn update(&mut self, camera_x: f32, viewport_width: f32, viewport_height: f32) {
        self.timer += 1;
        if self.timer >= RAIN_SPAWN_INTERVAL {
            self.timer = 0;
            let spread = if viewport_width > 0.0 {
                self.rng.random_range(0.0..viewport_width)
            } else {
                0.0
            };
            let x = camera_x + spread;
            let vy = self.rng.random_range(FALL_SPEED_MIN..FALL_SPEED_MAX);
            let variant = self.rng.random_range(0..BEAN_VARIANTS);
            self.beans.push(CandyBean {
                x,
                y: -BEAN_SIZE,
                vy,
                variant,
            });
        }

        for bean in &mut self.beans {
            bean.y += bean.vy;
        }
        self.beans.retain(|b| b.y < viewport_height + DESPAWN_MARGIN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_every_interval() {
        let mut rain = CandyRain::new(7);
        for _ in 0..(RAIN_SPAWN_INTERVAL - 1) {
            rain.update(0.0, 800.0, 600.0);
        }
        assert!(rain.beans().is_empty());
        rain.update(0.0, 800.0, 600.0);
        assert_eq!(rain.beans().len(), 1);

        let bean = rain.beans()[0];
        assert!(bean.x >= 0.0 && bean.x < 800.0);
        assert!(bean.vy >= FALL_SPEED_MIN && bean.vy < FALL_SPEED_MAX);
        assert!(bean.variant < BEAN_VARIANTS);
        assert_eq!(bean.y, -BEAN_SIZE + bean.vy);
    }

    #[test]
    fn spawn_follows_camera() {
        let mut rain = CandyRain::new(7);
        for _ in 0..RAIN_SPAWN_INTERVAL {
            rain.update(1200.0, 800.0, 600.0);
        }
        let bean = rain.beans()[0];
        assert!(bean.x >= 1200.0 && bean.x < 2000.0);
    }

    #[test]
    fn beans_are_removed_below_viewport() {
        let mut rain = CandyRain::new(3);
        for _ in 0..2000 {
            rain.update(0.0, 800.0, 600.0);
            assert!(rain.beans().iter().all(|b| b.y < 640.0));
        }
        // 660 px of fall at >= 1.5 px/frame bounds a bean's lifetime
        assert!(rain.beans().len() <= (660.0 / 1.5 / RAIN_SPAWN_INTERVAL as f32) as usize + 1);
    }

    #[test]
    fn same_seed_same_rain() {
        let mut a = CandyRain::new(99);
        let mut b = CandyRain::new(99);
        for _ in 0..300 {
            a.update(0.0, 800.0, 600.0);
            b.update(0.0, 800.0, 600.0);
        }
        assert_eq!(a.beans(), b.beans());

        a.reset();
        assert!(a.beans().is_empty());
        let mut fresh = CandyRain::new(99);
        for _ in 0..60 {
            a.update(0.0, 800.0, 600.0);
            fresh.update(0.0, 800.0, 600.0);
        }
        assert_eq!(a.beans(), fresh.beans());
    }
}
