//! Logical volume shared by every pipeline
//!
//! The rate is on the cubic scale used by desktop mixers: 0.0 is silence,
//! 1.0 is unity, and the perceived loudness grows roughly linearly with it.

/// Volume controller
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    /// Volume rate (0.0-1.0)
    rate: f64,
}

impl Volume {
    /// Create new volume controller
    ///
    /// # Arguments
    /// * `rate` - Initial volume, clamped to 0.0-1.0
    pub fn new(rate: f64) -> Self {
        Self {
            rate: Self::clamp(rate),
        }
    }

    /// Set volume rate, returns true if it changed
    pub fn set_rate(&mut self, rate: f64) -> bool {
        let rate = Self::clamp(rate);
        if (rate - self.rate).abs() < f64::EPSILON {
            return false;
        }
        self.rate = rate;
        true
    }

    /// Get current volume rate
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Linear amplitude multiplier for the current rate
    ///
    /// For backends whose volume element takes a linear gain.
    pub fn linear_gain(&self) -> f64 {
        self.rate.powi(3)
    }

    fn clamp(rate: f64) -> f64 {
        if rate.is_nan() {
            return 0.0;
        }
        rate.clamp(0.0, 1.0)
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::new(1.0)
    }
}
