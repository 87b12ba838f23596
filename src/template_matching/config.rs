//! Configuration for the two-phase template search

use super::comparator::PixelComparator;
use crate::error::{FinderError, FinderResult};

/// Rounding slack when comparing a score against the acceptance floor
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// Stride between coarse placements and between sampled needle pixels
    pub pixel_step: u32,
    /// Score at which a scan stops and takes the current placement (0.0 to 1.0)
    pub early_stop_threshold: f64,
    /// Fractional tolerance; a refined match needs a score of at least `1.0 - tolerance`
    pub tolerance: f64,
    /// Pixel matching policy
    pub comparator: PixelComparator,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            pixel_step: 4,
            early_stop_threshold: 0.98,
            tolerance: 0.1,
            comparator: PixelComparator::default(),
        }
    }
}

impl MatchConfig {
    /// Minimum refined score for a match that did not stop early
    pub fn acceptance_floor(&self) -> f64 {
        1.0 - self.tolerance
    }

    /// Whether a refined score clears the acceptance floor
    ///
    /// Compared as a miss fraction against the tolerance, with slack for
    /// rounding, so a score sitting exactly on `1.0 - tolerance` passes.
    pub fn accepts(&self, score: f64) -> bool {
        1.0 - score <= self.tolerance + SCORE_EPSILON
    }

    /// Named configuration: `default`, `strict` or `lenient`
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "default" => Some(Self::default()),
            "strict" => Some(create_strict_config()),
            "lenient" => Some(create_lenient_config()),
            _ => None,
        }
    }

    /// Half-width of the refinement window around the coarse winner
    pub fn refine_radius(&self) -> u32 {
        self.pixel_step.saturating_mul(2)
    }

    pub fn validate(&self) -> FinderResult<()> {
        if self.pixel_step == 0 {
            return Err(FinderError::InvalidConfig {
                description: "pixel step must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.tolerance) {
            return Err(FinderError::InvalidConfig {
                description: format!("tolerance {} is outside 0.0-1.0", self.tolerance),
            });
        }
        if !(0.0..=1.0).contains(&self.early_stop_threshold) {
            return Err(FinderError::InvalidConfig {
                description: format!(
                    "early stop threshold {} is outside 0.0-1.0",
                    self.early_stop_threshold
                ),
            });
        }
        if let PixelComparator::AverageDifference { tolerance } = self.comparator
            && !(0.0..=1.0).contains(&tolerance)
        {
            return Err(FinderError::InvalidConfig {
                description: format!("average pixel tolerance {} is outside 0.0-1.0", tolerance),
            });
        }
        Ok(())
    }
}

/// Configuration preset for near pixel-perfect needles (screenshots, exports)
pub fn create_strict_config() -> MatchConfig {
    MatchConfig {
        pixel_step: 4,
        early_stop_threshold: 0.99,
        tolerance: 0.02,
        comparator: PixelComparator::channel(8),
    }
}

/// Configuration preset for recompressed or slightly recolored needles
pub fn create_lenient_config() -> MatchConfig {
    MatchConfig {
        pixel_step: 2,
        early_stop_threshold: 0.98,
        tolerance: 0.2,
        comparator: PixelComparator::average(0.15),
    }
}
