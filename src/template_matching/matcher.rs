/// Template matching implementation
///
/// Two-phase search: a strided coarse scan picks an approximate placement,
/// then an exhaustive scan of the surrounding window finds the exact one.
/// Both phases stop as soon as a placement clears the early-stop threshold.
use super::config::MatchConfig;
use super::types::{MatchResult, PixelSource, Placement, PlacementRange, ScanOutcome};

/// Inclusive rectangle of placements visited by one scan
#[derive(Clone, Copy, Debug)]
struct ScanWindow {
    x_min: u32,
    x_max: u32,
    y_min: u32,
    y_max: u32,
}

/// Template matcher for locating a needle image inside a haystack image
pub struct TemplateMatcher {
    config: MatchConfig,
}

impl TemplateMatcher {
    /// Create a matcher with the given configuration
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Find the needle in the haystack
    ///
    /// Returns `None` when the needle does not fit, or when the refined score
    /// is below `1.0 - tolerance` and the refinement never stopped early.
    pub fn find(
        &self,
        haystack: &impl PixelSource,
        needle: &impl PixelSource,
    ) -> Option<MatchResult> {
        let coarse = self.coarse_scan(haystack, needle)?;
        log::debug!(
            "  coarse best ({},{}) score {:.4}{}",
            coarse.placement.x,
            coarse.placement.y,
            coarse.score,
            if coarse.early_stop { " (early stop)" } else { "" }
        );

        let refined = self.refine_scan(haystack, needle, coarse.placement)?;
        log::debug!(
            "  refined best ({},{}) score {:.4}{}",
            refined.placement.x,
            refined.placement.y,
            refined.score,
            if refined.early_stop { " (early stop)" } else { "" }
        );

        if !refined.early_stop && !self.config.accepts(refined.score) {
            log::debug!(
                "  rejected: score {:.4} below acceptance floor {:.4}",
                refined.score,
                self.config.acceptance_floor()
            );
            return None;
        }

        Some(MatchResult {
            x: refined.placement.x,
            y: refined.placement.y,
            width: needle.width(),
            height: needle.height(),
            match_percentage: refined.score,
        })
    }

    /// Sampled scan over every `pixel_step`-th placement
    ///
    /// Only every `pixel_step`-th needle row and column is compared.
    pub fn coarse_scan(
        &self,
        haystack: &impl PixelSource,
        needle: &impl PixelSource,
    ) -> Option<ScanOutcome> {
        let range = PlacementRange::between(haystack, needle)?;
        let window = ScanWindow {
            x_min: 0,
            x_max: range.max_x,
            y_min: 0,
            y_max: range.max_y,
        };
        let step = self.config.pixel_step;
        Some(self.scan(haystack, needle, window, step, step))
    }

    /// Exhaustive scan of the window around `around`
    ///
    /// The window reaches `2 * pixel_step` placements in each direction and is
    /// clamped to the valid placement range.
    pub fn refine_scan(
        &self,
        haystack: &impl PixelSource,
        needle: &impl PixelSource,
        around: Placement,
    ) -> Option<ScanOutcome> {
        let range = PlacementRange::between(haystack, needle)?;
        if !range.contains(around) {
            log::debug!(
                "  refine center ({},{}) outside placements, clamping",
                around.x,
                around.y
            );
        }
        let radius = self.config.refine_radius();
        let window = ScanWindow {
            x_min: around.x.saturating_sub(radius).min(range.max_x),
            x_max: around.x.saturating_add(radius).min(range.max_x),
            y_min: around.y.saturating_sub(radius).min(range.max_y),
            y_max: around.y.saturating_add(radius).min(range.max_y),
        };
        Some(self.scan(haystack, needle, window, 1, 1))
    }

    /// Fraction of matching pixels with the needle at `placement`
    ///
    /// Compares every `stride`-th needle row and column starting at (0, 0).
    /// The placement must lie inside the valid range.
    pub fn score_at(
        &self,
        haystack: &impl PixelSource,
        needle: &impl PixelSource,
        placement: Placement,
        stride: u32,
    ) -> f64 {
        let stride = stride.max(1) as usize;
        let comparator = &self.config.comparator;
        let mut matched: u64 = 0;
        let mut total: u64 = 0;

        for ny in (0..needle.height()).step_by(stride) {
            for nx in (0..needle.width()).step_by(stride) {
                total += 1;
                let h = haystack.rgb(placement.x + nx, placement.y + ny);
                if comparator.matches(h, needle.rgb(nx, ny)) {
                    matched += 1;
                }
            }
        }

        if total == 0 {
            return 0.0;
        }
        matched as f64 / total as f64
    }

    /// Visit placements in raster order, keeping the first best score
    fn scan(
        &self,
        haystack: &impl PixelSource,
        needle: &impl PixelSource,
        window: ScanWindow,
        placement_step: u32,
        sample_step: u32,
    ) -> ScanOutcome {
        let placement_step = placement_step.max(1) as usize;
        let threshold = self.config.early_stop_threshold;

        let cols = (window.x_max - window.x_min) as usize / placement_step + 1;
        let rows = (window.y_max - window.y_min) as usize / placement_step + 1;
        let total_positions = cols * rows;
        let report_interval = (total_positions / 10).max(1);
        let mut position_count = 0usize;

        let mut best = ScanOutcome {
            placement: Placement::new(window.x_min, window.y_min),
            score: f64::NEG_INFINITY,
            early_stop: false,
        };

        for y in (window.y_min..=window.y_max).step_by(placement_step) {
            for x in (window.x_min..=window.x_max).step_by(placement_step) {
                let placement = Placement::new(x, y);
                let score = self.score_at(haystack, needle, placement, sample_step);

                if score > best.score {
                    best.placement = placement;
                    best.score = score;
                }

                if score >= threshold {
                    return ScanOutcome {
                        placement,
                        score,
                        early_stop: true,
                    };
                }

                position_count += 1;
                if position_count.is_multiple_of(report_interval) {
                    let progress_pct = (position_count * 100 / total_positions) as u32;
                    log::trace!("  ⏳ Placement scanning: {}%", progress_pct);
                }
            }
        }

        best
    }
}

impl Default for TemplateMatcher {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}
