/// Template matching module for locating a needle image in a haystack image
///
/// This module provides a two-phase tolerant template search with:
/// - Configurable per-pixel tolerance policies
/// - Strided coarse scan over the whole placement range
/// - Exhaustive refinement in a window around the coarse winner
/// - Early exit once a placement clears the confidence threshold
pub mod comparator;
pub mod config;
pub mod matcher;
pub mod types;

pub use comparator::PixelComparator;
pub use config::{MatchConfig, create_lenient_config, create_strict_config};
pub use matcher::TemplateMatcher;
pub use types::{MatchResult, PixelSource, Placement, PlacementRange, ScanOutcome};
