/// Template matching data types
use image::{RgbImage, RgbaImage};

/// Read-only pixel access for a haystack or needle image
///
/// Callers only ask for coordinates inside `width() x height()`.
pub trait PixelSource {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    /// RGB value at (x, y); any alpha channel is dropped
    fn rgb(&self, x: u32, y: u32) -> [u8; 3];
}

impl PixelSource for RgbImage {
    fn width(&self) -> u32 {
        RgbImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbImage::height(self)
    }

    #[inline]
    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        self.get_pixel(x, y).0
    }
}

impl PixelSource for RgbaImage {
    fn width(&self) -> u32 {
        RgbaImage::width(self)
    }

    fn height(&self) -> u32 {
        RgbaImage::height(self)
    }

    #[inline]
    fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.get_pixel(x, y).0;
        [r, g, b]
    }
}

/// Top-left corner of a trial needle placement in haystack coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub x: u32,
    pub y: u32,
}

impl Placement {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Inclusive range of valid placements for a needle inside a haystack
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementRange {
    pub max_x: u32,
    pub max_y: u32,
}

impl PlacementRange {
    /// `None` when the needle does not fit in the haystack on either axis
    pub fn between(haystack: &impl PixelSource, needle: &impl PixelSource) -> Option<Self> {
        if needle.width() == 0
            || needle.height() == 0
            || needle.width() > haystack.width()
            || needle.height() > haystack.height()
        {
            return None;
        }

        Some(Self {
            max_x: haystack.width() - needle.width(),
            max_y: haystack.height() - needle.height(),
        })
    }

    pub fn contains(&self, placement: Placement) -> bool {
        placement.x <= self.max_x && placement.y <= self.max_y
    }

    /// Number of placements in the range
    pub fn count(&self) -> u64 {
        (self.max_x as u64 + 1) * (self.max_y as u64 + 1)
    }
}

/// Best placement found by one scan phase
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanOutcome {
    pub placement: Placement,
    /// Fraction of compared pixels that matched (0.0-1.0)
    pub score: f64,
    /// Whether the scan stopped early on a high-confidence placement
    pub early_stop: bool,
}

/// Accepted location of a needle inside a haystack
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    /// X coordinate of the top-left corner in the haystack
    pub x: u32,
    /// Y coordinate of the top-left corner in the haystack
    pub y: u32,
    /// Needle width
    pub width: u32,
    /// Needle height
    pub height: u32,
    /// Fraction of needle pixels matching at this placement (0.0-1.0)
    pub match_percentage: f64,
}

impl MatchResult {
    pub fn placement(&self) -> Placement {
        Placement::new(self.x, self.y)
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}x{} at ({},{}) - {:.2}%",
            self.width,
            self.height,
            self.x,
            self.y,
            self.match_percentage * 100.0
        )
    }
}
