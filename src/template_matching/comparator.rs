//! Pixel tolerance policies

/// Sum of the maximum per-channel differences over R, G and B
const MAX_CHANNEL_SUM: f64 = 3.0 * 255.0;

/// Decides whether two RGB pixels count as matching
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PixelComparator {
    /// Every channel differs by at most `tolerance`
    ChannelAbsolute { tolerance: u8 },
    /// Mean absolute channel difference, normalized to 0.0-1.0, is at most `tolerance`
    AverageDifference { tolerance: f64 },
}

impl PixelComparator {
    pub const DEFAULT_CHANNEL_TOLERANCE: u8 = 30;

    pub fn channel(tolerance: u8) -> Self {
        PixelComparator::ChannelAbsolute { tolerance }
    }

    pub fn average(tolerance: f64) -> Self {
        PixelComparator::AverageDifference { tolerance }
    }

    #[inline]
    pub fn matches(&self, a: [u8; 3], b: [u8; 3]) -> bool {
        match *self {
            PixelComparator::ChannelAbsolute { tolerance } => {
                a[0].abs_diff(b[0]) <= tolerance
                    && a[1].abs_diff(b[1]) <= tolerance
                    && a[2].abs_diff(b[2]) <= tolerance
            }
            PixelComparator::AverageDifference { tolerance } => {
                let sum = a[0].abs_diff(b[0]) as u32
                    + a[1].abs_diff(b[1]) as u32
                    + a[2].abs_diff(b[2]) as u32;
                sum as f64 <= tolerance * MAX_CHANNEL_SUM
            }
        }
    }

    /// Short name used in logs and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            PixelComparator::ChannelAbsolute { .. } => "channel",
            PixelComparator::AverageDifference { .. } => "average",
        }
    }
}

impl Default for PixelComparator {
    fn default() -> Self {
        PixelComparator::channel(Self::DEFAULT_CHANNEL_TOLERANCE)
    }
}
