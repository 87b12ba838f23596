use crate::error::{FinderError, FinderResult};
use crate::report::ReportStyle;
use crate::runner::{ErrorPolicy, RunOptions};
use crate::template_matching::{MatchConfig, PixelComparator};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparatorKind {
    Channel,
    Average,
}

/// Parsed command line for a matching run
#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub haystack: PathBuf,
    pub needle: PathBuf,
    pub config: MatchConfig,
    pub report_style: ReportStyle,
    pub run_options: RunOptions,
    pub debug_mode: bool,
}

/// What the binary should do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Args),
    Help,
    Version,
}

impl Args {
    /// Parse the process arguments
    pub fn parse() -> FinderResult<Command> {
        Self::parse_from(std::env::args().skip(1))
    }

    /// Parse arguments, excluding the program name
    pub fn parse_from<I, S>(args: I) -> FinderResult<Command>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut positional: Vec<String> = Vec::new();
        let mut preset = MatchConfig::default();
        let mut comparator: Option<ComparatorKind> = None;
        let mut channel_tolerance: Option<(u8, String)> = None;
        let mut pixel_step: Option<u32> = None;
        let mut early_stop: Option<f64> = None;
        let mut report_style = ReportStyle::default();
        let mut run_options = RunOptions::default();
        let mut debug_mode = false;

        for arg in args.into_iter().map(Into::into) {
            if arg == "--help" || arg == "-h" {
                return Ok(Command::Help);
            } else if arg == "--version" || arg == "-v" {
                return Ok(Command::Version);
            } else if arg == "--debug" {
                debug_mode = true;
            } else if let Some(val) = arg.strip_prefix("--preset=") {
                preset = MatchConfig::preset(val).ok_or_else(|| invalid("--preset", val))?;
            } else if let Some(val) = arg.strip_prefix("--comparator=") {
                comparator = Some(match val {
                    "channel" => ComparatorKind::Channel,
                    "average" => ComparatorKind::Average,
                    _ => return Err(invalid("--comparator", val)),
                });
            } else if let Some(val) = arg.strip_prefix("--channel-tolerance=") {
                let tolerance = val
                    .parse::<u8>()
                    .map_err(|_| invalid("--channel-tolerance", val))?;
                channel_tolerance = Some((tolerance, val.to_string()));
            } else if let Some(val) = arg.strip_prefix("--step=") {
                pixel_step = match val.parse::<u32>() {
                    Ok(step) if step >= 1 => Some(step),
                    _ => return Err(invalid("--step", val)),
                };
            } else if let Some(val) = arg.strip_prefix("--early-stop=") {
                early_stop =
                    Some(parse_fraction(val).ok_or_else(|| invalid("--early-stop", val))?);
            } else if let Some(val) = arg.strip_prefix("--report=") {
                report_style = ReportStyle::parse(val).ok_or_else(|| invalid("--report", val))?;
            } else if let Some(val) = arg.strip_prefix("--on-error=") {
                run_options.error_policy =
                    ErrorPolicy::parse(val).ok_or_else(|| invalid("--on-error", val))?;
            } else if let Some(val) = arg.strip_prefix("--jobs=") {
                run_options.jobs = match val.parse::<usize>() {
                    Ok(jobs) if jobs >= 1 => jobs,
                    _ => return Err(invalid("--jobs", val)),
                };
            } else if arg.starts_with("--") {
                return Err(FinderError::Usage {
                    message: format!("Unknown argument: {}", arg),
                });
            } else {
                positional.push(arg);
            }
        }

        let (haystack, needle, tolerance) = match positional.as_slice() {
            [haystack, needle] => (haystack, needle, None),
            [haystack, needle, tolerance] => (haystack, needle, Some(tolerance)),
            _ => {
                return Err(FinderError::Usage {
                    message: format!(
                        "Expected 2 or 3 positional arguments, got {}",
                        positional.len()
                    ),
                });
            }
        };

        // Flags override whatever the preset chose, in any order on the line
        let mut config = preset;
        if let Some(step) = pixel_step {
            config.pixel_step = step;
        }
        if let Some(threshold) = early_stop {
            config.early_stop_threshold = threshold;
        }
        if let Some(raw) = tolerance {
            config.tolerance = parse_fraction(raw).ok_or_else(|| FinderError::InvalidTolerance {
                value: raw.clone(),
            })?;
        }

        let preset_kind = match config.comparator {
            PixelComparator::ChannelAbsolute { .. } => ComparatorKind::Channel,
            PixelComparator::AverageDifference { .. } => ComparatorKind::Average,
        };
        config.comparator = match (comparator.unwrap_or(preset_kind), channel_tolerance) {
            (ComparatorKind::Average, Some((_, raw))) => {
                // Average difference has no per-channel limit to apply this to
                return Err(invalid("--channel-tolerance", &raw));
            }
            (ComparatorKind::Channel, Some((limit, _))) => PixelComparator::channel(limit),
            (ComparatorKind::Channel, None) => match config.comparator {
                PixelComparator::ChannelAbsolute { .. } => config.comparator,
                PixelComparator::AverageDifference { .. } => PixelComparator::default(),
            },
            (ComparatorKind::Average, None) if comparator.is_some() => {
                PixelComparator::average(config.tolerance)
            }
            (ComparatorKind::Average, None) => config.comparator,
        };

        Ok(Command::Run(Args {
            haystack: PathBuf::from(haystack),
            needle: PathBuf::from(needle),
            config,
            report_style,
            run_options,
            debug_mode,
        }))
    }
}

fn invalid(name: &str, value: &str) -> FinderError {
    FinderError::InvalidArgument {
        name: name.to_string(),
        value: value.to_string(),
    }
}

/// A finite number in 0.0-1.0
fn parse_fraction(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v))
}

pub fn print_help() {
    eprintln!("🔎 Image Position Finder");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    image-position-finder [FLAGS] <haystack> <needle> [tolerance]");
    eprintln!();
    eprintln!("ARGS:");
    eprintln!("    <haystack>          Image file, or directory of .jpg/.jpeg/.png files to search in");
    eprintln!("    <needle>            Image file, or directory of images to look for");
    eprintln!("                        Directory entries are paired by file name without extension");
    eprintln!("    [tolerance]         Fraction 0.0-1.0; matches need a score of 1 - tolerance (default: 0.1)");
    eprintln!();
    eprintln!("FLAGS:");
    eprintln!("    --preset=<default|strict|lenient>  Starting configuration; other flags override it");
    eprintln!("    --comparator=<channel|average>  Pixel tolerance policy (default: channel)");
    eprintln!("    --channel-tolerance=N           Max per-channel difference 0-255 (default: 30)");
    eprintln!("                                    Not accepted with the average comparator");
    eprintln!("    --step=N                        Coarse scan stride (default: 4)");
    eprintln!("    --early-stop=F                  Score that ends a scan early (default: 0.98)");
    eprintln!("    --report=<matches|detailed>     Output shape (default: matches)");
    eprintln!("    --on-error=<fail|skip>          Decode error handling (default: fail)");
    eprintln!("    --jobs=N                        Pairs matched in parallel (default: 1)");
    eprintln!("    --debug                         Enable debug logging");
    eprintln!("    --help, -h                      Show this help message");
    eprintln!("    --version, -v                   Show version information");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    image-position-finder screen.png button.png");
    eprintln!("    image-position-finder full/ squares/ 0.05 --report=detailed");
    eprintln!("    image-position-finder full/ squares/ --comparator=average --jobs=4");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template_matching::{create_lenient_config, create_strict_config};

    fn run_args(args: &[&str]) -> Args {
        match Args::parse_from(args.iter().copied()) {
            Ok(Command::Run(args)) => args,
            other => panic!("expected run command, got {other:?}"),
        }
    }

    #[test]
    fn test_defaults() {
        let args = run_args(&["full", "square"]);
        assert_eq!(args.haystack, PathBuf::from("full"));
        assert_eq!(args.needle, PathBuf::from("square"));
        assert_eq!(args.config, MatchConfig::default());
        assert_eq!(args.report_style, ReportStyle::Matches);
        assert_eq!(args.run_options, RunOptions::default());
        assert!(!args.debug_mode);
    }

    #[test]
    fn test_tolerance_positional() {
        let args = run_args(&["full", "square", "0.25"]);
        assert_eq!(args.config.tolerance, 0.25);
        // Channel comparator keeps its own tolerance
        assert_eq!(args.config.comparator, PixelComparator::channel(30));
    }

    #[test]
    fn test_average_comparator_follows_tolerance() {
        let args = run_args(&["--comparator=average", "full", "square", "0.2"]);
        assert_eq!(args.config.comparator, PixelComparator::average(0.2));
    }

    #[test]
    fn test_flags() {
        let args = run_args(&[
            "full",
            "--channel-tolerance=12",
            "--step=2",
            "--early-stop=0.95",
            "--report=detailed",
            "--on-error=skip",
            "--jobs=3",
            "--debug",
            "square",
        ]);
        assert_eq!(args.config.comparator, PixelComparator::channel(12));
        assert_eq!(args.config.pixel_step, 2);
        assert_eq!(args.config.early_stop_threshold, 0.95);
        assert_eq!(args.report_style, ReportStyle::Detailed);
        assert_eq!(args.run_options.error_policy, ErrorPolicy::BestEffort);
        assert_eq!(args.run_options.jobs, 3);
        assert!(args.debug_mode);
    }

    #[test]
    fn test_wrong_positional_count_is_usage_error() {
        for args in [&["only"][..], &[][..], &["a", "b", "0.1", "extra"][..]] {
            let err = Args::parse_from(args.iter().copied()).unwrap_err();
            assert!(matches!(err, FinderError::Usage { .. }), "{args:?}");
            assert!(err.is_usage());
        }
    }

    #[test]
    fn test_invalid_tolerance() {
        for raw in ["abc", "1.5", "-0.1", "NaN"] {
            let err = Args::parse_from(["a", "b", raw]).unwrap_err();
            assert!(
                matches!(err, FinderError::InvalidTolerance { ref value } if value == raw),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_invalid_flag_values() {
        for flag in [
            "--step=0",
            "--jobs=0",
            "--channel-tolerance=300",
            "--comparator=fuzzy",
            "--preset=loose",
            "--report=xml",
            "--on-error=retry",
            "--early-stop=2",
        ] {
            let err = Args::parse_from(["a", "b", flag]).unwrap_err();
            assert!(matches!(err, FinderError::InvalidArgument { .. }), "{flag}");
        }
    }

    #[test]
    fn test_channel_tolerance_rejected_with_average_comparator() {
        let err = Args::parse_from([
            "--comparator=average",
            "--channel-tolerance=12",
            "a",
            "b",
        ])
        .unwrap_err();
        assert!(
            matches!(err, FinderError::InvalidArgument { ref name, ref value }
                if name == "--channel-tolerance" && value == "12")
        );
        assert!(err.is_usage());

        // The lenient preset compares averages too
        let err = Args::parse_from(["--preset=lenient", "--channel-tolerance=12", "a", "b"])
            .unwrap_err();
        assert!(matches!(err, FinderError::InvalidArgument { .. }));
    }

    #[test]
    fn test_presets_seed_config() {
        let args = run_args(&["--preset=strict", "full", "square"]);
        assert_eq!(args.config, create_strict_config());

        let args = run_args(&["full", "square", "--preset=lenient"]);
        assert_eq!(args.config, create_lenient_config());

        let args = run_args(&["--preset=default", "full", "square"]);
        assert_eq!(args.config, MatchConfig::default());
    }

    #[test]
    fn test_flags_override_preset_in_any_order() {
        let args = run_args(&["--step=3", "--preset=strict", "full", "square", "0.3"]);
        assert_eq!(args.config.pixel_step, 3);
        assert_eq!(args.config.tolerance, 0.3);
        assert_eq!(args.config.early_stop_threshold, 0.99);
        assert_eq!(args.config.comparator, PixelComparator::channel(8));

        let args = run_args(&["--preset=lenient", "--comparator=channel", "full", "square"]);
        assert_eq!(args.config.comparator, PixelComparator::channel(30));
        assert_eq!(args.config.pixel_step, 2);

        let args = run_args(&["--preset=lenient", "--comparator=average", "a", "b", "0.25"]);
        assert_eq!(args.config.comparator, PixelComparator::average(0.25));
    }

    #[test]
    fn test_unknown_flag() {
        let err = Args::parse_from(["a", "b", "--fast"]).unwrap_err();
        assert!(matches!(err, FinderError::Usage { .. }));
    }

    #[test]
    fn test_help_and_version_win() {
        assert_eq!(Args::parse_from(["--help"]).unwrap(), Command::Help);
        assert_eq!(Args::parse_from(["a", "-v"]).unwrap(), Command::Version);
    }
}
