pub mod args;
pub mod error;
pub mod image_set;
pub mod report;
pub mod runner;
pub mod template_matching;


pub use error::{FinderError, FinderResult};
pub use image_set::{FsImageLoader, ImageLoader, MatchPair};
pub use report::{PairReport, ReportStyle};
pub use runner::{ErrorPolicy, PairRunner, RunOptions};
pub use template_matching::{MatchConfig, MatchResult, PixelComparator, TemplateMatcher};

use std::sync::Arc;

/// Discover pairs for the parsed arguments, match them, and render the report
pub fn run(cli: &args::Args) -> FinderResult<String> {
    cli.config.validate()?;
    log::debug!("Match config: {:?}", cli.config);

    let pairs = image_set::discover_pairs(&cli.haystack, &cli.needle)?;
    let runner = PairRunner::new(
        TemplateMatcher::new(cli.config.clone()),
        Arc::new(FsImageLoader),
        cli.run_options,
    );
    let reports = runner.run(&pairs)?;
    report::render(&reports, cli.report_style, cli.config.tolerance)
}
