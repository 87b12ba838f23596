//! Drives the matcher across haystack/needle pairs

use crate::error::{FinderError, FinderResult};
use crate::image_set::{ImageLoader, MatchPair};
use crate::report::PairReport;
use crate::template_matching::TemplateMatcher;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;

/// What to do when a pair's images fail to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole run on the first decode error
    #[default]
    FailFast,
    /// Log the failing pair and continue with the rest
    BestEffort,
}

impl ErrorPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "fail" => Some(ErrorPolicy::FailFast),
            "skip" => Some(ErrorPolicy::BestEffort),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    pub error_policy: ErrorPolicy,
    /// Number of pairs matched at once; 1 runs on the calling thread
    pub jobs: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::FailFast,
            jobs: 1,
        }
    }
}

/// Matches every pair with a shared matcher and loader
pub struct PairRunner {
    matcher: Arc<TemplateMatcher>,
    loader: Arc<dyn ImageLoader>,
    options: RunOptions,
}

impl PairRunner {
    pub fn new(matcher: TemplateMatcher, loader: Arc<dyn ImageLoader>, options: RunOptions) -> Self {
        Self {
            matcher: Arc::new(matcher),
            loader,
            options,
        }
    }

    /// Match all pairs, returning one report per processed pair in pair order
    ///
    /// Pairs skipped under `ErrorPolicy::BestEffort` have no report.
    pub fn run(&self, pairs: &[MatchPair]) -> FinderResult<Vec<PairReport>> {
        let start = Instant::now();
        let config = self.matcher.config();
        log::debug!(
            "Matching {} pair(s): {} comparator, step {}, {} job(s)",
            pairs.len(),
            config.comparator.name(),
            config.pixel_step,
            self.options.jobs
        );
        let mut reports = Vec::with_capacity(pairs.len());

        if self.options.jobs > 1 && pairs.len() > 1 {
            for (pair, outcome) in pairs.iter().zip(self.run_parallel(pairs)?) {
                self.collect(pair, outcome, &mut reports)?;
            }
        } else {
            for pair in pairs {
                let outcome = match_pair(&self.matcher, self.loader.as_ref(), pair);
                self.collect(pair, outcome, &mut reports)?;
            }
        }

        log::info!(
            "✅ Matched {}/{} pair(s) in {}ms",
            reports.iter().filter(|r| r.found()).count(),
            pairs.len(),
            start.elapsed().as_millis()
        );
        Ok(reports)
    }

    fn collect(
        &self,
        pair: &MatchPair,
        outcome: FinderResult<PairReport>,
        reports: &mut Vec<PairReport>,
    ) -> FinderResult<()> {
        match outcome {
            Ok(report) => reports.push(report),
            Err(e) => match self.options.error_policy {
                ErrorPolicy::FailFast => return Err(e),
                ErrorPolicy::BestEffort => {
                    log::warn!("⚠️ Skipping pair '{}': {}", pair.base_name, e);
                }
            },
        }
        Ok(())
    }

    /// Match pairs on blocking worker threads, at most `jobs` at a time
    fn run_parallel(&self, pairs: &[MatchPair]) -> FinderResult<Vec<FinderResult<PairReport>>> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(self.options.jobs)
            .build()
            .map_err(|source| FinderError::WorkerRuntime { source })?;
        log::debug!("Matching {} pairs with {} jobs", pairs.len(), self.options.jobs);

        runtime.block_on(async {
            let permits = Arc::new(Semaphore::new(self.options.jobs));
            let mut handles = Vec::with_capacity(pairs.len());

            for pair in pairs.iter().cloned() {
                let permits = Arc::clone(&permits);
                let matcher = Arc::clone(&self.matcher);
                let loader = Arc::clone(&self.loader);
                handles.push(tokio::spawn(async move {
                    let _permit = permits.acquire_owned().await;
                    tokio::task::spawn_blocking(move || {
                        match_pair(&matcher, loader.as_ref(), &pair)
                    })
                    .await
                }));
            }

            let mut outcomes = Vec::with_capacity(handles.len());
            for handle in handles {
                outcomes.push(handle.await??);
            }
            Ok::<_, FinderError>(outcomes)
        })
    }
}

/// Decode one pair and run the two-phase search on it
pub fn match_pair(
    matcher: &TemplateMatcher,
    loader: &dyn ImageLoader,
    pair: &MatchPair,
) -> FinderResult<PairReport> {
    log::debug!("Matching {:?} against {:?}", pair.needle, pair.haystack);
    let haystack = loader.load(&pair.haystack)?;
    let needle = loader.load(&pair.needle)?;

    let result = matcher.find(&haystack, &needle);
    match &result {
        Some(m) => log::info!("  🎯 {}: {}", pair.base_name, m),
        None => log::info!("  ❌ {}: no match", pair.base_name),
    }

    Ok(PairReport {
        full_image: pair.haystack_file_name(),
        square_image: pair.needle_file_name(),
        result,
    })
}
