//! Sequential batch resolution with randomized pacing.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use super::probes::Probes;
use super::waterfall::WaterfallResolver;
use crate::config::FinderConfig;
use crate::context::ServiceContext;
use crate::model::{Candidate, ExportRecord, ProbeMethod, ResolutionResult};
use crate::ports::{Clock, JitterSource, PageFetcher, ProgressObserver};

/// Counts derived from a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Identities processed.
    pub total: usize,
    /// Identities with a resolved profile.
    pub resolved: usize,
    /// Resolved via the source page.
    pub source_page: usize,
    /// Resolved via web search.
    pub web_search: usize,
    /// Resolved via a direct username guess.
    pub direct_match: usize,
}

impl BatchReport {
    /// Tallies results by winning method.
    #[must_use]
    pub fn from_results(results: &[ResolutionResult]) -> Self {
        let mut report = Self { total: results.len(), ..Self::default() };
        for method in results.iter().filter_map(|r| r.method) {
            report.resolved += 1;
            match method {
                ProbeMethod::SourcePage => report.source_page += 1,
                ProbeMethod::WebSearch => report.web_search += 1,
                ProbeMethod::DirectMatch => report.direct_match += 1,
            }
        }
        report
    }

    /// Resolved count for one method.
    #[must_use]
    pub fn count(&self, method: ProbeMethod) -> usize {
        match method {
            ProbeMethod::SourcePage => self.source_page,
            ProbeMethod::WebSearch => self.web_search,
            ProbeMethod::DirectMatch => self.direct_match,
        }
    }

    /// Share of identities resolved, as a whole percentage.
    #[must_use]
    pub fn resolved_percent(&self) -> usize {
        if self.total == 0 {
            0
        } else {
            (self.resolved * 100 + self.total / 2) / self.total
        }
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRun {
    /// Unique id of this run.
    pub run_id: Uuid,
    /// When the first identity started.
    pub started_at: DateTime<Utc>,
    /// When the last identity finished.
    pub finished_at: DateTime<Utc>,
    /// Aggregate counts.
    pub report: BatchReport,
    /// One result per input candidate, in input order.
    pub results: Vec<ResolutionResult>,
}

impl BatchRun {
    /// Export records in input order, ranked among resolved entries.
    #[must_use]
    pub fn export_records(&self) -> Vec<ExportRecord> {
        export_records(&self.results)
    }
}

/// Builds export records; `rank` counts resolved entries only, from 1.
#[must_use]
pub fn export_records(results: &[ResolutionResult]) -> Vec<ExportRecord> {
    let mut next_rank = 0u32;
    results
        .iter()
        .map(|result| {
            let rank = result.is_resolved().then(|| {
                next_rank += 1;
                next_rank
            });
            ExportRecord {
                rank,
                display_name: result.identity.display_name.clone(),
                source_profile_url: result.identity.source_profile_url.clone(),
                resolved_profile_url: result.profile_url.clone(),
                method: result.method.map(|m| m.description().to_string()),
                confidence: result.confidence,
                total_comments: result.metrics.total_comments,
                total_likes: result.metrics.total_likes,
                activity_score: result.metrics.activity_score,
            }
        })
        .collect()
}

/// Runs the waterfall over candidates one at a time, pausing between them.
pub struct BatchScheduler<'a> {
    resolver: WaterfallResolver<'a>,
    clock: &'a dyn Clock,
    jitter: &'a dyn JitterSource,
    config: &'a FinderConfig,
}

impl<'a> BatchScheduler<'a> {
    /// Creates a scheduler from individual ports.
    #[must_use]
    pub fn new(
        fetcher: &'a dyn PageFetcher,
        clock: &'a dyn Clock,
        jitter: &'a dyn JitterSource,
        config: &'a FinderConfig,
    ) -> Self {
        let resolver = WaterfallResolver::new(Probes::new(fetcher, config));
        Self { resolver, clock, jitter, config }
    }

    /// Creates a scheduler from a service context.
    #[must_use]
    pub fn from_context(ctx: &'a ServiceContext, config: &'a FinderConfig) -> Self {
        Self::new(ctx.fetcher.as_ref(), ctx.clock.as_ref(), ctx.jitter.as_ref(), config)
    }

    /// Delay before the next identity: base delay plus jitter.
    #[must_use]
    pub fn next_delay(&self) -> Duration {
        let jitter = self.jitter.jitter_ms(self.config.jitter_ceiling_ms);
        self.config.base_delay() + Duration::from_millis(jitter)
    }

    /// Resolves every candidate in order.
    ///
    /// The observer hears about each identity before it is resolved. Failures
    /// stay inside each identity's result; the batch always completes.
    pub async fn run(&self, candidates: &[Candidate], observer: &dyn ProgressObserver) -> BatchRun {
        let run_id = Uuid::new_v4();
        let started_at = self.clock.now();
        let total = candidates.len();
        info!(%run_id, total, "starting profile search");

        let mut results = Vec::with_capacity(total);
        for (index, candidate) in candidates.iter().enumerate() {
            let display_name = &candidate.identity.display_name;
            observer.on_progress(index + 1, total, display_name);

            let span = info_span!("identity", index = index + 1, display_name = %display_name);
            let mut result = self.resolver.resolve(&candidate.identity).instrument(span).await;
            result.metrics = candidate.metrics;
            results.push(result);

            if index + 1 < total {
                let delay = self.next_delay();
                info!(wait_ms = delay.as_secs_f64() * 1000.0, "waiting before next identity");
                self.clock.sleep(delay).await;
            }
        }

        let report = BatchReport::from_results(&results);
        info!(
            %run_id,
            resolved = report.resolved,
            total = report.total,
            percent = report.resolved_percent(),
            source_page = report.source_page,
            web_search = report.web_search,
            direct_match = report.direct_match,
            "profile search finished"
        );

        BatchRun { run_id, started_at, finished_at: self.clock.now(), report, results }
    }
}
