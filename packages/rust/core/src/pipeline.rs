//! End-to-end report pipeline: record → extract → aggregate → synthesize → format.
//!
//! Failure philosophy: a company always yields as much output as its inputs
//! allow. A missing deck degrades to an empty context block, an unreachable
//! research service degrades to the fallback brief, and in a batch one bad
//! record never stops the rest. The only hard stop for a company is a record
//! without an identifying name, which abandons all stages up front.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Semaphore;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use dealbrief_context::build_context;
use dealbrief_extract::load_document;
use dealbrief_report::{RenderedReport, ReportType, render};
use dealbrief_shared::{CompanyRecord, Result};
use dealbrief_synthesis::{BriefSource, SynthesisConfig, Synthesizer};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the report pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Synthesizer configuration (endpoint, credential, sampling, timeout).
    pub synthesis: SynthesisConfig,
    /// Timeout in seconds for pitch-deck fetches.
    pub fetch_timeout_secs: u64,
    /// Maximum companies processed concurrently in a batch. Also bounds the
    /// number of in-flight synthesis requests, respecting service rate limits.
    pub max_concurrency: u32,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// Everything the pipeline produced for one company.
#[derive(Debug, Clone)]
pub struct CompanyOutcome {
    /// Identifying name from the intake record (may be empty on bad records).
    pub company_name: String,
    /// The rendered one-pager, when formatting it succeeded.
    pub one_pager: Option<RenderedReport>,
    /// The rendered deep-dive, when formatting it succeeded.
    pub deep_dive: Option<RenderedReport>,
    /// Which path produced the underlying brief. `None` when synthesis was
    /// never reached.
    pub brief_source: Option<BriefSource>,
    /// Errors recorded along the way. Non-fatal to the batch.
    pub errors: Vec<String>,
}

impl CompanyOutcome {
    fn failed(company_name: &str, error: impl Into<String>) -> Self {
        Self {
            company_name: company_name.to_string(),
            one_pager: None,
            deep_dive: None,
            brief_source: None,
            errors: vec![error.into()],
        }
    }

    /// Whether at least one report was produced.
    pub fn succeeded(&self) -> bool {
        self.one_pager.is_some() || self.deep_dive.is_some()
    }
}

/// Result of a batch run, one outcome per input record in input order.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Batch run identifier.
    pub run_id: Uuid,
    /// Per-record outcomes, aligned with the input records.
    pub outcomes: Vec<CompanyOutcome>,
    /// Total elapsed time.
    pub elapsed: Duration,
}

impl BatchOutcome {
    /// Number of records that produced at least one report.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.succeeded()).count()
    }

    /// Number of records that produced no report at all.
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }
}

// ---------------------------------------------------------------------------
// Progress reporting
// ---------------------------------------------------------------------------

/// Progress callback for batch runs.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called as each company finishes.
    fn company_finished(&self, outcome: &CompanyOutcome, completed: usize, total: usize);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn company_finished(&self, _outcome: &CompanyOutcome, _completed: usize, _total: usize) {}
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// The report pipeline for one or many companies.
pub struct Pipeline {
    synthesizer: Synthesizer,
    fetch_client: reqwest::Client,
    max_concurrency: usize,
}

impl Pipeline {
    /// Create a pipeline from configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let synthesizer = Synthesizer::new(config.synthesis)?;
        let fetch_client = dealbrief_extract::build_client(config.fetch_timeout_secs)?;

        Ok(Self {
            synthesizer,
            fetch_client,
            max_concurrency: config.max_concurrency.max(1) as usize,
        })
    }

    /// Process a single company record into up to two rendered reports.
    #[instrument(skip_all, fields(company = %record.company_name))]
    pub async fn process(&self, record: &CompanyRecord) -> CompanyOutcome {
        // A record without identity cannot be reported on; abandon every
        // stage rather than synthesizing a brief about nothing.
        if !record.has_identity() {
            warn!("record has no company name, skipping all stages");
            return CompanyOutcome::failed(
                &record.company_name,
                "record has no company name",
            );
        }

        let document_text = match record.pitch_deck_url.as_deref() {
            Some(reference) if !reference.trim().is_empty() => {
                match load_document(&self.fetch_client, reference).await {
                    Some(extracted) => {
                        if extracted.pages_failed > 0 {
                            warn!(
                                pages_failed = extracted.pages_failed,
                                pages_total = extracted.pages_total,
                                "pitch deck extracted partially"
                            );
                        }
                        extracted.text
                    }
                    None => {
                        info!("pitch deck unavailable, continuing without it");
                        String::new()
                    }
                }
            }
            _ => String::new(),
        };

        let context = build_context(record, &document_text, &record.internal_notes);

        let synthesized = self
            .synthesizer
            .synthesize(&record.company_name, &record.website, &context.text)
            .await;

        // Each variant renders independently; both come from the same brief.
        let mut outcome = CompanyOutcome {
            company_name: record.company_name.clone(),
            one_pager: None,
            deep_dive: None,
            brief_source: Some(synthesized.source),
            errors: Vec::new(),
        };

        for report_type in ReportType::ALL {
            let report = render(&synthesized.brief, report_type);
            match report_type {
                ReportType::OnePager => outcome.one_pager = Some(report),
                ReportType::DeepDive => outcome.deep_dive = Some(report),
            }
        }

        info!(
            source = ?synthesized.source,
            reports = outcome.succeeded(),
            "company processed"
        );

        outcome
    }

    /// Process a batch of records with bounded concurrency.
    ///
    /// One record's failure — including a panic inside its task — is
    /// recorded in its outcome and never aborts the rest. Outcomes are
    /// returned in input order regardless of completion order.
    #[instrument(skip_all, fields(records = records.len()))]
    pub async fn process_many(
        self: &Arc<Self>,
        records: Vec<CompanyRecord>,
        progress: &dyn ProgressReporter,
    ) -> BatchOutcome {
        let run_id = Uuid::now_v7();
        let start = Instant::now();
        let total = records.len();

        info!(%run_id, total, max_concurrency = self.max_concurrency, "starting batch run");
        progress.phase("Processing companies");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut handles = Vec::with_capacity(total);

        for (index, record) in records.into_iter().enumerate() {
            let pipeline = Arc::clone(self);
            let permits = Arc::clone(&semaphore);
            let company_name = record.company_name.clone();

            let handle = tokio::spawn(async move {
                let _permit = permits.acquire().await.expect("semaphore closed");
                pipeline.process(&record).await
            });
            handles.push((index, company_name, handle));
        }

        let mut outcomes: Vec<Option<CompanyOutcome>> = (0..total).map(|_| None).collect();
        let mut completed = 0usize;

        for (index, company_name, handle) in handles {
            let outcome = match handle.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(company = %company_name, error = %e, "company task failed");
                    CompanyOutcome::failed(&company_name, format!("processing task failed: {e}"))
                }
            };

            completed += 1;
            progress.company_finished(&outcome, completed, total);
            outcomes[index] = Some(outcome);
        }

        let outcomes: Vec<CompanyOutcome> = outcomes.into_iter().flatten().collect();
        let batch = BatchOutcome {
            run_id,
            outcomes,
            elapsed: start.elapsed(),
        };

        info!(
            %run_id,
            succeeded = batch.succeeded(),
            failed = batch.failed(),
            elapsed_ms = batch.elapsed.as_millis(),
            "batch run complete"
        );

        batch
    }
}
