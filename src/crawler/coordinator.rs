//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl state machine:
//! - One fresh frontier per seed, drained in descending novelty order
//! - Gating and scoring every candidate before it is queued
//! - Fetching, storing and profiling popped pages
//! - Per-seed page and time budgets plus a global sample budget
//! - Finalization that runs exactly once on every exit path

use crate::config::Config;
use crate::crawler::fetcher::build_http_client;
use crate::crawler::frontier::Frontier;
use crate::crawler::gate::PolitenessGate;
use crate::crawler::pipeline::FetchPipeline;
use crate::crawler::profile::Profiler;
use crate::crawler::scorer::NoveltyScorer;
use crate::output::{log_summary, section_break, write_markdown_summary, CrawlSummary};
use crate::state::CrawlState;
use crate::storage::{DownloadStore, PageStore, StorageError};
use crate::url::signature;
use crate::KaleidoError;
use std::path::Path;
use std::time::{Duration, Instant};

/// Main crawler coordinator structure
///
/// Owns all mutable crawl state. Dropping the coordinator finalizes the run if
/// that has not happened yet, so the summary is emitted on every exit path.
pub struct Coordinator {
    config: Config,
    seeds: Vec<String>,
    state: CrawlState,
    gate: PolitenessGate,
    scorer: NoveltyScorer,
    pipeline: FetchPipeline,
    profiler: Profiler,
    store: Box<dyn PageStore + Send>,
    delay: Duration,
    finalized: bool,
}

impl Coordinator {
    /// Creates a coordinator saving pages under the configured download root
    pub fn new(config: Config, seeds: Vec<String>) -> Result<Self, KaleidoError> {
        let store = DownloadStore::new(
            &config.output.download_root,
            config.output.max_files_per_folder,
        );
        Self::with_store(config, seeds, Box::new(store))
    }

    /// Creates a coordinator with a custom page store
    pub fn with_store(
        config: Config,
        seeds: Vec<String>,
        store: Box<dyn PageStore + Send>,
    ) -> Result<Self, KaleidoError> {
        let client = build_http_client(&config.user_agent)?;

        let pipeline = FetchPipeline::new(client.clone(), config.crawler.max_children_per_page);
        let profiler = Profiler::new(client.clone(), config.geo.clone());
        let scorer = NoveltyScorer::new(pipeline.clone(), profiler.clone());
        let gate = PolitenessGate::new(&config, client);
        let delay = Duration::try_from_secs_f64(0.5 / config.crawler.max_requests_per_second)
            .unwrap_or(Duration::ZERO);

        Ok(Self {
            config,
            seeds,
            state: CrawlState::new(),
            gate,
            scorer,
            pipeline,
            profiler,
            store,
            delay,
            finalized: false,
        })
    }

    pub fn state(&self) -> &CrawlState {
        &self.state
    }

    /// Runs the crawl over every seed
    ///
    /// Only a fatal storage failure ends the run early with an error.
    pub async fn run(&mut self) -> Result<(), KaleidoError> {
        let seeds: Vec<String> = self
            .seeds
            .iter()
            .take(self.config.crawler.max_seeds)
            .cloned()
            .collect();

        section_break();
        tracing::info!("Starting crawl with {} seeds", seeds.len());

        for (index, seed) in seeds.iter().enumerate() {
            if self.sample_budget_exhausted() {
                tracing::info!(
                    "Sample budget of {} pages reached, stopping",
                    self.config.crawler.max_pages_to_sample
                );
                break;
            }

            section_break();
            tracing::info!("Seed {}/{}: {}", index + 1, seeds.len(), seed);
            self.crawl_seed(seed).await?;
        }

        Ok(())
    }

    /// Drains one seed's frontier
    async fn crawl_seed(&mut self, seed: &str) -> Result<(), KaleidoError> {
        let seed_signature = signature(seed);
        if self.state.tracker.is_visited(seed_signature) {
            tracing::info!("Seed {} already visited, skipping", seed);
            return Ok(());
        }
        self.state.tracker.mark_visited(seed_signature);

        let started = Instant::now();
        let time_budget = Duration::from_secs(self.config.crawler.seed_time_budget_secs);
        let page_budget = self.config.crawler.max_pages_per_seed;

        let mut frontier = Frontier::new();
        if let Some(weight) = self.admit(seed).await {
            frontier.push(seed, weight);
        }

        let mut processed: u64 = 0;

        while !frontier.is_empty()
            && processed <= page_budget
            && started.elapsed() <= time_budget
            && !self.sample_budget_exhausted()
        {
            let Some(entry) = frontier.pop() else {
                break;
            };
            processed += 1;

            if self.state.tracker.is_blacklisted(&entry.url) {
                continue;
            }

            tracing::debug!("Processing {} (weight {:.3})", entry.url, entry.weight);
            let children = self.process(&entry.url).await?;

            for child in children {
                let child_signature = signature(&child);
                if self.state.tracker.is_visited(child_signature) {
                    continue;
                }
                self.state.tracker.mark_visited(child_signature);

                if let Some(weight) = self.admit(&child).await {
                    frontier.push(child, weight);
                }
            }

            if processed % 10 == 0 {
                tracing::info!(
                    "Progress: {} processed for this seed, {} in frontier, {} sampled overall",
                    processed,
                    frontier.len(),
                    self.state.stats.pages_sampled
                );
            }
        }

        tracing::info!(
            "Seed {} done: {} processed in {:.1}s",
            seed,
            processed,
            started.elapsed().as_secs_f64()
        );

        Ok(())
    }

    /// Gates and scores a candidate, returning its weight if it may be queued
    async fn admit(&mut self, url: &str) -> Option<f64> {
        if !self.gate.may_crawl(url, &mut self.state).await {
            return None;
        }

        let weight = self.scorer.score(url, &mut self.state).await;
        self.throttle().await;
        weight
    }

    /// Fetches, stores and profiles a page, returning its sampled children
    async fn process(&mut self, url: &str) -> Result<Vec<String>, StorageError> {
        let Some(page) = self.pipeline.fetch(url, &mut self.state.tracker).await else {
            self.throttle().await;
            return Ok(Vec::new());
        };

        let parsed = match self.pipeline.parse(&page) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Failed to parse {}: {}", url, e);
                self.throttle().await;
                return Ok(Vec::new());
            }
        };

        match self.store.save(url, &page.body, &parsed.title) {
            Ok(_) => self.state.stats.pages_sampled += 1,
            Err(e) if e.is_fatal() => {
                tracing::error!(critical = true, "{}", e);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", url, e);
                self.throttle().await;
                return Ok(Vec::new());
            }
        }

        let profile = self.profiler.profile(url, Some(&parsed.title)).await;
        self.state.rarity.observe(&profile);
        tracing::info!("Country: {}, Language: {}", profile.country, profile.language);

        self.throttle().await;
        Ok(parsed.links)
    }

    fn sample_budget_exhausted(&self) -> bool {
        self.state.stats.pages_sampled >= self.config.crawler.max_pages_to_sample
    }

    async fn throttle(&self) {
        tokio::time::sleep(self.delay).await;
    }

    /// Emits the crawl summary
    ///
    /// Returns None if the run was already finalized.
    pub fn finalize(&mut self) -> Option<CrawlSummary> {
        if self.finalized {
            return None;
        }
        self.finalized = true;

        let summary = CrawlSummary::from_state(&self.state);
        log_summary(&summary);

        if let Some(path) = &self.config.output.summary_path {
            match write_markdown_summary(&summary, Path::new(path)) {
                Ok(()) => tracing::info!("Summary written to {}", path),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        Some(summary)
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.finalize();
    }
}

/// Runs a complete crawl and returns its summary
///
/// # Example
///
/// ```no_run
/// use kaleido_crawl::config::load_config;
/// use kaleido_crawl::crawler::run_crawl;
/// use kaleido_crawl::seeds::load_seeds;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let seeds = load_seeds(&config.seeds)?;
/// let summary = run_crawl(config, seeds).await?;
/// println!("sampled {} pages", summary.pages_sampled);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config, seeds: Vec<String>) -> Result<CrawlSummary, KaleidoError> {
    let mut coordinator = Coordinator::new(config, seeds)?;
    coordinator.run().await?;
    let summary = coordinator
        .finalize()
        .unwrap_or_else(|| CrawlSummary::from_state(coordinator.state()));
    Ok(summary)
}
