//! Aggregation driver
//!
//! One run moves through fixed phases:
//!
//! 1. `Loading`: read the persisted graph (never fails)
//! 2. `Seeding`: fetch each seed id and ingest it at seed priority
//! 3. `LiveIngest`: page through every configured query
//! 4. `PersistDecision`: anything new?
//! 5. `Flushing`: write the graph, then notify
//! 6. `Done`
//!
//! Seeds finish before any live query so a seeded paper wins first-sight
//! dedup. Only a failed flush ends a run with an error; provider, seed and
//! notifier failures are logged and counted.

use crate::config::AggregatorConfig;
use crate::graph::PaperGraph;
use crate::notify::{self, NewItem, NoopNotifier, Notifier};
use crate::source::{
    self, route_seed, IngestOutcome, Priority, Provider, RawRecord, RecordAdapter, RecordPager,
    SourceKind, DEFAULT_PAGE_SIZE,
};
use crate::storage::{load_seeds, GraphStore, StorageError};
use crate::topic::{ExtractorConfig, FrequencyExtractor, KeyphraseExtractor, TopicResolver};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// The one failure that ends a run
#[derive(Debug, Error)]
pub enum AggregateError {
    #[error("failed to flush graph: {0}")]
    Flush(#[source] StorageError),
}

/// Phases of a run, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Loading,
    Seeding,
    LiveIngest,
    PersistDecision,
    Flushing,
    Done,
}

/// Outcome of one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    /// Papers added this run, in ingestion order
    pub new_items: Vec<NewItem>,
    /// Seeds fetched and passed to the adapter
    pub seeds_processed: usize,
    /// Seeds that could not be fetched or had no provider
    pub seeds_skipped: usize,
    /// Records pulled from live queries
    pub records_seen: usize,
    /// Records dropped for lacking an id or title
    pub records_malformed: usize,
    /// Providers abandoned after an error
    pub provider_failures: usize,
    /// Whether the graph was written
    pub flushed: bool,
}

impl RunReport {
    pub fn new_count(&self) -> usize {
        self.new_items.len()
    }
}

/// Mutable state carried through the phases
struct RunState {
    graph: PaperGraph,
    report: RunReport,
}

/// Runs aggregation passes over one graph store.
///
/// Providers are looked up by kind; at most one per kind is used.
pub struct Aggregator {
    config: AggregatorConfig,
    store: Arc<dyn GraphStore>,
    providers: Vec<Box<dyn Provider>>,
    adapter: RecordAdapter,
    notifier: Box<dyn Notifier>,
    dry_run: bool,
}

impl Aggregator {
    /// Aggregator with no providers, the built-in keyphrase extractor and
    /// no notifications
    pub fn new(config: AggregatorConfig, store: Arc<dyn GraphStore>) -> Self {
        let extractor = FrequencyExtractor::new(
            ExtractorConfig::english().with_ngram_range(1, config.topics.ngram_max),
        );
        let adapter = RecordAdapter::new(TopicResolver::new(config.topics.policy(), Arc::new(extractor)));
        Self {
            config,
            store,
            providers: Vec::new(),
            adapter,
            notifier: Box::new(NoopNotifier),
            dry_run: false,
        }
    }

    /// Build providers and notifier from the configuration.
    ///
    /// A notifier that cannot be built (missing secret) is logged and
    /// replaced by a no-op; notification never blocks a run.
    pub fn from_config(
        config: AggregatorConfig,
        store: Arc<dyn GraphStore>,
    ) -> Result<Self, source::ProviderError> {
        let timeout = config.request_timeout();
        let providers = config
            .sources
            .iter()
            .map(|s| source::from_config(s, timeout))
            .collect::<Result<Vec<_>, _>>()?;

        let notifier: Box<dyn Notifier> = match config.notifier {
            Some(ref notifier_config) => match notify::from_config(notifier_config, timeout) {
                Ok(notifier) => notifier,
                Err(e) => {
                    tracing::warn!(error = %e, "notifier unavailable, continuing without notifications");
                    Box::new(NoopNotifier)
                }
            },
            None => Box::new(NoopNotifier),
        };

        let mut aggregator = Self::new(config, store).with_notifier(notifier);
        for provider in providers {
            aggregator = aggregator.with_provider(provider);
        }
        Ok(aggregator)
    }

    /// Register a provider, replacing any earlier one of the same kind
    pub fn with_provider(mut self, provider: Box<dyn Provider>) -> Self {
        self.providers.retain(|p| p.kind() != provider.kind());
        self.providers.push(provider);
        self
    }

    pub fn with_notifier(mut self, notifier: Box<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_extractor(mut self, extractor: Arc<dyn KeyphraseExtractor>) -> Self {
        self.adapter = RecordAdapter::new(TopicResolver::new(self.config.topics.policy(), extractor));
        self
    }

    /// Ingest without writing the graph or notifying
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    fn provider(&self, kind: SourceKind) -> Option<&dyn Provider> {
        self.providers.iter().find(|p| p.kind() == kind).map(|p| p.as_ref())
    }

    /// Run one aggregation pass
    pub async fn run(&self) -> Result<RunReport, AggregateError> {
        let mut state = RunState {
            graph: PaperGraph::new(),
            report: RunReport::default(),
        };
        let mut phase = RunPhase::Loading;

        loop {
            tracing::debug!(?phase, "entering phase");
            phase = match phase {
                RunPhase::Loading => {
                    state.graph = self.store.load();
                    tracing::info!(
                        nodes = state.graph.node_count(),
                        links = state.graph.link_count(),
                        "graph loaded"
                    );
                    RunPhase::Seeding
                }
                RunPhase::Seeding => {
                    self.seed(&mut state).await;
                    RunPhase::LiveIngest
                }
                RunPhase::LiveIngest => {
                    self.live_ingest(&mut state).await;
                    RunPhase::PersistDecision
                }
                RunPhase::PersistDecision => {
                    if state.report.new_items.is_empty() {
                        tracing::info!("no new papers");
                        RunPhase::Done
                    } else {
                        RunPhase::Flushing
                    }
                }
                RunPhase::Flushing => {
                    self.flush(&mut state).await?;
                    RunPhase::Done
                }
                RunPhase::Done => break,
            };
        }

        tracing::info!(
            new = state.report.new_count(),
            seeds = state.report.seeds_processed,
            seeds_skipped = state.report.seeds_skipped,
            records = state.report.records_seen,
            malformed = state.report.records_malformed,
            provider_failures = state.report.provider_failures,
            flushed = state.report.flushed,
            "run complete"
        );
        Ok(state.report)
    }

    async fn seed(&self, state: &mut RunState) {
        let seeds = match self.config.seed_path {
            Some(ref path) => load_seeds(path),
            None => Vec::new(),
        };
        if seeds.is_empty() {
            return;
        }
        tracing::info!(count = seeds.len(), "processing seeds");

        let delay = self.config.seed_delay();
        let mut fetched_any = false;
        for seed in &seeds {
            let target = route_seed(seed, self.config.seed_source);
            let Some(provider) = self.provider(target.kind) else {
                tracing::warn!(seed = %seed, provider = %target.kind, "no provider configured for seed, skipping");
                state.report.seeds_skipped += 1;
                continue;
            };

            if fetched_any && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            fetched_any = true;

            match provider.fetch(&target.id).await {
                Ok(record) => {
                    state.report.seeds_processed += 1;
                    self.ingest(state, record, Priority::Seed);
                }
                Err(e) => {
                    tracing::warn!(seed = %seed, provider = %target.kind, error = %e, "seed fetch failed, skipping");
                    state.report.seeds_skipped += 1;
                }
            }
        }
    }

    async fn live_ingest(&self, state: &mut RunState) {
        let mut failed: HashSet<SourceKind> = HashSet::new();

        for query in &self.config.queries {
            if failed.contains(&query.source) {
                continue;
            }
            let Some(provider) = self.provider(query.source) else {
                tracing::warn!(provider = %query.source, query = %query.query, "no provider for query, skipping");
                continue;
            };

            let mut pager = RecordPager::new(provider, query.query.as_str(), query.max_results)
                .with_page_size(query.page_size.unwrap_or(DEFAULT_PAGE_SIZE));
            loop {
                match pager.next().await {
                    Ok(Some(record)) => {
                        state.report.records_seen += 1;
                        self.ingest(state, record, Priority::Live);
                    }
                    Ok(None) => break,
                    Err(e) => {
                        tracing::warn!(
                            provider = %query.source,
                            query = %query.query,
                            error = %e,
                            "provider failed, abandoning it for this run"
                        );
                        state.report.provider_failures += 1;
                        failed.insert(query.source);
                        break;
                    }
                }
            }
            tracing::debug!(provider = %query.source, query = %query.query, records = pager.yielded(), "query done");
        }
    }

    fn ingest(&self, state: &mut RunState, record: RawRecord, priority: Priority) {
        match self.adapter.ingest(&mut state.graph, record, priority) {
            IngestOutcome::Added(item) => state.report.new_items.push(item),
            IngestOutcome::Known => {}
            IngestOutcome::Malformed => state.report.records_malformed += 1,
        }
    }

    async fn flush(&self, state: &mut RunState) -> Result<(), AggregateError> {
        if self.dry_run {
            tracing::info!(new = state.report.new_count(), "dry run, not writing graph");
            return Ok(());
        }
        self.store
            .flush(state.graph.snapshot())
            .map_err(AggregateError::Flush)?;
        state.report.flushed = true;
        tracing::info!(
            new = state.report.new_count(),
            nodes = state.graph.node_count(),
            links = state.graph.link_count(),
            "graph flushed"
        );
        self.notifier.notify(&state.report.new_items).await;
        Ok(())
    }
}
