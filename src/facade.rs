//! The `Patcher` façade: composes the Planner's output with the diff engine and aggregator,
//! owning the result cache for its lifetime.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::aggregator::{aggregate, ExplainerKind, FormattedOperation};
use crate::equality::fast_hash;
use crate::parser::{self, ParseError};
use crate::path::Spath;
use crate::schema::Plan;

/// Extension point for performance telemetry around a `verbose` diff call. Sketched only:
/// no built-in sink ships, and the core never depends on one being attached.
pub trait PerformanceSink {
    fn record(&self, doc1_len: usize, doc2_len: usize, elapsed: Duration);
}

/// Configuration recognized by the façade. Built via [`PatcherConfig::builder`], preferring
/// explicit, `clap`-parsed arguments over a config-file/env layering system.
pub struct PatcherConfig {
    pub explainer: ExplainerKind,
    pub verbose: bool,
    pub partial_diff_keys: Vec<Spath>,
    pub performance_sink: Option<Arc<dyn PerformanceSink>>,
}

impl std::fmt::Debug for PatcherConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatcherConfig")
            .field("explainer", &self.explainer)
            .field("verbose", &self.verbose)
            .field("partial_diff_keys", &self.partial_diff_keys)
            .field("performance_sink", &self.performance_sink.is_some())
            .finish()
    }
}

impl Default for PatcherConfig {
    fn default() -> Self {
        PatcherConfig {
            explainer: ExplainerKind::default(),
            verbose: false,
            partial_diff_keys: Vec::new(),
            performance_sink: None,
        }
    }
}

impl PatcherConfig {
    pub fn builder() -> PatcherConfigBuilder {
        PatcherConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct PatcherConfigBuilder {
    explainer: Option<ExplainerKind>,
    verbose: bool,
    partial_diff_keys: Vec<Spath>,
    performance_sink: Option<Arc<dyn PerformanceSink>>,
}

impl std::fmt::Debug for PatcherConfigBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatcherConfigBuilder")
            .field("explainer", &self.explainer)
            .field("verbose", &self.verbose)
            .field("partial_diff_keys", &self.partial_diff_keys)
            .field("performance_sink", &self.performance_sink.is_some())
            .finish()
    }
}

impl PatcherConfigBuilder {
    pub fn explainer(mut self, explainer: ExplainerKind) -> Self {
        self.explainer = Some(explainer);
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn partial_diff_keys(mut self, keys: Vec<Spath>) -> Self {
        self.partial_diff_keys = keys;
        self
    }

    pub fn performance_sink(mut self, sink: Arc<dyn PerformanceSink>) -> Self {
        self.performance_sink = Some(sink);
        self
    }

    pub fn build(self) -> PatcherConfig {
        PatcherConfig {
            explainer: self.explainer.unwrap_or_default(),
            verbose: self.verbose,
            partial_diff_keys: self.partial_diff_keys,
            performance_sink: self.performance_sink,
        }
    }
}

/// Composes a compiled schema [`Plan`] with the diff engine and aggregator, and owns the
/// result cache keyed on the two input documents' hashes. Not `Sync` in spirit — callers
/// needing concurrency construct one façade per thread, since each CLI invocation is
/// single-shot per process. Still `Send`, so a whole `Patcher` can be moved to a worker.
pub struct Patcher {
    plan: Arc<Plan>,
    config: PatcherConfig,
    result_cache: RefCell<HashMap<String, Vec<FormattedOperation>>>,
}

impl Patcher {
    pub fn new(plan: Arc<Plan>, config: PatcherConfig) -> Self {
        Patcher {
            plan,
            config,
            result_cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn plan(&self) -> &Arc<Plan> {
        &self.plan
    }

    /// Parses both documents, diffs them under the façade's plan, and aggregates the
    /// result. A cache hit (same document texts, byte-for-byte) replays the previously
    /// computed `Vec<FormattedOperation>` without re-parsing or re-diffing.
    pub fn diff(
        &self,
        doc1_text: &str,
        doc2_text: &str,
    ) -> Result<Vec<FormattedOperation>, ParseError> {
        let cache_key = format!("{}:{}", fast_hash(doc1_text), fast_hash(doc2_text));

        if let Some(cached) = self.result_cache.borrow().get(&cache_key) {
            return Ok(cached.clone());
        }

        let _span = self
            .config
            .verbose
            .then(|| tracing::debug_span!("diff").entered());
        let start = self.config.verbose.then(Instant::now);

        let doc1 = parser::parse(doc1_text)?;
        let doc2 = parser::parse(doc2_text)?;

        let deltas = crate::diff::diff(
            &doc1.data,
            &doc2.data,
            &self.plan,
            &self.config.partial_diff_keys,
        );
        let formatted = aggregate(
            deltas,
            &self.plan,
            &doc1,
            &doc2,
            &self.config.partial_diff_keys,
            &self.config.explainer,
        );

        if let Some(start) = start {
            if let Some(sink) = &self.config.performance_sink {
                sink.record(doc1_text.len(), doc2_text.len(), start.elapsed());
            }
        }

        self.result_cache
            .borrow_mut()
            .insert(cache_key, formatted.clone());

        Ok(formatted)
    }

    /// Drops the result cache. The equality memo cache already lives only as long as a
    /// single `diff` call, so there is nothing else to clear.
    pub fn clear_caches(&self) {
        self.result_cache.borrow_mut().clear();
    }
}
