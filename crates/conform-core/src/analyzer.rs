//! The concurrent read → normalize → evaluate pipeline.

use crate::aggregate::Aggregator;
use crate::catalog::Catalog;
use crate::discovery::{DiscoveredFile, RootUnreadable, SourceLoader};
use crate::engine::RuleEngine;
use crate::ir::Normalizer;
use crate::pattern::PatternError;
use crate::source::{RoleResolver, SourceFile};
use crate::types::{Location, Report, Violation};

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Delay before the single retry of a failed read.
pub const READ_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The project root is missing or unreadable.
    #[error(transparent)]
    RootUnreadable(#[from] RootUnreadable),

    /// An exclude glob is invalid.
    #[error("Invalid exclude pattern: {0}")]
    Pattern(#[from] PatternError),

    /// The run was cancelled before completion; nothing was reported.
    #[error("analysis cancelled")]
    Cancelled,

    /// The async runtime could not be started.
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// A pipeline task failed outside any single file's isolation.
    #[error("pipeline task failed: {0}")]
    Task(String),
}

/// Builder for configuring an [`Analyzer`].
pub struct AnalyzerBuilder {
    root: PathBuf,
    normalizer: Arc<dyn Normalizer>,
    catalog: Arc<Catalog>,
    exclude_patterns: Vec<String>,
    respect_gitignore: bool,
    concurrency: Option<usize>,
    roles: RoleResolver,
}

impl AnalyzerBuilder {
    /// Sets the root directory to analyze (default: current directory).
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = path.into();
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets whether `.gitignore` files are honored (default: true).
    #[must_use]
    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.respect_gitignore = yes;
        self
    }

    /// Sets the maximum number of files in flight (default: available
    /// parallelism). Values below 1 are raised to 1.
    #[must_use]
    pub fn concurrency(mut self, n: usize) -> Self {
        self.concurrency = Some(n);
        self
    }

    /// Sets the role resolver.
    #[must_use]
    pub fn roles(mut self, roles: RoleResolver) -> Self {
        self.roles = roles;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if an exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let mut loader = SourceLoader::new(self.root)?
            .extensions(self.normalizer.extensions().iter().copied())
            .respect_gitignore(self.respect_gitignore)
            .roles(self.roles);
        for pattern in &self.exclude_patterns {
            loader = loader.exclude(pattern)?;
        }
        let concurrency = self
            .concurrency
            .unwrap_or_else(|| std::thread::available_parallelism().map_or(1, usize::from))
            .max(1);

        Ok(Analyzer {
            loader,
            normalizer: self.normalizer,
            engine: RuleEngine::new(self.catalog),
            concurrency,
        })
    }
}

/// Orchestrates a conformance run over a project tree.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    loader: SourceLoader,
    normalizer: Arc<dyn Normalizer>,
    engine: RuleEngine,
    concurrency: usize,
}

impl Analyzer {
    /// Creates a builder for a normalizer and catalog.
    #[must_use]
    pub fn builder(normalizer: Arc<dyn Normalizer>, catalog: Arc<Catalog>) -> AnalyzerBuilder {
        AnalyzerBuilder {
            root: PathBuf::from("."),
            normalizer,
            catalog,
            exclude_patterns: Vec::new(),
            respect_gitignore: true,
            concurrency: None,
            roles: RoleResolver::default(),
        }
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        self.loader.root()
    }

    /// Returns the number of catalog rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.engine.catalog().len()
    }

    /// Returns the configured concurrency.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Runs to completion.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is unreadable.
    pub async fn run(&self) -> Result<Report, AnalyzerError> {
        self.run_until(std::future::pending::<()>()).await
    }

    /// Runs until finished or until `shutdown` resolves.
    ///
    /// On shutdown, in-flight tasks are aborted, partial results are
    /// discarded, and [`AnalyzerError::Cancelled`] is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the root is unreadable or the run is cancelled.
    pub async fn run_until<F>(&self, shutdown: F) -> Result<Report, AnalyzerError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            biased;
            () = shutdown => {
                warn!("Analysis cancelled");
                Err(AnalyzerError::Cancelled)
            }
            report = self.pipeline() => report,
        }
    }

    /// Blocking convenience: runs on a fresh multi-thread runtime.
    ///
    /// Must not be called from inside an async context.
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot start or the root is
    /// unreadable.
    pub fn analyze(&self) -> Result<Report, AnalyzerError> {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.concurrency)
            .enable_all()
            .build()
            .map_err(AnalyzerError::Runtime)?
            .block_on(self.run())
    }

    /// Normalizes and evaluates one in-memory file, without touching disk.
    #[must_use]
    pub fn check_source(&self, file: &SourceFile) -> Vec<Violation> {
        evaluate_file(self.normalizer.as_ref(), &self.engine, file)
    }

    async fn pipeline(&self) -> Result<Report, AnalyzerError> {
        info!("Starting analysis at {:?}", self.loader.root());
        let loader = self.loader.clone();
        let discovery = tokio::task::spawn_blocking(move || loader.discover())
            .await
            .map_err(|e| AnalyzerError::Task(e.to_string()))??;
        let total = discovery.files.len();
        info!(
            files = total,
            concurrency = self.concurrency,
            rules = self.rule_count(),
            "Found files to analyze"
        );

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut set = JoinSet::new();
        let mut results: Vec<Option<Vec<Violation>>> = vec![None; total];

        for (index, file) in discovery.files.into_iter().enumerate() {
            // Admit work only as permits free up.
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| AnalyzerError::Task(e.to_string()))?;
            let normalizer = Arc::clone(&self.normalizer);
            let engine = self.engine.clone();
            set.spawn(async move {
                let _permit = permit;
                (index, process_file(file, normalizer, engine).await)
            });
            while let Some(joined) = set.try_join_next() {
                store(&mut results, joined)?;
            }
        }
        while let Some(joined) = set.join_next().await {
            store(&mut results, joined)?;
        }

        let mut aggregator = Aggregator::new();
        for violations in results.into_iter().flatten() {
            aggregator.add_file(violations);
        }
        aggregator.add_unattributed(discovery.skipped);
        let report = aggregator.finish();

        let (errors, warnings) = report.count_by_severity();
        info!(
            errors,
            warnings,
            diagnostics = report.diagnostic_count(),
            files = report.files_checked,
            "Analysis complete"
        );
        Ok(report)
    }
}

type Joined = Result<(usize, Vec<Violation>), tokio::task::JoinError>;

fn store(results: &mut [Option<Vec<Violation>>], joined: Joined) -> Result<(), AnalyzerError> {
    let (index, violations) = joined.map_err(|e| AnalyzerError::Task(e.to_string()))?;
    results[index] = Some(violations);
    Ok(())
}

async fn process_file(
    file: DiscoveredFile,
    normalizer: Arc<dyn Normalizer>,
    engine: RuleEngine,
) -> Vec<Violation> {
    let text = match read_with_retry(&file.path).await {
        Ok(text) => text,
        Err(e) => {
            warn!(file = %file.relative_path.display(), "Skipping unreadable file: {e}");
            return vec![Violation::io_error(&file.relative_path, e.to_string())];
        }
    };

    let relative = file.relative_path.clone();
    let source = SourceFile::new(file.path, file.relative_path, text, file.role);
    match tokio::task::spawn_blocking(move || evaluate_file(normalizer.as_ref(), &engine, &source))
        .await
    {
        Ok(violations) => violations,
        Err(e) => {
            warn!(file = %relative.display(), "Normalizer failed: {e}");
            vec![Violation::parse_error(
                Location::file_start(relative),
                format!("normalizer failed: {e}"),
            )]
        }
    }
}

async fn read_with_retry(path: &Path) -> std::io::Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(first) => {
            debug!("Read of {} failed ({first}), retrying", path.display());
            tokio::time::sleep(READ_RETRY_BACKOFF).await;
            tokio::fs::read_to_string(path).await
        }
    }
}

/// Normalizes one file and evaluates the catalog against it.
///
/// A file that fails to parse yields a single `parse-error` entry and no
/// rule findings.
#[must_use]
pub fn evaluate_file(
    normalizer: &dyn Normalizer,
    engine: &RuleEngine,
    file: &SourceFile,
) -> Vec<Violation> {
    debug!("Analyzing: {}", file.relative_path().display());
    match normalizer.normalize(file) {
        Ok(ir) => engine.evaluate(file, &ir),
        Err(e) => {
            debug!(file = %file.relative_path().display(), "Parse error: {e}");
            vec![Violation::parse_error(
                Location::new(file.relative_path(), e.line.max(1), e.column.max(1)),
                e.message,
            )]
        }
    }
}
