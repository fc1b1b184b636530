//! One polling run: collect candidates, reconcile, detect novelty, persist, notify.
//!
//! Sources are fetched one after another and their candidates are kept in
//! configuration order: every web source first, then every catalog source.
//! A failing source contributes nothing and never stops the run. Saving state
//! is the only step whose failure aborts the run, and it happens before any
//! notification is attempted.

use crate::cli::{RootArgs, DEFAULT_CATALOG_TIMEOUT_SECS};
use crate::fetch::{
    CandidateSource, FeedSource, HttpClient, MacCatalogSource, ReleasePageSource,
};
use crate::merge;
use crate::novelty::{self, Novelty};
use crate::notify::{Notifier, WebhookNotifier};
use crate::schema::{ReleaseItem, StateFile};
use crate::sources::{self, SourceFormat, SourcesConfig};
use crate::state;
use anyhow::Result;
use std::path::Path;
use std::time::{Duration, Instant};

/// Adapters and delivery target for a run, in fold order.
pub struct Pipeline<'a> {
    pub web: Vec<Box<dyn CandidateSource + 'a>>,
    pub catalog: Vec<Box<dyn CandidateSource + 'a>>,
    pub notifier: Option<Box<dyn Notifier + 'a>>,
}

impl Pipeline<'static> {
    pub fn from_config(config: &SourcesConfig, args: &RootArgs) -> Self {
        let web_client = HttpClient::new(Duration::from_secs(args.timeout_secs));
        let catalog_client = HttpClient::new(Duration::from_secs(DEFAULT_CATALOG_TIMEOUT_SECS));

        let web = config
            .www
            .iter()
            .map(|url| -> Box<dyn CandidateSource> {
                match sources::web_format(url) {
                    SourceFormat::Feed => Box::new(FeedSource::new(url, web_client.clone())),
                    _ => Box::new(ReleasePageSource::new(url, web_client.clone())),
                }
            })
            .collect();

        let mut catalog: Vec<Box<dyn CandidateSource>> = Vec::new();
        for url in &config.ota {
            match sources::catalog_format(url) {
                Some(SourceFormat::MacCatalog) => {
                    catalog.push(Box::new(MacCatalogSource::new(url, catalog_client.clone())));
                }
                _ => tracing::warn!(url = %url, "no adapter for catalog source, skipping"),
            }
        }

        let notifier = args.webhook_url.as_ref().map(|url| -> Box<dyn Notifier> {
            Box::new(WebhookNotifier::new(
                url,
                args.webhook_token.clone(),
                web_client.clone(),
            ))
        });

        Self {
            web,
            catalog,
            notifier,
        }
    }
}

/// Candidates gathered from a group of sources.
#[derive(Debug, Default)]
pub struct Collected {
    pub items: Vec<ReleaseItem>,
    pub failed: usize,
}

/// Fetches each source in order; a failed source yields zero candidates.
pub fn collect(sources: &[Box<dyn CandidateSource + '_>]) -> Collected {
    let mut collected = Collected::default();
    for source in sources {
        match source.fetch() {
            Ok(items) => {
                tracing::info!(source = source.label(), candidates = items.len(), "source read");
                collected.items.extend(items);
            }
            Err(err) => {
                tracing::warn!(
                    source = source.label(),
                    error = %format!("{err:#}"),
                    "source failed, continuing without it"
                );
                collected.failed += 1;
            }
        }
    }
    collected
}

/// Reconciles one run's candidates against the previous snapshot.
pub fn reconcile(
    web_items: Vec<ReleaseItem>,
    catalog_items: Vec<ReleaseItem>,
    previous: &StateFile,
) -> Novelty {
    let canonical = merge::merge(web_items, catalog_items);
    let seen = novelty::seen_fingerprints(previous);
    novelty::detect(canonical, &seen)
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub new_releases: Vec<ReleaseItem>,
    pub tracked: usize,
    pub failed_sources: usize,
    pub persisted: bool,
}

pub fn execute(pipeline: &Pipeline<'_>, state_path: &Path, dry_run: bool) -> Result<RunReport> {
    let start = Instant::now();
    let previous = state::load_state(state_path)?;

    let web = collect(&pipeline.web);
    let catalog = collect(&pipeline.catalog);
    let failed_sources = web.failed + catalog.failed;

    let Novelty { records, fresh } = reconcile(web.items, catalog.items, &previous);
    let tracked = records.len();
    tracing::info!(
        tracked,
        new_releases = fresh.len(),
        failed_sources,
        elapsed_ms = start.elapsed().as_millis(),
        "run reconciled"
    );

    if dry_run {
        tracing::info!("dry run, leaving state and webhook untouched");
        return Ok(RunReport {
            new_releases: fresh,
            tracked,
            failed_sources,
            persisted: false,
        });
    }

    state::save_state(state_path, previous, records)?;

    if fresh.is_empty() {
        tracing::info!("no new releases");
    } else {
        for item in &fresh {
            tracing::info!(title = %item.display_title(), build = %item.build, "new release");
        }
        deliver(pipeline.notifier.as_deref(), &fresh);
    }

    Ok(RunReport {
        new_releases: fresh,
        tracked,
        failed_sources,
        persisted: true,
    })
}

/// Delivery problems are logged; state is already saved by now.
fn deliver(notifier: Option<&(dyn Notifier + '_)>, fresh: &[ReleaseItem]) {
    let Some(notifier) = notifier else {
        tracing::info!("no webhook configured, skipping delivery");
        return;
    };
    if let Err(err) = notifier.deliver(fresh) {
        tracing::error!(error = %format!("{err:#}"), "webhook delivery failed");
    }
}

pub fn run(args: &RootArgs) -> Result<RunReport> {
    let config = sources::load_sources(&args.sources)?;
    let pipeline = Pipeline::from_config(&config, args);
    execute(&pipeline, &args.state, args.dry_run)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
