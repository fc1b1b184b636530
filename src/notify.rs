//! Outbound delivery of newly observed releases.

use crate::fetch::HttpClient;
use crate::schema::ReleaseItem;
use crate::util::truncate_string;
use anyhow::Result;
use serde::Serialize;

const LOGGED_RESPONSE_BYTES: usize = 200;

/// Receives the list of new releases after state has been saved.
pub trait Notifier {
    fn deliver(&self, releases: &[ReleaseItem]) -> Result<()>;
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn deliver(&self, releases: &[ReleaseItem]) -> Result<()> {
        (**self).deliver(releases)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookPayload<'a> {
    new_releases: &'a [ReleaseItem],
}

/// JSON webhook with an optional bearer token.
pub struct WebhookNotifier {
    url: String,
    token: Option<String>,
    client: HttpClient,
}

impl WebhookNotifier {
    pub fn new(url: impl Into<String>, token: Option<String>, client: HttpClient) -> Self {
        Self {
            url: url.into(),
            token,
            client,
        }
    }
}

impl Notifier for WebhookNotifier {
    fn deliver(&self, releases: &[ReleaseItem]) -> Result<()> {
        let payload = WebhookPayload {
            new_releases: releases,
        };
        let (status, body) = self
            .client
            .post_json(&self.url, self.token.as_deref(), &payload)?;
        tracing::info!(
            status,
            releases = releases.len(),
            response = %truncate_string(body.trim(), LOGGED_RESPONSE_BYTES),
            "webhook delivered"
        );
        Ok(())
    }
}
