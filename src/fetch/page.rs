//! HTML release listings: each linked card with an `<h3>` inside an `<article>`.

use crate::classify::classify_title;
use crate::schema::{ReleaseItem, SourceStatus};
use anyhow::{anyhow, Result};
use scraper::{Html, Selector};

pub fn parse_release_page(html: &str) -> Result<Vec<ReleaseItem>> {
    let document = Html::parse_document(html);
    let links =
        Selector::parse("article a").map_err(|err| anyhow!("invalid card selector: {err:?}"))?;
    let heading = Selector::parse("h3").map_err(|err| anyhow!("invalid heading selector: {err:?}"))?;

    let mut items = Vec::new();
    for card in document.select(&links) {
        if card.select(&heading).next().is_none() {
            continue;
        }
        let title = card
            .text()
            .map(str::trim)
            .filter(|piece| !piece.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let Some(facts) = classify_title(&title) else {
            tracing::trace!(title = %title, "skipping unclassifiable release card");
            continue;
        };
        // Listings carry no usable date.
        items.push(facts.into_item(SourceStatus::AnnounceFirst, None));
    }
    Ok(items)
}
