//! Paged message search and full-payload fetch over the mailbox contract.

use crate::batch::DateRange;
use crate::error::{ApiError, SkipReason};
use crate::gmail::RawMessage;
use crate::utils;
use tracing::warn;

/// Subject/body term every replacement notification carries.
const SEARCH_TERM: &str = "Remplazo por obsolescencia";

/// Page size used when the caller does not cap the result count.
const DEFAULT_PAGE_SIZE: usize = 500;

/// One page of search results.
pub struct SearchPage {
    pub ids: Vec<String>,
    pub next_page_token: Option<String>,
}

/// The mailbox service contract the pipeline depends on.
pub trait Mailbox {
    fn search(
        &self,
        query: &str,
        page_size: usize,
        page_token: Option<&str>,
    ) -> Result<SearchPage, ApiError>;

    fn fetch(&self, message_id: &str) -> Result<RawMessage, ApiError>;
}

/// Search query for one batch window: the fixed term plus day-granular
/// date bounds (`after:` inclusive, `before:` exclusive of that day).
fn build_query(range: &DateRange) -> String {
    format!(
        "\"{}\" after:{} before:{}",
        SEARCH_TERM,
        range.start.format("%Y/%m/%d"),
        range.end.format("%Y/%m/%d"),
    )
}

/// Collects the full payload of every message matching `range`.
///
/// Follows pagination until the service runs out of pages or `cap`
/// identifiers have accumulated (the list is then truncated to exactly
/// `cap`). A message whose fetch fails is logged and skipped; a failing
/// search page aborts the run.
pub fn search_messages(
    mailbox: &dyn Mailbox,
    range: &DateRange,
    cap: Option<usize>,
    quiet: bool,
) -> Result<Vec<RawMessage>, ApiError> {
    println!(
        "Searching messages between {} and {}...",
        range.start.format("%Y/%m/%d"),
        range.end.format("%Y/%m/%d"),
    );
    let query = build_query(range);
    let page_size = match cap {
        Some(cap) if cap <= DEFAULT_PAGE_SIZE => cap,
        _ => DEFAULT_PAGE_SIZE,
    };

    let mut ids: Vec<String> = Vec::new();
    let mut page_token: Option<String> = None;
    loop {
        let page = mailbox.search(&query, page_size, page_token.as_deref())?;
        ids.extend(page.ids);
        if let Some(cap) = cap {
            if ids.len() >= cap {
                ids.truncate(cap);
                break;
            }
        }
        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    let progress = utils::create_progress_bar(quiet, ids.len());
    let mut messages = Vec::with_capacity(ids.len());
    for id in &ids {
        match mailbox.fetch(id) {
            Ok(message) => messages.push(message),
            Err(err) => {
                let reason = SkipReason::Fetch(err);
                warn!("skipping message {}: {}", id, reason);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    Ok(messages)
}
