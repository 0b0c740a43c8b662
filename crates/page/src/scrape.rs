use crate::adapter::{CompiledSelectors, PageAdapter, SelectorAdapter};
use crate::types::{ScrapePayload, Snapshot, MISSING_BOTH, MISSING_CODE, MISSING_PROBLEM};
use tracing::{info, warn};

/// Runs the three extractions and applies the fallback policy. The first
/// matching rule wins:
///
/// 1. neither problem nor code found
/// 2. problem missing
/// 3. code missing
/// 4. full snapshot, error text possibly empty
pub fn scrape(adapter: &dyn PageAdapter) -> ScrapePayload {
    let problem = adapter.extract_problem();
    let code = adapter.extract_code();

    let payload = match (problem, code) {
        (None, None) => ScrapePayload::failed(MISSING_BOTH),
        (None, Some(_)) => ScrapePayload::failed(MISSING_PROBLEM),
        (Some(_), None) => ScrapePayload::failed(MISSING_CODE),
        (Some(problem_text), Some(current_code)) => Snapshot {
            problem_text,
            current_code,
            error_text: adapter.extract_error().unwrap_or_default(),
        }
        .into(),
    };

    match &payload {
        ScrapePayload::Failed { error } => warn!("Scrape fell back to an error: {}", error),
        ScrapePayload::Captured(snapshot) => info!(
            problem_chars = snapshot.problem_text.len(),
            code_chars = snapshot.current_code.len(),
            has_error = snapshot.has_error(),
            "Scraped exercise page"
        ),
    }

    payload
}

/// Parses `html` and scrapes it with the selector adapter. The parsed document
/// never outlives this call, so callers can run it inside async tasks.
pub fn scrape_html(html: &str, selectors: &CompiledSelectors) -> ScrapePayload {
    let adapter = SelectorAdapter::parse(html, selectors);
    scrape(&adapter)
}
