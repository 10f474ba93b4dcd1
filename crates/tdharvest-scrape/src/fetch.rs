//! Single-page fetcher with bounded retry.

use chrono::NaiveDate;
use tdharvest_core::{backoff_duration, http_get, is_shutdown_requested};

use crate::config::ScrapeConfig;
use crate::parse::LISTING_MARKER;

/// Outcome of fetching one (date, page) listing page.
///
/// The three cases are deliberately distinct: `NotFound` is the normal
/// end of pagination (the site 404s past the last page), while
/// `Exhausted` means the retry budget was spent on transient failures —
/// the page may well exist and the source is just unwell. Both end a day
/// scan, but callers report them differently.
#[derive(Debug)]
pub enum PageFetch {
    /// Page retrieved and the listing marker is present
    Found(String),
    /// Definitive 404 — pagination is over for this date
    NotFound,
    /// All attempts failed on transient errors or unusable responses
    Exhausted,
}

/// Page resource name for a (page, date) pair, e.g. `I_list_003_20250610.html`.
pub fn page_resource(date: NaiveDate, page: u32) -> String {
    format!("I_list_{page:03}_{}.html", date.format("%Y%m%d"))
}

/// Fetch one listing page.
///
/// Up to `max_attempts` tries with linear backoff. A non-200 response or
/// a body without the listing marker counts as a failed attempt; only a
/// 404 short-circuits, since it is the source's explicit "no such page".
pub fn fetch_page(config: &ScrapeConfig, date: NaiveDate, page: u32) -> PageFetch {
    let url = format!("{}{}", config.base_url, page_resource(date, page));

    for attempt in 1..=config.max_attempts {
        match http_get(&url, &config.user_agent, config.timeout) {
            Ok(resp) if resp.status == 404 => return PageFetch::NotFound,
            Ok(resp) if resp.status == 200 && resp.body.contains(LISTING_MARKER) => {
                return PageFetch::Found(resp.body);
            }
            Ok(resp) => {
                log::debug!(
                    "{url}: attempt {attempt}/{} unusable (status {}, marker {})",
                    config.max_attempts,
                    resp.status,
                    resp.body.contains(LISTING_MARKER),
                );
            }
            Err(e) => {
                log::debug!("{url}: attempt {attempt}/{} failed: {e}", config.max_attempts);
            }
        }

        if is_shutdown_requested() {
            break;
        }
        if attempt < config.max_attempts {
            std::thread::sleep(backoff_duration(attempt));
        }
    }

    PageFetch::Exhausted
}
