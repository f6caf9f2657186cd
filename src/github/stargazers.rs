// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Drive paginated stargazer collection until exhaustion or a user-supplied limit
// role: github/pagination
// inputs: ApiExecutor + Clock, ClientConfig, optional record limit
// outputs: Ordered StargazerRecord accumulator plus the terminal FetchOutcome
// side_effects: Network via the executor; 1s pacing sleep between pages; stderr progress notices
// invariants:
// - accumulator preserves API page order (ascending star-time as GitHub returns it)
// - logins are unique; a login seen again on a later page is dropped (pages shift while stars arrive mid-fetch)
// - an empty page is the only success-side termination without a limit
// - limit hits truncate to exactly `limit` unique records
// - any propagated error aborts the fetch; no partial result is returned
// errors: rethrows executor/rate-limit errors; malformed pages are Parse errors
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::HashSet;
use std::time::Duration;

use crate::error::FetchError;
use crate::github::client::{ApiExecutor, ClientConfig};
use crate::github::rate_limit::fetch_with_retry;
use crate::model::{StargazerRecord, flatten_stargazer};
use crate::util::Clock;

pub const PAGE_SIZE: usize = 100;
pub const PAGE_PACING: Duration = Duration::from_secs(1);

/// How a successful fetch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
  /// The API returned an empty page: the collection is complete.
  Exhausted,
  /// The accumulator met the caller's limit and was truncated to it.
  LimitReached,
}

pub fn fetch_all_stargazers(
  exec: &dyn ApiExecutor,
  clock: &dyn Clock,
  cfg: &ClientConfig,
  limit: Option<usize>,
) -> Result<(Vec<StargazerRecord>, FetchOutcome), FetchError> {
  let mut records: Vec<StargazerRecord> = Vec::new();
  let mut seen: HashSet<String> = HashSet::new();
  let mut page = 1usize;

  loop {
    let url = cfg.stargazers_page_url(PAGE_SIZE, page);
    let outcome = fetch_with_retry(exec, clock, &url)?;

    let items = outcome
      .data
      .as_array()
      .ok_or_else(|| FetchError::parse(format!("stargazers page {page} is not a JSON array")))?;

    if items.is_empty() {
      return Ok((records, FetchOutcome::Exhausted));
    }

    for item in items {
      let record = flatten_stargazer(item)?;
      // Pages can shift under us while stars arrive; keep the first
      // occurrence of each login so the list stays deduplicated.
      if seen.insert(record.login.clone()) {
        records.push(record);
      }
    }

    eprintln!("page {page}: {} stargazers collected", records.len());

    if let Some(lim) = limit {
      if records.len() >= lim {
        records.truncate(lim);
        return Ok((records, FetchOutcome::LimitReached));
      }
    }

    page += 1;
    clock.sleep(PAGE_PACING);
  }
}
