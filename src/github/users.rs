// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Enrich stargazer records with user-profile detail in paced, bounded batches
// role: github/enrichment
// inputs: ApiExecutor + Clock, ClientConfig, ordered StargazerRecord slice
// outputs: EnrichedStargazer vec, same length and order as the input
// side_effects: One profile request per record; 2s pacing before each batch after the first; stderr fallback notices
// invariants:
// - output[i] always corresponds to input[i]; concurrency never reorders
// - a failed profile fetch degrades that record to its bare form, never the batch
// - batches are at most ENRICH_BATCH_SIZE records; fan-out is bounded by the batch size
// errors: none surfaced; per-record failures are absorbed as bare records
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use crate::github::client::{ApiExecutor, ClientConfig};
use crate::github::rate_limit::fetch_with_retry;
use crate::model::{EnrichedStargazer, StargazerRecord};
use crate::util::Clock;

pub const ENRICH_BATCH_SIZE: usize = 50;
pub const BATCH_PACING: Duration = Duration::from_secs(2);

/// Fetch profile detail for every record, batch by batch. Each batch fans out
/// across a thread pool sized to the batch, and results are collected back in
/// input order before the next batch starts.
pub fn enrich_all(
  exec: &dyn ApiExecutor,
  clock: &dyn Clock,
  cfg: &ClientConfig,
  records: Vec<StargazerRecord>,
) -> Vec<EnrichedStargazer> {
  let mut enriched: Vec<EnrichedStargazer> = Vec::with_capacity(records.len());

  for (batch_idx, batch) in records.chunks(ENRICH_BATCH_SIZE).enumerate() {
    if batch_idx > 0 {
      clock.sleep(BATCH_PACING);
    }
    enriched.extend(enrich_batch(exec, clock, cfg, batch));
  }

  enriched
}

fn enrich_batch(
  exec: &dyn ApiExecutor,
  clock: &dyn Clock,
  cfg: &ClientConfig,
  batch: &[StargazerRecord],
) -> Vec<EnrichedStargazer> {
  let pool = rayon::ThreadPoolBuilder::new()
    .num_threads(batch.len())
    .build();

  match pool {
    Ok(pool) => pool.install(|| {
      use rayon::prelude::*;
      batch
        .par_iter()
        .map(|record| enrich_one(exec, clock, cfg, record))
        .collect()
    }),
    // Pool construction can fail under resource pressure; fall back to a
    // sequential pass rather than losing the batch.
    Err(_) => batch
      .iter()
      .map(|record| enrich_one(exec, clock, cfg, record))
      .collect(),
  }
}

fn enrich_one(
  exec: &dyn ApiExecutor,
  clock: &dyn Clock,
  cfg: &ClientConfig,
  record: &StargazerRecord,
) -> EnrichedStargazer {
  let url = cfg.user_url(&record.login);
  match fetch_with_retry(exec, clock, &url) {
    Ok(outcome) => EnrichedStargazer::with_profile(record.clone(), &outcome.data),
    Err(err) => {
      eprintln!("profile fetch for {} failed ({err}); keeping bare record", record.login);
      EnrichedStargazer::bare(record.clone())
    }
  }
}
