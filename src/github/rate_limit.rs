// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Triage 403 responses (quota exhaustion vs SAML enforcement vs other) and retry around quota resets
// role: github/rate-limit
// inputs: ApiExecutor for the request, Clock for now/sleep, request URL
// outputs: ApiOutcome on success; SamlEnforcement or Http on fatal 403s
// side_effects: Sleeps the pipeline until the reported reset (plus a safety buffer); prints a progress notice
// invariants:
// - SAML enforcement is never retried or slept on, even when the quota header reads zero
// - the retry loop is bounded; the final 403 surfaces as Http after MAX_RATE_LIMIT_WAITS waits
// errors: propagates executor errors untouched (Transport/Parse/Http)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use crate::error::FetchError;
use crate::ext::serde_json::JsonFetch;
use crate::github::client::{ApiExecutor, ApiOutcome};
use crate::util::Clock;

/// Added on top of the reported reset instant; GitHub's clock and ours drift.
pub const RESET_SAFETY_BUFFER_SECS: u64 = 60;

/// Quota exhaustion is transient, but a request is not re-slept forever.
pub const MAX_RATE_LIMIT_WAITS: u32 = 3;

fn forbidden_message(outcome: &ApiOutcome) -> String {
  outcome
    .data
    .fetch("message")
    .to::<String>()
    .or_else(|| outcome.data.as_str().map(|s| s.to_string()))
    .unwrap_or_else(|| outcome.data.to_string())
}

fn is_saml_enforcement(message: &str) -> bool {
  message.to_ascii_lowercase().contains("saml enforcement")
}

/// Issue a GET, absorbing quota-exhaustion 403s by waiting out the reset and
/// reissuing the identical request. GitHub distinguishes quota exhaustion
/// (transient) from SAML authorization-policy rejection (permanent without
/// human action); conflating them would retry forever or abort on a
/// recoverable condition.
pub fn fetch_with_retry(exec: &dyn ApiExecutor, clock: &dyn Clock, url: &str) -> Result<ApiOutcome, FetchError> {
  let mut waits = 0u32;

  loop {
    let outcome = exec.get(url)?;

    if outcome.status != 403 {
      return Ok(outcome);
    }

    let message = forbidden_message(&outcome);

    // Policy rejection first: waiting out the quota cannot fix a token that
    // was never authorized, whatever the rate headers say.
    if is_saml_enforcement(&message) {
      return Err(FetchError::SamlEnforcement { message });
    }

    // Exhausted quota: recover by waiting for the reported reset.
    if outcome.rate.remaining == Some(0) {
      if waits >= MAX_RATE_LIMIT_WAITS {
        return Err(FetchError::Http { status: 403, body: message });
      }

      let now = clock.now_epoch();
      let until_reset = outcome.rate.reset_at.unwrap_or(now).saturating_sub(now);
      let wait_secs = until_reset + RESET_SAFETY_BUFFER_SECS;

      eprintln!("rate limit exhausted; waiting {wait_secs}s for the quota to reset");
      clock.sleep(Duration::from_secs(wait_secs));
      waits += 1;
      continue;
    }

    return Err(FetchError::Http { status: 403, body: message });
  }
}
