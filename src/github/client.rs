// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Single-request HTTP executor for the GitHub REST API plus the client configuration it runs under
// role: github/executor
// inputs: ClientConfig (base URL, owner/repo, optional bearer token); request URLs
// outputs: ApiOutcome { status, data, rate } for 2xx and 403; typed FetchError otherwise
// side_effects: One HTTPS GET per call; no shared mutable state, safe to repeat (idempotent GET)
// invariants:
// - 2xx with a non-JSON body is a Parse error
// - non-2xx, non-403 statuses fail immediately with Http { status, body }
// - 403 is passed through for the rate-limit handler to classify
// - rate-limit headers are read fresh on every response, never cached
// errors: Transport before a response; Parse/Http as above
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::Duration;

use crate::error::FetchError;

const USER_AGENT: &str = "stargazer-report";
// star+json exposes starred_at on the stargazers collection; plain endpoints
// (per-user profiles) serve their normal representation under it.
const ACCEPT: &str = "application/vnd.github.star+json";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Explicit client configuration: no process-global reads happen past CLI
/// normalization, so tests can run independent clients side by side.
#[derive(Debug, Clone)]
pub struct ClientConfig {
  pub api_base: String,
  pub owner: String,
  pub repo: String,
  pub token: Option<String>,
}

impl ClientConfig {
  pub fn stargazers_page_url(&self, per_page: usize, page: usize) -> String {
    format!(
      "{}/repos/{}/{}/stargazers?per_page={}&page={}",
      self.api_base, self.owner, self.repo, per_page, page
    )
  }

  pub fn user_url(&self, login: &str) -> String {
    format!("{}/users/{}", self.api_base, login)
  }
}

/// Quota headers, parsed fresh from every response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateLimitState {
  pub remaining: Option<u64>,
  pub reset_at: Option<u64>,
}

/// A classified response the pipeline can act on: any 2xx, or a 403 awaiting
/// rate-limit/SAML triage.
#[derive(Debug, Clone)]
pub struct ApiOutcome {
  pub status: u16,
  pub data: serde_json::Value,
  pub rate: RateLimitState,
}

impl ApiOutcome {
  pub fn is_success(&self) -> bool {
    (200..300).contains(&self.status)
  }
}

/// Seam between the pipeline and the network; fakes implement this in tests.
pub trait ApiExecutor: Send + Sync {
  fn get(&self, url: &str) -> Result<ApiOutcome, FetchError>;
}

pub struct HttpExecutor {
  agent: ureq::Agent,
  token: Option<String>,
}

impl HttpExecutor {
  pub fn new(token: Option<String>) -> Self {
    let agent = ureq::AgentBuilder::new()
      .timeout(REQUEST_TIMEOUT)
      .build();

    HttpExecutor { agent, token }
  }
}

fn rate_state(resp: &ureq::Response) -> RateLimitState {
  RateLimitState {
    remaining: resp.header("x-ratelimit-remaining").and_then(|v| v.parse().ok()),
    reset_at: resp.header("x-ratelimit-reset").and_then(|v| v.parse().ok()),
  }
}

fn success_outcome(resp: ureq::Response) -> Result<ApiOutcome, FetchError> {
  let status = resp.status();
  let rate = rate_state(&resp);
  let body = resp
    .into_string()
    .map_err(|e| FetchError::transport(format!("reading response body: {e}")))?;

  let data: serde_json::Value =
    serde_json::from_str(&body).map_err(|e| FetchError::parse(format!("response is not valid JSON: {e}")))?;

  Ok(ApiOutcome { status, data, rate })
}

fn forbidden_outcome(resp: ureq::Response) -> ApiOutcome {
  let rate = rate_state(&resp);
  let body = resp.into_string().unwrap_or_default();

  // 403 bodies are usually JSON with a `message`; keep the raw text when not.
  let data = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));

  ApiOutcome { status: 403, data, rate }
}

impl ApiExecutor for HttpExecutor {
  fn get(&self, url: &str) -> Result<ApiOutcome, FetchError> {
    let mut req = self
      .agent
      .get(url)
      .set("Accept", ACCEPT)
      .set("User-Agent", USER_AGENT)
      .set("X-GitHub-Api-Version", API_VERSION);

    if let Some(token) = &self.token {
      req = req.set("Authorization", &format!("Bearer {token}"));
    }

    match req.call() {
      Ok(resp) => success_outcome(resp),
      Err(ureq::Error::Status(403, resp)) => Ok(forbidden_outcome(resp)),
      Err(ureq::Error::Status(status, resp)) => {
        let body = resp.into_string().unwrap_or_default();
        Err(FetchError::Http { status, body })
      }
      Err(ureq::Error::Transport(t)) => Err(FetchError::transport(t.to_string())),
    }
  }
}
