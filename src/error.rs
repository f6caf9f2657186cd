// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Error taxonomy for the GitHub fetch path
// role: errors
// inputs: none
// outputs: FetchError, converted into anyhow at the pipeline boundary
// side_effects: none
// invariants:
// - Transport is never retried; retry decisions live in the rate-limit handler
// - SamlEnforcement carries actionable guidance in its Display
// errors: n/a (this is the error type)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
  /// Socket/TLS/DNS level failure before an HTTP status existed.
  #[error("transport failure: {message}")]
  Transport { message: String },

  /// The response arrived but its payload was not what the API promises.
  #[error("unexpected response shape: {message}")]
  Parse { message: String },

  /// Any non-2xx the rate-limit handler could not absorb.
  #[error("GitHub API returned HTTP {status}: {body}")]
  Http { status: u16, body: String },

  /// 403 naming SAML enforcement: retrying cannot help, the token needs
  /// to be authorized for the organization.
  #[error(
    "SAML enforcement blocked the request: {message}\nAuthorize your token for the organization (Settings → SSO → Authorize) and run again."
  )]
  SamlEnforcement { message: String },
}

impl FetchError {
  pub fn transport(message: impl Into<String>) -> Self {
    FetchError::Transport { message: message.into() }
  }

  pub fn parse(message: impl Into<String>) -> Self {
    FetchError::Parse { message: message.into() }
  }
}
