// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the JSON model (stargazer records, enrichment, report summary) shared by all pipeline stages
// role: model/types
// outputs: Serializable structs with stable field names and optional enrichment fields
// invariants: login is present and non-empty; starred_at is a valid RFC3339 instant; enrichment is additive only
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ext::serde_json::JsonFetch;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum UserType {
  User,
  Organization,
}

impl UserType {
  /// GitHub reports `"User"`, `"Organization"`, occasionally `"Bot"`; anything
  /// that is not an organization counts as a user for raffle purposes.
  pub fn from_api(s: &str) -> UserType {
    if s.eq_ignore_ascii_case("organization") {
      UserType::Organization
    } else {
      UserType::User
    }
  }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct StargazerRecord {
  pub login: String,
  pub id: i64,
  pub profile_url: String,
  pub starred_at: DateTime<Utc>,
  #[serde(rename = "type")]
  pub user_type: UserType,
}

/// A stargazer plus optional profile attributes. Enrichment never removes or
/// rewrites base fields; a failed per-user fetch leaves every optional field
/// `None`, making the value indistinguishable from the bare record.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct EnrichedStargazer {
  #[serde(flatten)]
  pub record: StargazerRecord,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub location: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub bio: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub followers: Option<i64>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub public_repos: Option<i64>,
}

impl EnrichedStargazer {
  /// The degraded form: base record, nothing added.
  pub fn bare(record: StargazerRecord) -> Self {
    EnrichedStargazer {
      record,
      name: None,
      company: None,
      location: None,
      bio: None,
      followers: None,
      public_repos: None,
    }
  }

  /// Merge a fetched profile object over a base record.
  pub fn with_profile(record: StargazerRecord, profile: &serde_json::Value) -> Self {
    EnrichedStargazer {
      record,
      name: profile.fetch("name").to::<String>(),
      company: profile.fetch("company").to::<String>(),
      location: profile.fetch("location").to::<String>(),
      bio: profile.fetch("bio").to::<String>(),
      followers: profile.fetch("followers").to::<i64>(),
      public_repos: profile.fetch("public_repos").to::<i64>(),
    }
  }

  pub fn is_enriched(&self) -> bool {
    self.name.is_some()
      || self.company.is_some()
      || self.location.is_some()
      || self.bio.is_some()
      || self.followers.is_some()
      || self.public_repos.is_some()
  }
}

/// Flatten one `{ user, starred_at }` page item into a StargazerRecord.
pub fn flatten_stargazer(item: &serde_json::Value) -> Result<StargazerRecord, FetchError> {
  let login = item
    .fetch("user.login")
    .as_str_nonempty()
    .ok_or_else(|| FetchError::parse("stargazer item is missing user.login"))?
    .to_string();

  let id = item
    .fetch("user.id")
    .to::<i64>()
    .ok_or_else(|| FetchError::parse(format!("stargazer {login} is missing user.id")))?;

  let starred_raw = item
    .fetch("starred_at")
    .as_str_nonempty()
    .ok_or_else(|| FetchError::parse(format!("stargazer {login} is missing starred_at")))?;

  let starred_at = DateTime::parse_from_rfc3339(starred_raw)
    .map_err(|e| FetchError::parse(format!("stargazer {login} has invalid starred_at {starred_raw:?}: {e}")))?
    .with_timezone(&Utc);

  let profile_url = item
    .fetch("user.html_url")
    .to::<String>()
    .unwrap_or_else(|| format!("https://github.com/{login}"));

  let user_type = UserType::from_api(&item.fetch("user.type").to_or_default::<String>());

  Ok(StargazerRecord {
    login,
    id,
    profile_url,
    starred_at,
    user_type,
  })
}

// --- Report types ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StarBrief {
  pub login: String,
  pub starred_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportSummary {
  pub total: usize,
  pub users: usize,
  pub organizations: usize,
  pub enriched: usize,
  pub degraded: usize,
  pub top: Vec<StarBrief>,
  pub most_recent: Vec<StarBrief>,
  pub oldest: Vec<StarBrief>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Report {
  pub repo: String,
  pub summary: ReportSummary,
  pub stargazers: Vec<EnrichedStargazer>,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn page_item(login: &str, id: i64, starred_at: &str) -> serde_json::Value {
    serde_json::json!({
      "starred_at": starred_at,
      "user": {
        "login": login,
        "id": id,
        "html_url": format!("https://github.com/{login}"),
        "type": "User"
      }
    })
  }

  #[test]
  fn flatten_roundtrip_preserves_identity_fields() {
    let item = page_item("octocat", 583231, "2024-03-01T12:30:00Z");
    let rec = flatten_stargazer(&item).unwrap();

    assert_eq!(rec.login, "octocat");
    assert_eq!(rec.id, 583231);
    assert_eq!(rec.starred_at.to_rfc3339(), "2024-03-01T12:30:00+00:00");

    // Serialize and read back: login, id, starred_at must survive exactly.
    let text = serde_json::to_string(&rec).unwrap();
    let back: StargazerRecord = serde_json::from_str(&text).unwrap();
    assert_eq!(back, rec);
  }

  #[test]
  fn flatten_rejects_missing_and_blank_login() {
    let missing = serde_json::json!({ "starred_at": "2024-03-01T00:00:00Z", "user": { "id": 1 } });
    assert!(flatten_stargazer(&missing).is_err());

    let blank = serde_json::json!({
      "starred_at": "2024-03-01T00:00:00Z",
      "user": { "login": "", "id": 1 }
    });
    assert!(flatten_stargazer(&blank).is_err());
  }

  #[test]
  fn flatten_rejects_invalid_timestamp() {
    let item = serde_json::json!({
      "starred_at": "yesterday-ish",
      "user": { "login": "octocat", "id": 1 }
    });
    let err = flatten_stargazer(&item).unwrap_err();
    assert!(err.to_string().contains("starred_at"));
  }

  #[test]
  fn organization_type_classified() {
    let mut item = page_item("octo-org", 9, "2024-03-01T00:00:00Z");
    item["user"]["type"] = serde_json::json!("Organization");
    let rec = flatten_stargazer(&item).unwrap();
    assert_eq!(rec.user_type, UserType::Organization);
  }

  #[test]
  fn enrichment_is_additive_and_bare_matches_base() {
    let rec = flatten_stargazer(&page_item("octocat", 1, "2024-03-01T00:00:00Z")).unwrap();

    let profile = serde_json::json!({
      "name": "The Octocat",
      "company": null,
      "followers": 4200,
      "public_repos": 8
    });
    let enriched = EnrichedStargazer::with_profile(rec.clone(), &profile);
    assert_eq!(enriched.record, rec);
    assert_eq!(enriched.name.as_deref(), Some("The Octocat"));
    assert_eq!(enriched.company, None);
    assert_eq!(enriched.followers, Some(4200));
    assert!(enriched.is_enriched());

    let bare = EnrichedStargazer::bare(rec.clone());
    assert_eq!(bare.record, rec);
    assert!(!bare.is_enriched());
  }
}
