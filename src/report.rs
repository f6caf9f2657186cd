// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assemble the aggregate report from the enriched, already-sorted stargazer list
// role: pipeline/report
// inputs: repo slug, enriched stargazers in caller order, top-N size
// outputs: Report (summary counts, top/most_recent/oldest briefs, full list)
// side_effects: none (pure)
// invariants:
// - `top` keeps the caller's sort order; its length is min(top_n, total)
// - `most_recent` and `oldest` are independent 5-entry re-sorts, never the caller order
// - enriched + degraded == total
// errors: none
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use crate::model::{EnrichedStargazer, Report, ReportSummary, StarBrief, UserType};

const RECENCY_LIST_LEN: usize = 5;

pub fn build_report(repo: &str, stargazers: Vec<EnrichedStargazer>, top_n: usize) -> Report {
  let total = stargazers.len();
  let users = stargazers
    .iter()
    .filter(|s| s.record.user_type == UserType::User)
    .count();
  let enriched = stargazers.iter().filter(|s| s.is_enriched()).count();

  let top = stargazers.iter().take(top_n).map(brief).collect();

  let mut by_time: Vec<&EnrichedStargazer> = stargazers.iter().collect();
  by_time.sort_by(|a, b| a.record.starred_at.cmp(&b.record.starred_at));

  let oldest = by_time.iter().take(RECENCY_LIST_LEN).map(|s| brief(s)).collect();
  let most_recent = by_time
    .iter()
    .rev()
    .take(RECENCY_LIST_LEN)
    .map(|s| brief(s))
    .collect();

  Report {
    repo: repo.to_string(),
    summary: ReportSummary {
      total,
      users,
      organizations: total - users,
      enriched,
      degraded: total - enriched,
      top,
      most_recent,
      oldest,
    },
    stargazers,
  }
}

fn brief(s: &EnrichedStargazer) -> StarBrief {
  StarBrief {
    login: s.record.login.clone(),
    starred_at: s.record.starred_at,
  }
}
