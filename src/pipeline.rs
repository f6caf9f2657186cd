// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate the full run: fetch pages, filter/sort, enrich, assemble, write artifacts
// role: processing/orchestrator
// inputs: EffectiveOptions, ApiExecutor + Clock capabilities
// outputs: Report JSON on stdout or --out; optional newline-delimited --participants file
// side_effects: Network via the executor; pacing sleeps; file writes; stderr notices
// invariants:
// - stages hand owned values forward; nothing upstream is mutated after its stage
// - fetch errors abort the run before any artifact is written
// - the report is written before the participants file; a failed report write leaves no participants file
// - a post-filter count below --limit is a notice, never an error
// errors: Propagates fetch/serialization/write errors with path context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};

use crate::cli::EffectiveOptions;
use crate::filter;
use crate::github::client::ApiExecutor;
use crate::github::stargazers::{self, FetchOutcome};
use crate::github::users;
use crate::model::Report;
use crate::report::build_report;
use crate::util::Clock;

pub fn run(opts: &EffectiveOptions, exec: &dyn ApiExecutor, clock: &dyn Clock) -> Result<()> {
  // Phase 1: collect every page (or up to --limit)
  let (records, outcome) =
    stargazers::fetch_all_stargazers(exec, clock, &opts.client, opts.limit)
      .context("fetching stargazers")?;
  if outcome == FetchOutcome::LimitReached {
    eprintln!("stopped at the requested limit of {} stargazers", records.len());
  }

  // Phase 2: filter and sort
  let filtered = filter::apply(records, &opts.filter, opts.sort);
  if let Some(limit) = opts.limit {
    if filtered.len() < limit {
      eprintln!(
        "note: {} stargazers match the filters (below the requested limit of {limit})",
        filtered.len()
      );
    }
  }

  // Phase 3: enrich with profile detail
  let enriched = users::enrich_all(exec, clock, &opts.client, filtered);

  // Phase 4: assemble and write artifacts
  let slug = format!("{}/{}", opts.client.owner, opts.client.repo);
  let report = build_report(&slug, enriched, opts.top);

  // Report first: a participants file must never outlive a failed report
  // write, or the raffle list has no report to check against.
  write_report(&report, &opts.out)?;
  if let Some(path) = &opts.participants {
    write_participants(&report, path)?;
  }
  Ok(())
}

fn write_report(report: &Report, out: &str) -> Result<()> {
  let json = serde_json::to_string_pretty(report).context("serializing report")?;
  if out == "-" {
    println!("{json}");
  } else {
    std::fs::write(out, json).with_context(|| format!("writing report to {out}"))?;
  }
  Ok(())
}

/// One login per line, in report order, for the raffle collaborator.
fn write_participants(report: &Report, path: &std::path::Path) -> Result<()> {
  let mut lines = String::new();
  for s in &report.stargazers {
    lines.push_str(&s.record.login);
    lines.push('\n');
  }
  std::fs::write(path, lines).with_context(|| format!("writing participants to {}", path.display()))
}
