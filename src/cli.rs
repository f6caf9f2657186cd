// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: CLI surface: argument parsing, env resolution, and option normalization
// role: cli/entry
// inputs: argv (clap), GITHUB_REPO_OWNER / GITHUB_REPO_NAME / GITHUB_API_URL, token env vars
// outputs: EffectiveOptions carrying everything the pipeline needs; no env reads past this point
// side_effects: May prompt on stderr/stdin (timezone fallback confirmation)
// invariants:
// - --from/--to require each other and --date; violations bail before any network call
// - a window never runs in the local zone without explicit confirmation
// - env and token discovery happen exactly once, here
// errors: anyhow with user-facing messages; clap handles parse-level failures
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Result, bail};
use chrono::NaiveDate;
use clap::Parser;

use crate::filter::{FilterSpec, SortOrder, TimezoneChoice};
use crate::github::client::ClientConfig;
use crate::util;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_OWNER: &str = "octocat";
pub const DEFAULT_REPO: &str = "hello-world";

#[derive(Parser, Debug)]
#[command(
    name = "stargazer-report",
    version,
    about = "Fetch, enrich, and report a repository's stargazers",
    long_about = None
)]
pub struct Cli {
  /// Repository owner (default: $GITHUB_REPO_OWNER, then "octocat")
  #[arg(long)]
  pub owner: Option<String>,

  /// Repository name (default: $GITHUB_REPO_NAME, then "hello-world")
  #[arg(long)]
  pub repo: Option<String>,

  /// Sort direction for starred_at
  #[arg(long, value_enum, default_value_t = SortOrder::Desc)]
  pub sort: SortOrder,

  /// Keep only stars from this calendar date (YYYY-MM-DD)
  #[arg(long)]
  pub date: Option<NaiveDate>,

  /// Window start, HH:MM[:SS]; requires --to and --date
  #[arg(long)]
  pub from: Option<String>,

  /// Window end (inclusive), HH:MM[:SS]; requires --from and --date
  #[arg(long)]
  pub to: Option<String>,

  /// IANA zone the window is evaluated in, e.g. Europe/Lisbon
  #[arg(long)]
  pub timezone: Option<String>,

  /// Stop fetching once this many stargazers are collected
  #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
  pub limit: Option<u32>,

  /// Entries in the report's top list
  #[arg(long, default_value_t = 10)]
  pub top: usize,

  /// Report destination: file path, or "-" for stdout
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Also write a newline-delimited login list to this path
  #[arg(long)]
  pub participants: Option<PathBuf>,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,
}

/// Yes/no prompt seam so normalization is testable without a tty.
pub trait Confirmer {
  fn confirm(&self, prompt: &str) -> bool;
}

pub struct StdinConfirmer;

impl Confirmer for StdinConfirmer {
  fn confirm(&self, prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = io::stderr().flush();
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
      return false;
    }
    matches!(line.trim(), "y" | "Y" | "yes" | "Yes" | "YES")
  }
}

#[derive(Debug)]
pub struct EffectiveOptions {
  pub client: ClientConfig,
  pub sort: SortOrder,
  pub filter: FilterSpec,
  pub limit: Option<usize>,
  pub top: usize,
  pub out: String,
  pub participants: Option<PathBuf>,
}

pub fn normalize(cli: Cli, confirmer: &dyn Confirmer) -> Result<EffectiveOptions> {
  // Validate window selection
  let window = match (&cli.from, &cli.to) {
    (None, None) => None,
    (Some(_), None) | (None, Some(_)) => bail!("--from and --to must be used together"),
    (Some(f), Some(t)) => {
      if cli.date.is_none() {
        bail!("--from/--to need --date to pin the calendar day");
      }
      let from = util::parse_time_of_day(f)?;
      let to = util::parse_time_of_day(t)?;
      if from > to {
        bail!(
          "--from ({}) is after --to ({})",
          util::format_time_of_day(from),
          util::format_time_of_day(to)
        );
      }
      Some((from, to))
    }
  };

  let timezone = resolve_timezone(cli.timezone.as_deref(), window.is_some(), confirmer)?;

  let client = ClientConfig {
    api_base: std::env::var("GITHUB_API_URL")
      .ok()
      .filter(|v| !v.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
      .trim_end_matches('/')
      .to_string(),
    owner: resolve_string(cli.owner, "GITHUB_REPO_OWNER", DEFAULT_OWNER),
    repo: resolve_string(cli.repo, "GITHUB_REPO_NAME", DEFAULT_REPO),
    token: util::discover_token(),
  };

  Ok(EffectiveOptions {
    client,
    sort: cli.sort,
    filter: FilterSpec {
      date: cli.date,
      window,
      timezone,
    },
    limit: cli.limit.map(|n| n as usize),
    top: cli.top,
    out: cli.out,
    participants: cli.participants,
  })
}

fn resolve_string(flag: Option<String>, env_key: &str, default: &str) -> String {
  flag
    .or_else(|| std::env::var(env_key).ok())
    .filter(|v| !v.trim().is_empty())
    .unwrap_or_else(|| default.to_string())
}

/// The zone only matters when a time window is in play. An invalid or missing
/// zone then falls back to the machine's local zone, but never silently.
fn resolve_timezone(
  requested: Option<&str>,
  window_requested: bool,
  confirmer: &dyn Confirmer,
) -> Result<TimezoneChoice> {
  match requested {
    Some(name) => match name.parse::<chrono_tz::Tz>() {
      Ok(tz) => Ok(TimezoneChoice::Named(tz)),
      Err(_) if window_requested => {
        if confirmer.confirm(&format!(
          "Timezone '{name}' is not a known IANA zone. Evaluate the window in the local zone instead?"
        )) {
          Ok(TimezoneChoice::Local)
        } else {
          bail!("unknown timezone '{name}'; aborting before fetching anything")
        }
      }
      Err(_) => bail!("unknown timezone '{name}' (expected an IANA id like Europe/Lisbon)"),
    },
    None if window_requested => {
      if confirmer.confirm("No --timezone given. Evaluate the window in the local zone?") {
        Ok(TimezoneChoice::Local)
      } else {
        bail!("a time window needs a timezone; aborting before fetching anything")
      }
    }
    None => Ok(TimezoneChoice::Local),
  }
}
