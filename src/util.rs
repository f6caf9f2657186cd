// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for token discovery, time-of-day parsing, pacing/clock seam, man page rendering, diagnostics
// role: utilities/helpers
// inputs: env GITHUB_TOKEN / GH_TOKEN; optional `gh` CLI for token fallback; clap CommandFactory
// outputs: Discovered tokens, parsed seconds-since-midnight, troff man page text
// side_effects: Token discovery may spawn a `gh` subprocess; SystemClock sleeps the calling thread
// invariants:
// - Token discovery prefers GITHUB_TOKEN, then GH_TOKEN, then `gh auth token`; blank values count as absent
// - parse_time_of_day accepts HH:MM and HH:MM:SS only, range-checked
// errors: parse_time_of_day reports the offending input; everything else is best-effort
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Result, bail};
use clap::CommandFactory;
use once_cell::sync::Lazy;

/// Discover a GitHub token: env vars first, then `gh auth token` if available.
pub fn discover_token() -> Option<String> {
  if let Ok(t) = std::env::var("GITHUB_TOKEN") {
    if !t.trim().is_empty() {
      return Some(t);
    }
  }

  if let Ok(t) = std::env::var("GH_TOKEN") {
    if !t.trim().is_empty() {
      return Some(t);
    }
  }

  if let Ok(output) = std::process::Command::new("gh").args(["auth", "token"]).output() {
    if output.status.success() {
      let t = String::from_utf8_lossy(&output.stdout).trim().to_string();

      if !t.is_empty() {
        return Some(t);
      }
    }
  }

  None
}

/// Parse `HH:MM` or `HH:MM:SS` into seconds since midnight.
pub fn parse_time_of_day(raw: &str) -> Result<u32> {
  static RE_TIME: Lazy<regex::Regex> =
    Lazy::new(|| regex::Regex::new(r"^(\d{1,2}):(\d{2})(?::(\d{2}))?$").unwrap());

  let Some(caps) = RE_TIME.captures(raw.trim()) else {
    bail!("invalid time {raw:?}, expected HH:MM or HH:MM:SS");
  };

  let h: u32 = caps.get(1).unwrap().as_str().parse()?;
  let m: u32 = caps.get(2).unwrap().as_str().parse()?;
  let s: u32 = caps.get(3).map(|c| c.as_str().parse()).transpose()?.unwrap_or(0);

  if h > 23 || m > 59 || s > 59 {
    bail!("time {raw:?} is out of range");
  }

  Ok(h * 3600 + m * 60 + s)
}

/// Render seconds-since-midnight back to HH:MM:SS for notices.
pub fn format_time_of_day(secs: u32) -> String {
  format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Wall-clock and sleep seam so rate-limit waits and pacing delays can be
/// simulated in tests without real time passing.
pub trait Clock: Send + Sync {
  fn now_epoch(&self) -> u64;
  fn sleep(&self, d: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
  fn now_epoch(&self) -> u64 {
    SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|d| d.as_secs())
      .unwrap_or(0)
  }

  fn sleep(&self, d: Duration) {
    std::thread::sleep(d);
  }
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}

/// Red `error:` prefix when stderr is a terminal-style consumer.
pub fn fatal_prefix() -> &'static str {
  "\x1b[1;31merror:\x1b[0m"
}
