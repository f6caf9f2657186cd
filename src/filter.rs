// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Date / time-of-day / timezone filtering and stable sorting of stargazer records
// role: pipeline/filter
// inputs: StargazerRecord vec, FilterSpec, SortOrder
// outputs: Filtered vec, stably sorted by starred_at
// side_effects: none (pure)
// invariants:
// - output is always a subset of the input
// - date-only filtering is a UTC calendar-day test
// - a time window is inclusive on both ends and evaluated on the chosen zone's wall clock
// - sorting is stable: equal timestamps keep their input order
// errors: none; spec validation happens upstream in the CLI layer
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{NaiveDate, TimeZone, Timelike};

use crate::model::StargazerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortOrder {
  Asc,
  Desc,
}

/// Zone the time-of-day window is evaluated in. `Local` is only reachable
/// after the user confirms the fallback in the CLI layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimezoneChoice {
  Named(chrono_tz::Tz),
  Local,
}

#[derive(Debug, Clone)]
pub struct FilterSpec {
  pub date: Option<NaiveDate>,
  /// Both seconds-since-midnight bounds, inclusive. Requires `date`.
  pub window: Option<(u32, u32)>,
  pub timezone: TimezoneChoice,
}

impl FilterSpec {
  pub fn unfiltered() -> Self {
    FilterSpec {
      date: None,
      window: None,
      timezone: TimezoneChoice::Local,
    }
  }
}

pub fn apply(records: Vec<StargazerRecord>, spec: &FilterSpec, sort: SortOrder) -> Vec<StargazerRecord> {
  let mut kept: Vec<StargazerRecord> = records
    .into_iter()
    .filter(|r| matches(r, spec))
    .collect();

  match sort {
    SortOrder::Asc => kept.sort_by(|a, b| a.starred_at.cmp(&b.starred_at)),
    SortOrder::Desc => kept.sort_by(|a, b| b.starred_at.cmp(&a.starred_at)),
  }

  kept
}

fn matches(record: &StargazerRecord, spec: &FilterSpec) -> bool {
  let Some(date) = spec.date else {
    return true;
  };

  match spec.window {
    // Plain date filter: the UTC calendar day.
    None => record.starred_at.date_naive() == date,
    // Windowed filter: project into the chosen zone's wall clock first.
    Some((from, to)) => match spec.timezone {
      TimezoneChoice::Named(tz) => in_window(&record.starred_at.with_timezone(&tz), date, from, to),
      TimezoneChoice::Local => {
        in_window(&record.starred_at.with_timezone(&chrono::Local), date, from, to)
      }
    },
  }
}

fn in_window<Tz: TimeZone>(local: &chrono::DateTime<Tz>, date: NaiveDate, from: u32, to: u32) -> bool {
  if local.date_naive() != date {
    return false;
  }
  let secs = local.time().num_seconds_from_midnight();
  from <= secs && secs <= to
}
