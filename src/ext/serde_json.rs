// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Dotted-path fetching over serde_json::Value with typed extraction, for flattening API page items
// role: extension/serde_json
// outputs: JsonFetch trait and Fetched wrapper; segments may be object keys or array indices
// invariants: No panics; missing paths yield None; as_str_nonempty rejects empty strings
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use serde::de::DeserializeOwned;

/// A located (or missing) JSON value, ready for typed extraction.
pub struct Fetched<'a> {
  inner: Option<&'a serde_json::Value>,
}

impl<'a> Fetched<'a> {
  /// Deserialize the located value as `T`.
  pub fn to<T>(&self) -> Option<T>
  where
    T: DeserializeOwned,
  {
    self.inner.and_then(|v| serde_json::from_value::<T>(v.clone()).ok())
  }

  /// Deserialize as `T`, falling back to `T::default()`.
  pub fn to_or_default<T>(&self) -> T
  where
    T: DeserializeOwned + Default,
  {
    self.to::<T>().unwrap_or_default()
  }

  /// Borrow the value as a non-empty string. Empty strings count as absent,
  /// which is what the record invariants need (a present-but-blank `login`
  /// must fail the same way as a missing one).
  pub fn as_str_nonempty(&self) -> Option<&'a str> {
    match self.inner.and_then(|v| v.as_str()) {
      Some(s) if !s.is_empty() => Some(s),
      _ => None,
    }
  }
}

/// Fetch nested values via dotted paths like `"user.login"` or `"items.0.starred_at"`.
pub trait JsonFetch {
  fn fetch(&self, path: &str) -> Fetched<'_>;
}

impl JsonFetch for serde_json::Value {
  fn fetch(&self, path: &str) -> Fetched<'_> {
    if path.is_empty() {
      return Fetched { inner: Some(self) };
    }

    let mut cur = self;

    for segment in path.split('.') {
      let next = match cur {
        serde_json::Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => cur.get(segment),
      };

      match next {
        Some(v) => cur = v,
        None => return Fetched { inner: None },
      }
    }

    Fetched { inner: Some(cur) }
  }
}
