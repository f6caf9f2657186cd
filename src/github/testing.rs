// Shared fakes for the github modules' unit tests: a scripted executor and a
// clock whose sleeps are recorded instead of slept.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use crate::error::FetchError;
use crate::github::client::{ApiExecutor, ApiOutcome, RateLimitState};
use crate::util::Clock;

pub struct ScriptedExecutor {
  responses: Mutex<VecDeque<Result<ApiOutcome, FetchError>>>,
  pub requested: Mutex<Vec<String>>,
}

impl ScriptedExecutor {
  pub fn new(responses: Vec<Result<ApiOutcome, FetchError>>) -> Self {
    ScriptedExecutor {
      responses: Mutex::new(responses.into()),
      requested: Mutex::new(Vec::new()),
    }
  }
}

impl ApiExecutor for ScriptedExecutor {
  fn get(&self, url: &str) -> Result<ApiOutcome, FetchError> {
    self.requested.lock().unwrap().push(url.to_string());
    self
      .responses
      .lock()
      .unwrap()
      .pop_front()
      .expect("scripted executor ran out of responses")
  }
}

/// Executor that answers by URL, for concurrent (enrichment) tests where
/// request order is not deterministic.
pub struct RoutedExecutor {
  routes: std::collections::HashMap<String, ApiOutcome>,
  pub requested: Mutex<Vec<String>>,
}

impl RoutedExecutor {
  pub fn new(routes: std::collections::HashMap<String, ApiOutcome>) -> Self {
    RoutedExecutor {
      routes,
      requested: Mutex::new(Vec::new()),
    }
  }
}

impl ApiExecutor for RoutedExecutor {
  fn get(&self, url: &str) -> Result<ApiOutcome, FetchError> {
    self.requested.lock().unwrap().push(url.to_string());
    match self.routes.get(url) {
      Some(outcome) => Ok(outcome.clone()),
      None => Err(FetchError::Http {
        status: 404,
        body: format!("no route for {url}"),
      }),
    }
  }
}

pub struct FakeClock {
  now: Mutex<u64>,
  pub sleeps: Mutex<Vec<Duration>>,
}

impl FakeClock {
  pub fn at(epoch: u64) -> Self {
    FakeClock {
      now: Mutex::new(epoch),
      sleeps: Mutex::new(Vec::new()),
    }
  }

  pub fn slept_secs(&self) -> Vec<u64> {
    self.sleeps.lock().unwrap().iter().map(|d| d.as_secs()).collect()
  }
}

impl Clock for FakeClock {
  fn now_epoch(&self) -> u64 {
    *self.now.lock().unwrap()
  }

  fn sleep(&self, d: Duration) {
    *self.now.lock().unwrap() += d.as_secs();
    self.sleeps.lock().unwrap().push(d);
  }
}

pub fn ok_outcome(data: serde_json::Value) -> ApiOutcome {
  ApiOutcome {
    status: 200,
    data,
    rate: RateLimitState {
      remaining: Some(4999),
      reset_at: None,
    },
  }
}

pub fn forbidden_outcome(message: &str, remaining: Option<u64>, reset_at: Option<u64>) -> ApiOutcome {
  ApiOutcome {
    status: 403,
    data: serde_json::json!({ "message": message }),
    rate: RateLimitState { remaining, reset_at },
  }
}
