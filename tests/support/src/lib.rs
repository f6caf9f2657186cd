//! test_support: helpers for the integration tests.
//!
//! Provides a preconfigured runner for the compiled binary and `MockGithub`,
//! a tiny local HTTP server the binary can be pointed at via `GITHUB_API_URL`.

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

/// Command for the compiled binary with a hermetic environment: no inherited
/// token vars, `GITHUB_API_URL` pointed at the given base.
pub fn bin(api_base: &str) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::cargo_bin("stargazer-report").expect("binary builds");
    cmd.env_remove("GH_TOKEN")
        .env("GITHUB_TOKEN", "test-token")
        .env("GITHUB_API_URL", api_base);
    cmd
}

/// A canned HTTP response.
#[derive(Clone)]
pub struct StubResponse {
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
}

impl StubResponse {
    pub fn json_ok(body: serde_json::Value) -> Self {
        StubResponse {
            status: 200,
            body: body.to_string(),
            headers: vec![("x-ratelimit-remaining".into(), "4999".into())],
        }
    }

    /// A 403 with a JSON message and rate-limit headers.
    pub fn forbidden(message: &str, remaining: u64, reset_at: u64) -> Self {
        StubResponse {
            status: 403,
            body: serde_json::json!({ "message": message }).to_string(),
            headers: vec![
                ("x-ratelimit-remaining".into(), remaining.to_string()),
                ("x-ratelimit-reset".into(), reset_at.to_string()),
            ],
        }
    }
}

/// Minimal GitHub API stand-in: routes are exact `path?query` strings.
/// Unrouted paths answer 404. The accept loop runs until the test process
/// exits.
pub struct MockGithub {
    base_url: String,
    routes: Arc<Mutex<HashMap<String, StubResponse>>>,
    pub hits: Arc<Mutex<Vec<String>>>,
}

impl MockGithub {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind mock server");
        let base_url = format!("http://{}", listener.local_addr().expect("local addr"));
        let routes: Arc<Mutex<HashMap<String, StubResponse>>> = Arc::new(Mutex::new(HashMap::new()));
        let hits: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

        let thread_routes = Arc::clone(&routes);
        let thread_hits = Arc::clone(&hits);
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { continue };
                let routes = Arc::clone(&thread_routes);
                let hits = Arc::clone(&thread_hits);
                thread::spawn(move || serve_one(stream, &routes, &hits));
            }
        });

        MockGithub { base_url, routes, hits }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn stub(&self, path_and_query: &str, response: StubResponse) {
        self.routes
            .lock()
            .unwrap()
            .insert(path_and_query.to_string(), response);
    }

    /// Stub one stargazers page for octocat/hello-world.
    pub fn stub_stargazers_page(&self, page: usize, items: serde_json::Value) {
        self.stub(
            &format!("/repos/octocat/hello-world/stargazers?per_page=100&page={page}"),
            StubResponse::json_ok(items),
        );
    }

    pub fn stub_user(&self, login: &str, profile: serde_json::Value) {
        self.stub(&format!("/users/{login}"), StubResponse::json_ok(profile));
    }
}

fn serve_one(
    mut stream: TcpStream,
    routes: &Mutex<HashMap<String, StubResponse>>,
    hits: &Mutex<Vec<String>>,
) {
    let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));

    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // "GET /path?query HTTP/1.1"
    let target = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();

    // Drain headers so the client sees a clean close.
    let mut line = String::new();
    while reader.read_line(&mut line).is_ok() {
        if line == "\r\n" || line.is_empty() {
            break;
        }
        line.clear();
    }
    hits.lock().unwrap().push(target.clone());

    let response = routes.lock().unwrap().get(&target).cloned().unwrap_or(StubResponse {
        status: 404,
        body: serde_json::json!({ "message": "Not Found" }).to_string(),
        headers: vec![],
    });

    let reason = match response.status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        _ => "Response",
    };
    let mut head = format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n",
        response.status,
        reason,
        response.body.len()
    );
    for (name, value) in &response.headers {
        head.push_str(&format!("{name}: {value}\r\n"));
    }
    head.push_str("\r\n");

    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(response.body.as_bytes());
    let _ = stream.flush();
}
