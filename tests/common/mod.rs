use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

use secquiz::api::HttpQuizService;
use secquiz::config::ServerConfig;

pub const TEST_TOKEN: &str = "test-token";

/// Client pointed at the mock server, carrying `TEST_TOKEN`
#[allow(dead_code)]
pub fn authed_service(server: &MockServer) -> HttpQuizService {
    anonymous_service(server).with_token(TEST_TOKEN)
}

#[allow(dead_code)]
pub fn anonymous_service(server: &MockServer) -> HttpQuizService {
    let config = ServerConfig {
        base_url: server.uri(),
        timeout_seconds: 5,
    };
    HttpQuizService::new(&config).expect("failed to build client")
}

/// Four-option question whose correct option is always 2
#[allow(dead_code)]
pub fn question_json(number: u32, total: u32) -> Value {
    json!({
        "question_id": 100 + i64::from(number),
        "question_text": format!("Networking question {}", number),
        "options": [
            {"id": 1, "text": "TCP"},
            {"id": 2, "text": "UDP"},
            {"id": 3, "text": "ICMP"},
            {"id": 4, "text": "ARP"}
        ],
        "topic": "networking",
        "difficulty": 1.0,
        "question_number": number,
        "total_questions": total
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
