//! Process-level tests for the bridge binary
//!
//! Whatever goes wrong, stdout must be exactly one JSON array line and the
//! exit status must be 0. The model is either unreachable or a one-shot
//! HTTP server on the loopback interface.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::thread::{self, JoinHandle};

fn bridge() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_tactics-llm-bridge"));
    for key in [
        "TACTICS_AI_INPUT",
        "TACTICS_AI_ENDPOINT",
        "TACTICS_AI_MODEL",
        "TACTICS_AI_TIMEOUT_SECS",
        "TACTICS_AI_LANG",
    ] {
        cmd.env_remove(key);
    }
    for key in ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"] {
        cmd.env_remove(key);
    }
    cmd.env("RUST_LOG", "tactics_llm_bridge=debug");
    cmd
}

fn temp_file(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "tactics-llm-bridge-cli-{}-{}",
        std::process::id(),
        name
    ));
    std::fs::write(&path, content).unwrap();
    path
}

/// Answer one generate request with a 200 carrying `body`
///
/// Returns the endpoint URL and a handle yielding the request body.
fn serve_generate_once(body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}/api/generate", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let request_body = loop {
            let n = stream.read(&mut chunk).unwrap();
            assert!(n > 0, "connection closed before the request body arrived");
            buf.extend_from_slice(&chunk[..n]);

            let Some(head_end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
                continue;
            };
            let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
            let length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if buf.len() >= head_end + 4 + length {
                break String::from_utf8(buf[head_end + 4..head_end + 4 + length].to_vec()).unwrap();
            }
        };

        let reply = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        stream.write_all(reply.as_bytes()).unwrap();
        request_body
    });

    (url, handle)
}

fn assert_empty_actions(output: &Output) {
    assert!(output.status.success(), "status: {:?}", output.status);
    assert_eq!(String::from_utf8_lossy(&output.stdout), "[]\n");
}

#[test]
fn test_missing_input_prints_empty_array() {
    let output = bridge()
        .args(["--input", "/no/such/dir/ai_input.json"])
        .output()
        .unwrap();

    assert_empty_actions(&output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Input file not found"));
}

#[test]
fn test_invalid_input_prints_empty_array() {
    let path = temp_file("not-json.json", "not json");
    let output = bridge().arg("--input").arg(&path).output().unwrap();

    assert_empty_actions(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid game state"));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_unreachable_model_prints_empty_array() {
    let path = temp_file(
        "state.json",
        r#"{"allies": [{"id": "ally1", "x": 2, "y": 3, "hp": 20}], "enemies": [{"id": "enemy1", "x": 7, "y": 3}]}"#,
    );
    let output = bridge()
        .arg("--input")
        .arg(&path)
        .args(["--endpoint", "http://127.0.0.1:9/api/generate", "--timeout-secs", "2"])
        .output()
        .unwrap();

    assert_empty_actions(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Model call failed"));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_model_reply_is_extracted_to_stdout() {
    let path = temp_file(
        "live-state.json",
        r#"{"allies": [{"id": "ally1", "x": 2, "y": 3, "hp": 20}], "enemies": [{"id": "enemy1", "x": 7, "y": 3}]}"#,
    );
    let (endpoint, server) = serve_generate_once(
        r#"{"model":"llama3","response":"Plan:\n```json\n[{\"unit\":\"enemy1\",\"action\":\"attack\",\"target\":\"ally1\"}]\n```","done":true}"#,
    );

    let output = bridge()
        .arg("--input")
        .arg(&path)
        .args(["--endpoint", &endpoint, "--model", "llama3", "--timeout-secs", "10"])
        .output()
        .unwrap();

    assert!(output.status.success(), "status: {:?}", output.status);
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "[{\"unit\":\"enemy1\",\"action\":\"attack\",\"target\":\"ally1\"}]\n"
    );

    let request: serde_json::Value = serde_json::from_str(&server.join().unwrap()).unwrap();
    assert_eq!(request["model"], "llama3");
    assert_eq!(request["stream"], false);
    assert_eq!(request["format"], "json");
    let prompt = request["prompt"].as_str().unwrap();
    assert!(prompt.contains("- id: enemy1, 位置: (7,3)"));
    assert!(prompt.contains("- id: ally1, 位置: (2,3), HP: 20"));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_input_path_from_environment() {
    let output = bridge()
        .env("TACTICS_AI_INPUT", "/no/such/dir/from_env.json")
        .output()
        .unwrap();

    assert_empty_actions(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("from_env.json"));
}

#[test]
fn test_bad_config_prints_empty_array() {
    let output = bridge()
        .env("TACTICS_AI_TIMEOUT_SECS", "soon")
        .output()
        .unwrap();

    assert_empty_actions(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config error"));
}

#[test]
fn test_config_file_is_applied() {
    let config = temp_file("bridge.toml", "input = \"/no/such/dir/from_toml.json\"\n");
    let output = bridge().arg("--config").arg(&config).output().unwrap();

    assert_empty_actions(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("from_toml.json"));
    std::fs::remove_file(config).ok();
}

#[test]
fn test_unknown_flag_prints_empty_array() {
    let output = bridge().arg("--frobnicate").output().unwrap();
    assert_empty_actions(&output);
}
