//! End-to-end CLI tests for the weblinks binary.

mod support;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::json;
use std::time::Duration;

use support::socket_guard::start_mock_server_or_skip;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

fn weblinks() -> Command {
    let mut cmd = Command::cargo_bin("weblinks").unwrap();
    cmd.env_remove("RUST_LOG")
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_API_URL")
        .env_remove("WEBLINKS_OFFLINE")
        .env_remove("WEBLINKS_CONNECT_TIMEOUT_SECS")
        .env_remove("WEBLINKS_READ_TIMEOUT_SECS")
        .env_remove("WEBLINKS_DOI_RESOLVER");
    cmd
}

/// Test that --help displays usage information and exits with code 0.
#[test]
fn test_binary_help_displays_usage() {
    weblinks()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build URLs and query web APIs"));
}

/// Test that --version displays version and exits with code 0.
#[test]
fn test_binary_version_displays_version() {
    weblinks()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("weblinks"));
}

#[test]
fn test_binary_invalid_flag_returns_error() {
    weblinks()
        .arg("--invalid-flag")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_url_command_prints_composed_url() {
    weblinks()
        .args([
            "url",
            "https://example.com/api/",
            "--path",
            "v1/items",
            "--path",
            "a b",
            "--query",
            "page=2",
            "--query",
            "q=x y",
            "--fragment",
            "top",
        ])
        .assert()
        .success()
        .stdout("https://example.com/api/v1/items/a%20b?page=2&q=x%20y#top\n");
}

#[test]
fn test_url_command_rejects_relative_base() {
    weblinks()
        .args(["url", "example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid base URL"));
}

#[test]
fn test_url_check_is_skipped_offline() {
    weblinks()
        .args(["--offline", "-q", "url", "https://unreachable.invalid", "--check"])
        .assert()
        .success()
        .stdout("https://unreachable.invalid\n");
}

#[test]
fn test_offline_env_accepts_numeric_flag() {
    for value in ["1", "yes", "on"] {
        weblinks()
            .env("WEBLINKS_OFFLINE", value)
            .args(["-q", "url", "https://unreachable.invalid", "--check"])
            .assert()
            .success()
            .stdout("https://unreachable.invalid\n");
    }
}

#[tokio::test]
async fn test_url_check_fails_for_unreachable_url() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("HEAD"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let base = server.uri();
    tokio::task::spawn_blocking(move || {
        weblinks()
            .args(["-q", "url", &base, "--path", "gone", "--check"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("not reachable"));
    })
    .await
    .unwrap();
}

#[test]
fn test_doi_command_rejects_invalid_doi() {
    weblinks()
        .args(["doi", "not-a-doi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a DOI"));
}

#[tokio::test]
async fn test_doi_command_prints_bibtex() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/10.1000/xyz.1"))
        .and(header("Accept", "application/x-bibtex"))
        .respond_with(ResponseTemplate::new(200).set_body_string("@article{Doe_2021}\n"))
        .mount(&server)
        .await;

    let resolver = server.uri();
    tokio::task::spawn_blocking(move || {
        weblinks()
            .env("WEBLINKS_DOI_RESOLVER", resolver)
            .args(["-q", "doi", "10.1000/xyz.1", "--format", "bibtex"])
            .assert()
            .success()
            .stdout("@article{Doe_2021}\n");
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_read_timeout_env_is_honored_and_flag_overrides_it() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/10.1000/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("@article{Slow_2021}")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let resolver = server.uri();
    tokio::task::spawn_blocking(move || {
        weblinks()
            .env("WEBLINKS_DOI_RESOLVER", &resolver)
            .env("WEBLINKS_READ_TIMEOUT_SECS", "1")
            .args(["-q", "doi", "10.1000/slow", "--format", "bibtex"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("timeout"));

        weblinks()
            .env("WEBLINKS_DOI_RESOLVER", &resolver)
            .env("WEBLINKS_READ_TIMEOUT_SECS", "1")
            .args(["-q", "--read-timeout", "20", "doi", "10.1000/slow", "--format", "bibtex"])
            .assert()
            .success()
            .stdout("@article{Slow_2021}\n");
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn test_github_labels_command_lists_names() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/repos/octo/hello/labels"))
        .and(header("Authorization", "Bearer t0ken"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"name": "bug"}, {"name": "docs"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let api = server.uri();
    tokio::task::spawn_blocking(move || {
        weblinks()
            .env("GITHUB_API_URL", api)
            .env("GITHUB_TOKEN", "t0ken")
            .args(["-q", "github", "labels", "octo/hello"])
            .assert()
            .success()
            .stdout("bug\ndocs\n");
    })
    .await
    .unwrap();
}

#[test]
fn test_github_command_rejects_bad_repo_argument() {
    weblinks()
        .args(["github", "tags", "just-owner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("OWNER/REPO"));
}
