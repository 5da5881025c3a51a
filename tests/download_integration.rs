//! Integration tests for the download helper.
//!
//! These tests verify the full download flow with mock HTTP servers.

mod support;

use support::socket_guard::{should_skip_socket_bound_test, start_mock_server_or_skip};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use weblinks::{
    DownloadError, DownloadOptions, HttpClient, HttpError, LinkConfig, Url, download_to_path,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> HttpClient {
    HttpClient::new(&LinkConfig::default()).expect("client should build")
}

async fn mount_file(server: &MockServer, file_path: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(file_path))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_download_full_flow_preserves_content() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    let content = b"This is the complete file content for testing.\nLine 2.\nLine 3.";
    mount_file(&server, "/document.pdf", content).await;
    let temp_dir = TempDir::new().expect("failed to create temp dir");
    let dest = temp_dir.path().join("document.pdf");

    let url = Url::parse(&server.uri()).unwrap().append_segment("document.pdf");
    let file = download_to_path(&client(), &url, &dest, DownloadOptions::default())
        .await
        .expect("download should succeed");

    assert_eq!(file.path, dest);
    assert_eq!(file.bytes, content.len() as u64);
    assert_eq!(std::fs::read(&dest).expect("should read file"), content);
}

#[tokio::test]
async fn test_download_creates_missing_parent_directories() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/data.bin", &[1, 2, 3]).await;
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("nested/deeper/data.bin");

    let url = Url::parse(&server.uri()).unwrap().append_segment("data.bin");
    download_to_path(&client(), &url, &dest, DownloadOptions::default())
        .await
        .unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), vec![1, 2, 3]);
}

#[tokio::test]
async fn test_download_without_create_dirs_fails_on_missing_parent() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    mount_file(&server, "/data.bin", &[1]).await;
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("missing/data.bin");

    let url = Url::parse(&server.uri()).unwrap().append_segment("data.bin");
    let err = download_to_path(
        &client(),
        &url,
        &dest,
        DownloadOptions {
            create_dirs: false,
            overwrite: false,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, DownloadError::Io { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_existing_file_is_kept_unless_overwrite() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/report.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("new"))
        .expect(1)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("report.txt");
    std::fs::write(&dest, "old").unwrap();
    let url = Url::parse(&server.uri()).unwrap().append_segment("report.txt");
    let http = client();

    let err = download_to_path(&http, &url, &dest, DownloadOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, DownloadError::AlreadyExists { .. }), "got {err:?}");
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "old");

    download_to_path(
        &http,
        &url,
        &dest,
        DownloadOptions {
            overwrite: true,
            ..DownloadOptions::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "new");
}

#[tokio::test]
async fn test_http_error_leaves_no_file() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("missing.pdf");

    let url = Url::parse(&server.uri()).unwrap().append_segment("missing.pdf");
    let err = download_to_path(&client(), &url, &dest, DownloadOptions::default())
        .await
        .unwrap_err();
    match err {
        DownloadError::Http(HttpError::Status { status, body, .. }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "not here");
        }
        other => panic!("expected Http status error, got {other:?}"),
    }
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_uninspectable_destination_fails_before_request() {
    let Some(server) = start_mock_server_or_skip().await else {
        return;
    };
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("unused"))
        .expect(0)
        .mount(&server)
        .await;
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("plain-file");
    std::fs::write(&blocker, "x").unwrap();
    let dest = blocker.join("child.txt");

    let url = Url::parse(&server.uri()).unwrap().append_segment("child.txt");
    let err = download_to_path(
        &client(),
        &url,
        &dest,
        DownloadOptions {
            create_dirs: false,
            overwrite: false,
        },
    )
    .await
    .unwrap_err();
    match err {
        DownloadError::Io { path, .. } => assert_eq!(path, dest),
        other => panic!("expected Io error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_truncated_body_leaves_partial_file() {
    if should_skip_socket_bound_test() {
        return;
    }
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0_u8; 2048];
        let _ = socket.read(&mut buf).await;
        socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 64\r\n\r\npartial")
            .await
            .unwrap();
        socket.shutdown().await.unwrap();
        let _ = socket.read(&mut buf).await;
    });

    let temp_dir = TempDir::new().unwrap();
    let dest = temp_dir.path().join("cut.bin");
    let url = Url::parse(&format!("http://{addr}/cut.bin")).unwrap();
    let err = download_to_path(&client(), &url, &dest, DownloadOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DownloadError::Http(_)), "got {err:?}");
    assert!(dest.exists(), "partial file should stay on disk");
}
