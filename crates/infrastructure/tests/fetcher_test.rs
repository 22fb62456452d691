use axum::http::StatusCode;
use listwarden_application::ports::{FetchOutcome, FetchRequest, FilterContentStore, FilterFetcher};
use listwarden_domain::{DomainError, FilterId};
use listwarden_infrastructure::filters::{DiskFilterContentStore, FilterDirectory, HttpFilterFetcher};
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

mod helpers;
use helpers::MockListServer;

const LIST: &str = "! Title: Local Test List\n! Expires: 1 day\n||ads.example^\n||tracker.example^\n\n0.0.0.0 banner.example\n";

struct Fixture {
    _data: TempDir,
    directory: FilterDirectory,
    fetcher: HttpFilterFetcher,
    server: MockListServer,
}

async fn fixture() -> Fixture {
    let data = tempfile::tempdir().unwrap();
    let directory = FilterDirectory::new(data.path());
    directory.ensure_exists().await.unwrap();
    let fetcher = HttpFilterFetcher::new(directory.clone(), Duration::from_secs(5)).unwrap();
    let server = MockListServer::start().await;
    Fixture {
        _data: data,
        directory,
        fetcher,
        server,
    }
}

fn request(id: FilterId, url: String, checksum: Option<u32>) -> FetchRequest {
    FetchRequest {
        id,
        url: url.into(),
        name: "".into(),
        checksum,
    }
}

fn leftover_temp_files(directory: &FilterDirectory) -> usize {
    std::fs::read_dir(directory.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".fetch-"))
        .count()
}

// ============================================================================
// Successful downloads
// ============================================================================

#[tokio::test]
async fn test_new_content_is_promoted_to_content_path() {
    let f = fixture().await;
    f.server.set("/list.txt", LIST).await;

    let outcome = f
        .fetcher
        .fetch(&request(7, f.server.url("/list.txt"), None))
        .await
        .unwrap();

    let FetchOutcome::Changed(stats) = outcome else {
        panic!("expected changed content");
    };
    assert_eq!(stats.rule_count, 3);
    assert_eq!(stats.title.as_deref(), Some("Local Test List"));
    assert_eq!(stats.checksum, crc32fast::hash(LIST.as_bytes()));
    assert_eq!(std::fs::read_to_string(f.directory.content_path(7)).unwrap(), LIST);
    assert_eq!(leftover_temp_files(&f.directory), 0);
}

#[tokio::test]
async fn test_loaded_stats_match_downloaded_stats() {
    let f = fixture().await;
    f.server.set("/list.txt", LIST).await;
    let store = DiskFilterContentStore::new(f.directory.clone());

    let FetchOutcome::Changed(downloaded) = f
        .fetcher
        .fetch(&request(7, f.server.url("/list.txt"), None))
        .await
        .unwrap()
    else {
        panic!("expected changed content");
    };
    let loaded = store.load(7).await.unwrap();

    assert_eq!(loaded.stats.checksum, downloaded.checksum);
    assert_eq!(loaded.stats.rule_count, downloaded.rule_count);
    assert!(loaded.modified.is_some());
}

#[tokio::test]
async fn test_identical_content_is_unchanged_and_touches_file() {
    let f = fixture().await;
    f.server.set("/list.txt", LIST).await;
    f.fetcher
        .fetch(&request(7, f.server.url("/list.txt"), None))
        .await
        .unwrap();
    let path = f.directory.content_path(7);
    let old = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
    std::fs::File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(old)
        .unwrap();

    let outcome = f
        .fetcher
        .fetch(&request(7, f.server.url("/list.txt"), Some(crc32fast::hash(LIST.as_bytes()))))
        .await
        .unwrap();

    assert_eq!(outcome, FetchOutcome::Unchanged);
    let modified = std::fs::metadata(&path).unwrap().modified().unwrap();
    assert!(modified > old);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), LIST);
    assert_eq!(leftover_temp_files(&f.directory), 0);
}

#[tokio::test]
async fn test_html_after_sniff_window_is_accepted() {
    let f = fixture().await;
    let mut body = "||rule.example^\n".repeat(300);
    body.push_str("<html>\n");
    f.server.set("/long.txt", body.clone()).await;

    let outcome = f
        .fetcher
        .fetch(&request(3, f.server.url("/long.txt"), None))
        .await
        .unwrap();

    let FetchOutcome::Changed(stats) = outcome else {
        panic!("expected changed content");
    };
    assert_eq!(stats.rule_count, 301);
}

#[tokio::test]
async fn test_empty_body_replaces_content_of_previous_url() {
    let f = fixture().await;
    std::fs::write(f.directory.content_path(7), "||old-url-rule.example^\n").unwrap();
    f.server.set("/empty.txt", "").await;

    let outcome = f
        .fetcher
        .fetch(&request(7, f.server.url("/empty.txt"), None))
        .await
        .unwrap();

    let FetchOutcome::Changed(stats) = outcome else {
        panic!("expected changed content");
    };
    assert_eq!(stats.rule_count, 0);
    assert_eq!(stats.checksum, 0);
    assert_eq!(std::fs::read_to_string(f.directory.content_path(7)).unwrap(), "");
}

#[tokio::test]
async fn test_empty_body_creates_content_file_for_new_filter() {
    let f = fixture().await;
    f.server.set("/empty.txt", "").await;

    let outcome = f
        .fetcher
        .fetch(&request(8, f.server.url("/empty.txt"), None))
        .await
        .unwrap();

    assert!(outcome.is_changed());
    assert!(f.directory.content_path(8).exists());
    assert_eq!(leftover_temp_files(&f.directory), 0);
}

// ============================================================================
// Rejections keep the old file
// ============================================================================

async fn assert_rejected_keeps_old(path: &str, status: StatusCode, body: &[u8], expected: DomainError) {
    let f = fixture().await;
    std::fs::write(f.directory.content_path(9), "||old.example^\n").unwrap();
    f.server.set_status(path, status, body.to_vec()).await;

    let result = f.fetcher.fetch(&request(9, f.server.url(path), Some(1234))).await;

    assert_eq!(result, Err(expected));
    assert_eq!(
        std::fs::read_to_string(f.directory.content_path(9)).unwrap(),
        "||old.example^\n"
    );
    assert_eq!(leftover_temp_files(&f.directory), 0);
}

#[tokio::test]
async fn test_http_error_status_is_rejected() {
    assert_rejected_keeps_old("/gone.txt", StatusCode::NOT_FOUND, b"gone", DomainError::HttpStatus(404)).await;
}

#[tokio::test]
async fn test_non_200_success_status_is_rejected() {
    assert_rejected_keeps_old("/empty.txt", StatusCode::NO_CONTENT, b"", DomainError::HttpStatus(204)).await;
}

#[tokio::test]
async fn test_html_page_is_rejected() {
    assert_rejected_keeps_old(
        "/login",
        StatusCode::OK,
        b"<!DOCTYPE html>\n<html><body>Sign in</body></html>",
        DomainError::HtmlContent,
    )
    .await;
}

#[tokio::test]
async fn test_binary_body_is_rejected() {
    assert_rejected_keeps_old(
        "/list.gz",
        StatusCode::OK,
        &[0x1f, 0x8b, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00],
        DomainError::NonPrintableContent,
    )
    .await;
}

#[tokio::test]
async fn test_connection_dropped_mid_body_keeps_old_file() {
    let f = fixture().await;
    std::fs::write(f.directory.content_path(9), "||old.example^\n").unwrap();
    // Well past the sniff window, so validation has already passed.
    f.server
        .set_truncated("/cut.txt", "||rule.example^\n".repeat(600))
        .await;

    let result = f
        .fetcher
        .fetch(&request(9, f.server.url("/cut.txt"), Some(1234)))
        .await;

    assert!(matches!(result, Err(DomainError::FetchFailed(_))));
    assert_eq!(
        std::fs::read_to_string(f.directory.content_path(9)).unwrap(),
        "||old.example^\n"
    );
    assert_eq!(leftover_temp_files(&f.directory), 0);
}

#[tokio::test]
async fn test_unreachable_host_is_fetch_failure() {
    let f = fixture().await;
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let result = f
        .fetcher
        .fetch(&request(9, format!("http://{}/list.txt", addr), None))
        .await;

    assert!(matches!(result, Err(DomainError::FetchFailed(_))));
    assert!(!f.directory.content_path(9).exists());
    assert_eq!(leftover_temp_files(&f.directory), 0);
}
