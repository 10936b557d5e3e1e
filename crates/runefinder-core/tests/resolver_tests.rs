//! Integration tests for fetch-on-demand resolution.
//!
//! A local axum server stands in for the Unicode Consortium and counts the
//! requests it receives.

use axum::{extract::State, http::StatusCode, routing::get, Router};
use runefinder_core::{ErrorCategory, ResolverConfig, RuneError, RuneFinder, SourceResolver};
use std::io::Read;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

const LINES_3D_TO_43: &str = "003D;EQUALS SIGN;Sm;0;ON;;;;;N;;;;;
003E;GREATER-THAN SIGN;Sm;0;ON;;;;;Y;;;;;
003F;QUESTION MARK;Po;0;ON;;;;;N;;;;;
0040;COMMERCIAL AT;Po;0;ON;;;;;N;;;;;
0041;LATIN CAPITAL LETTER A;Lu;0;L;;;;;N;;;;0061;
0042;LATIN CAPITAL LETTER B;Lu;0;L;;;;;N;;;;0062;
0043;LATIN CAPITAL LETTER C;Lu;0;L;;;;;N;;;;0063;
";

#[derive(Clone)]
struct Fixture {
    hits: Arc<AtomicUsize>,
}

async fn serve_ucd(State(fixture): State<Fixture>) -> &'static str {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    LINES_3D_TO_43
}

async fn serve_missing(State(fixture): State<Fixture>) -> (StatusCode, &'static str) {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    (StatusCode::NOT_FOUND, "no such file")
}

async fn serve_slowly(State(fixture): State<Fixture>) -> &'static str {
    fixture.hits.fetch_add(1, Ordering::SeqCst);
    tokio::time::sleep(Duration::from_secs(30)).await;
    LINES_3D_TO_43
}

/// Start the fixture server and return its address and request counter.
async fn start_fixture() -> (SocketAddr, Arc<AtomicUsize>) {
    let fixture = Fixture {
        hits: Arc::new(AtomicUsize::new(0)),
    };
    let hits = fixture.hits.clone();

    let app = Router::new()
        .route("/UnicodeData.txt", get(serve_ucd))
        .route("/missing.txt", get(serve_missing))
        .route("/slow.txt", get(serve_slowly))
        .with_state(fixture);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, hits)
}

fn config_for(temp_dir: &TempDir, addr: SocketAddr, route: &str) -> ResolverConfig {
    ResolverConfig::new(temp_dir.path().join("default").join("UnicodeData.txt"))
        .with_source_url(format!("http://{}/{}", addr, route))
        .with_fetch_timeout(Duration::from_secs(10))
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_fetches_missing_file_once() {
    let (addr, hits) = start_fixture().await;
    let temp_dir = TempDir::new().unwrap();
    let resolver = SourceResolver::new(config_for(&temp_dir, addr, "UnicodeData.txt")).unwrap();
    let path = temp_dir.path().join("TEST-UnicodeData.txt");

    let mut reader = resolver.resolve(Some(&path)).await.unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), LINES_3D_TO_43.as_bytes());
    let mut contents = String::new();
    reader.read_to_string(&mut contents).unwrap();
    assert_eq!(contents, LINES_3D_TO_43);
    drop(reader);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    // File now exists: no second download
    let _reader = resolver.resolve(Some(&path)).await.unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_resolve_creates_default_location() {
    let (addr, hits) = start_fixture().await;
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir, addr, "UnicodeData.txt");
    let default_path = config.default_path.clone();
    let resolver = SourceResolver::new(config).unwrap();

    resolver.resolve(None).await.unwrap();
    assert!(default_path.is_file());
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_http_error_is_resolve_error_and_leaves_no_file() {
    let (addr, hits) = start_fixture().await;
    let temp_dir = TempDir::new().unwrap();
    let resolver = SourceResolver::new(config_for(&temp_dir, addr, "missing.txt")).unwrap();
    let path = temp_dir.path().join("cache").join("UnicodeData.txt");

    let err = resolver.resolve(Some(&path)).await.unwrap_err();
    assert!(matches!(err, RuneError::DownloadFailed { .. }), "got {:?}", err);
    assert_eq!(err.category(), ErrorCategory::Resolve);
    assert_eq!(hits.load(Ordering::SeqCst), 1);

    assert!(!path.exists());
    let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
    assert_eq!(leftovers, 0, "temp file should be cleaned up");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_fetch_timeout() {
    let (addr, _hits) = start_fixture().await;
    let temp_dir = TempDir::new().unwrap();
    let config = config_for(&temp_dir, addr, "slow.txt").with_fetch_timeout(Duration::from_millis(300));
    let resolver = SourceResolver::new(config).unwrap();
    let path = temp_dir.path().join("UnicodeData.txt");

    let err = resolver.resolve(Some(&path)).await.unwrap_err();
    assert!(matches!(err, RuneError::Timeout(_)), "got {:?}", err);
    assert!(err.is_retryable());
    assert!(!path.exists());

    let leftovers: Vec<_> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert!(leftovers.is_empty(), "partial download left behind: {:?}", leftovers);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_resolves_see_complete_file() {
    let (addr, _hits) = start_fixture().await;
    let temp_dir = TempDir::new().unwrap();
    let resolver = SourceResolver::new(config_for(&temp_dir, addr, "UnicodeData.txt")).unwrap();
    let path = temp_dir.path().join("UnicodeData.txt");

    let mut tasks = Vec::new();
    for _ in 0..4 {
        let resolver = resolver.clone();
        let path = path.clone();
        tasks.push(tokio::spawn(async move {
            let mut reader = resolver.resolve(Some(&path)).await.unwrap();
            let mut contents = String::new();
            reader.read_to_string(&mut contents).unwrap();
            contents
        }));
    }

    for task in tasks {
        assert_eq!(task.await.unwrap(), LINES_3D_TO_43);
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn test_finder_searches_downloaded_database() {
    let (addr, hits) = start_fixture().await;
    let temp_dir = TempDir::new().unwrap();
    let finder = RuneFinder::new(config_for(&temp_dir, addr, "UnicodeData.txt")).unwrap();

    let results = finder.search("MARK").await.unwrap();
    assert_eq!(results.len(), 1);
    let entry = results.get("U+003F").unwrap();
    assert_eq!(entry.glyph, '?');
    assert_eq!(entry.name, "QUESTION MARK");

    let results = finder.search("capital latin").await.unwrap();
    let codepoints: Vec<u32> = results.sorted().iter().map(|e| e.codepoint).collect();
    assert_eq!(codepoints, vec![0x41, 0x42, 0x43]);

    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
