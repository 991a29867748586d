//! End-to-end tests for name resolution, renaming and the OMDb client.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use movie_rename::movie_name::{
    LookupResult, MovieLookup, MovieRename, MovieRenameConfig, NOISE_TOKENS, NameResolver, OmdbClient, Resolution,
    strip_noise,
};

/// Lookup with fixed years per title.
#[derive(Debug, Default)]
struct FakeLookup {
    years: HashMap<String, String>,
    queries: Mutex<Vec<String>>,
}

impl FakeLookup {
    fn with_year(title: &str, year: &str) -> Self {
        Self {
            years: HashMap::from([(title.to_string(), year.to_string())]),
            ..Default::default()
        }
    }
}

impl MovieLookup for FakeLookup {
    async fn lookup(&self, title: &str) -> Result<LookupResult> {
        self.queries.lock().unwrap().push(title.to_string());
        Ok(self.years.get(title).map_or_else(
            || LookupResult::not_found("Movie not found!"),
            |year| LookupResult::Found { year: year.clone() },
        ))
    }
}

fn test_config(dryrun: bool) -> MovieRenameConfig {
    let mut config = MovieRenameConfig::new("key");
    config.dryrun = dryrun;
    config.skip_confirmation = true;
    config
}

fn dir_names(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}

/// Serve a single HTTP response and return the request line that was received.
async fn serve_once(status: &'static str, body: &'static str) -> (String, tokio::task::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buffer = vec![0_u8; 4096];
        let read = socket.read(&mut buffer).await.unwrap();
        let request = String::from_utf8_lossy(&buffer[..read]).to_string();
        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.unwrap();
        request.lines().next().unwrap_or_default().to_string()
    });
    (address, handle)
}

#[tokio::test]
async fn all_bracket_styles_resolve_to_parentheses() {
    let config = test_config(true);
    let lookup = FakeLookup::default();
    let resolver = NameResolver::new(&config, &lookup);

    for name in ["Some Title (1999)", "Some Title {1999}", "Some Title [1999]"] {
        let resolution = resolver.resolve(name).await.unwrap();
        assert_eq!(resolution.name(), "Some Title (1999)", "input: {name}");
    }
    assert!(lookup.queries.lock().unwrap().is_empty());
}

#[tokio::test]
async fn resolution_tag_is_not_a_year() {
    let config = test_config(true);
    let lookup = FakeLookup::default();
    let resolver = NameResolver::new(&config, &lookup);

    let resolution = resolver.resolve("Movie.Title.1080p.BluRay").await.unwrap();
    assert!(matches!(resolution, Resolution::Fallback { .. }));
    assert_eq!(resolution.name(), "Movie Title");
    assert!(!resolution.name().contains("1080"));
}

#[tokio::test]
async fn matrix_release_name() {
    let config = test_config(true);
    let lookup = FakeLookup::default();
    let resolver = NameResolver::new(&config, &lookup);

    let resolution = resolver.resolve("The.Matrix.1999.1080p.BluRay.x264").await.unwrap();
    assert_eq!(resolution.name(), "The Matrix (1999)");
}

#[tokio::test]
async fn lookup_year_is_appended() {
    let config = test_config(true);
    let lookup = FakeLookup::with_year("Some Movie", "2010");
    let resolver = NameResolver::new(&config, &lookup);

    let resolution = resolver.resolve("some_movie_bluray_x264").await.unwrap();
    assert_eq!(resolution.name(), "Some Movie (2010)");
}

#[tokio::test]
async fn failed_lookup_keeps_title_and_run_continues() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["some_movie_bluray_x264", "The.Matrix.1999.1080p.BluRay.x264"] {
        fs::create_dir(temp_dir.path().join(name)).unwrap();
    }

    let renamer = MovieRename::new(temp_dir.path().to_path_buf(), test_config(false), FakeLookup::default());
    let count = renamer.run().await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(dir_names(temp_dir.path()), vec!["Some Movie", "The Matrix (1999)"]);
}

#[tokio::test]
async fn dryrun_never_renames() {
    let temp_dir = TempDir::new().unwrap();
    let names = [
        "The.Matrix.1999.1080p.BluRay.x264",
        "some_movie_bluray_x264",
        "Heat (1995)",
        "Alien [1979]",
    ];
    for name in names {
        fs::create_dir(temp_dir.path().join(name)).unwrap();
    }
    let before = dir_names(temp_dir.path());

    let lookup = FakeLookup::with_year("Some Movie", "2010");
    let renamer = MovieRename::new(temp_dir.path().to_path_buf(), test_config(true), lookup);
    let count = renamer.run().await.unwrap();

    assert_eq!(count, 3);
    assert_eq!(dir_names(temp_dir.path()), before);
}

#[tokio::test]
async fn noop_entries_are_never_renamed() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("Heat (1995)")).unwrap();

    let mut config = test_config(false);
    config.noop = true;
    let renamer = MovieRename::new(temp_dir.path().to_path_buf(), config, FakeLookup::default());

    assert_eq!(renamer.run().await.unwrap(), 0);
    assert_eq!(dir_names(temp_dir.path()), vec!["Heat (1995)"]);
}

#[test]
fn noise_stripping_is_idempotent() {
    let names = [
        "the matrix 1999 1080p bluray x264",
        "some movie unrated multi dvdrip ac3",
        "movie proper repacked xvid",
        "bestdivxnedivx",
        "xxvidvid",
    ];
    for name in names {
        let once = strip_noise(name, &NOISE_TOKENS);
        assert_eq!(strip_noise(&once, &NOISE_TOKENS), once, "input: {name}");
    }
}

#[tokio::test]
async fn omdb_client_returns_year() {
    let (address, handle) = serve_once("200 OK", r#"{"Title":"Some Movie","Year":"2010","Response":"True"}"#).await;
    let mut config = test_config(true);
    config.api_url = address;
    config.api_key = "secret".to_string();
    let client = OmdbClient::new(&config).unwrap();

    let result = client.lookup("Some Movie").await.unwrap();
    assert_eq!(
        result,
        LookupResult::Found {
            year: "2010".to_string()
        }
    );

    let request_line = handle.await.unwrap();
    assert!(request_line.starts_with("GET /?"), "request: {request_line}");
    assert!(request_line.contains("apikey=secret"), "request: {request_line}");
    assert!(request_line.contains("t=Some+Movie"), "request: {request_line}");
}

#[tokio::test]
async fn omdb_client_reports_not_found() {
    let (address, handle) = serve_once("200 OK", r#"{"Response":"False","Error":"Movie not found!"}"#).await;
    let mut config = test_config(true);
    config.api_url = address;
    let client = OmdbClient::new(&config).unwrap();

    let result = client.lookup("Nothing Like This").await.unwrap();
    assert_eq!(result, LookupResult::not_found("Movie not found!"));
    handle.await.unwrap();
}

#[tokio::test]
async fn omdb_client_reads_error_body_from_failed_status() {
    let (address, handle) = serve_once("401 Unauthorized", r#"{"Response":"False","Error":"Invalid API key!"}"#).await;
    let mut config = test_config(true);
    config.api_url = address;
    let client = OmdbClient::new(&config).unwrap();

    let result = client.lookup("Some Movie").await.unwrap();
    assert_eq!(result, LookupResult::not_found("Invalid API key!"));
    handle.await.unwrap();
}

#[tokio::test]
async fn omdb_client_malformed_body_is_an_error() {
    let (address, handle) = serve_once("200 OK", "<html>not json</html>").await;
    let mut config = test_config(true);
    config.api_url = address;
    let client = OmdbClient::new(&config).unwrap();

    assert!(client.lookup("Some Movie").await.is_err());
    handle.await.unwrap();
}

#[tokio::test]
async fn omdb_client_timeout_degrades_to_not_found() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = format!("http://{}", listener.local_addr().unwrap());
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let mut config = test_config(true);
    config.api_url = address;
    config.timeout = Duration::from_secs(1);
    let client = OmdbClient::new(&config).unwrap();

    let result = client.lookup("Some Movie").await.unwrap();
    assert!(matches!(result, LookupResult::NotFound { .. }));
    server.abort();
}
