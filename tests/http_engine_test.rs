//! Tests for the HTTP engine against a local data pool

use modis_download::config::ResolvedConfig;
use modis_download::credentials::Credentials;
use modis_download::downloader::{resolve_date_window, DateWindow, HttpEngine, TransferEngine};
use modis_download::errors::AppError;
use modis_download::models::{ConnectionParams, DownloadJob, TileFilter};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const DAY_ONE_V04: &str = "PRODA.A2020001.h18v04.061.2020009000000.hdf";
const DAY_TWO_V04: &str = "PRODA.A2020002.h18v04.061.2020010000000.hdf";
const DAY_TWO_V04_XML: &str = "PRODA.A2020002.h18v04.061.2020010000000.hdf.xml";
const DAY_TWO_V05: &str = "PRODA.A2020002.h18v05.061.2020010000000.hdf";

/// Minimal HTTP/1.1 server answering GET requests from a fixed route table.
///
/// Unknown paths get a 404. Every requested path is recorded.
struct DataPool {
    base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl DataPool {
    async fn start(routes: HashMap<String, String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let routes = Arc::new(routes);
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                let log = log.clone();
                tokio::spawn(async move {
                    let mut buf = Vec::new();
                    let mut chunk = [0_u8; 1024];
                    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => buf.extend_from_slice(&chunk[..n]),
                        }
                    }
                    let request = String::from_utf8_lossy(&buf).into_owned();
                    let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    log.lock().unwrap().push(path.clone());

                    let response = match routes.get(&path) {
                        Some(body) => format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                            body.len()
                        ),
                        None => {
                            "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                                .to_string()
                        }
                    };
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });

        Self { base_url, requests }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

fn listing(links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|link| format!("<a href=\"{link}\">{link}</a>\n"))
        .collect();
    format!("<html><body>\n<a href=\"/POOL/\">Parent Directory</a>\n{anchors}</body></html>")
}

fn engine() -> HttpEngine {
    // The local pool must be reached directly, never through a proxy from the environment.
    for var in ["HTTP_PROXY", "http_proxy", "ALL_PROXY", "all_proxy"] {
        std::env::remove_var(var);
    }
    let config = ResolvedConfig {
        max_retries: 1,
        retry_initial_delay_ms: 1,
        retry_max_delay_ms: 1,
        request_timeout_secs: 10,
    };
    HttpEngine::new(&config).unwrap()
}

fn job(pool: &DataPool, window: DateWindow, tiles: TileFilter, destination: &Path) -> DownloadJob {
    DownloadJob {
        product_id: "A".to_string(),
        connection: ConnectionParams::new(&pool.base_url, "POOL/PRODA.061/"),
        window,
        tiles,
        credentials: Credentials::new("anonymous", "me@example.com"),
        destination: destination.to_path_buf(),
    }
}

#[tokio::test]
async fn test_downloads_window_days_newest_first_for_selected_tiles() {
    let mut routes = HashMap::new();
    routes.insert(
        "/POOL/PRODA.061/".to_string(),
        listing(&["2019.12.31/", "2020.01.01/", "2020.01.02/", "2020.01.03/"]),
    );
    routes.insert(
        "/POOL/PRODA.061/2020.01.01/".to_string(),
        listing(&[DAY_ONE_V04]),
    );
    routes.insert(
        "/POOL/PRODA.061/2020.01.02/".to_string(),
        listing(&[DAY_TWO_V04, DAY_TWO_V04_XML, DAY_TWO_V05]),
    );
    routes.insert(
        format!("/POOL/PRODA.061/2020.01.02/{DAY_TWO_V04}"),
        "day two".to_string(),
    );
    routes.insert(
        format!("/POOL/PRODA.061/2020.01.02/{DAY_TWO_V04_XML}"),
        "<meta/>".to_string(),
    );
    let pool = DataPool::start(routes).await;

    let dest = TempDir::new().unwrap();
    // Already downloaded by an earlier run; the pool does not serve it.
    fs::write(dest.path().join(DAY_ONE_V04), "already here").unwrap();

    let window = resolve_date_window(Some("2020-01-01"), Some("2020-01-02")).unwrap();
    let tiles = TileFilter::parse(Some("h18v04")).unwrap();
    let list_file = engine()
        .download(job(&pool, window, tiles, dest.path()))
        .await
        .unwrap();

    assert_eq!(list_file, dest.path().join("listfilePRODA.061.txt"));
    let listed: Vec<String> = fs::read_to_string(&list_file)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect();
    assert_eq!(
        listed,
        vec![
            dest.path().join(DAY_TWO_V04).display().to_string(),
            dest.path().join(DAY_ONE_V04).display().to_string(),
        ]
    );

    assert_eq!(fs::read_to_string(dest.path().join(DAY_TWO_V04)).unwrap(), "day two");
    assert!(dest.path().join(DAY_TWO_V04_XML).exists());
    assert!(!dest.path().join(DAY_TWO_V05).exists());
    assert_eq!(
        fs::read_to_string(dest.path().join(DAY_ONE_V04)).unwrap(),
        "already here"
    );

    let requests = pool.requests();
    assert!(!requests.iter().any(|p| p.contains("2019.12.31")));
    assert!(!requests.iter().any(|p| p.contains("2020.01.03")));
    assert!(!requests.iter().any(|p| p.contains("h18v05")));
    assert!(!requests.iter().any(|p| p.ends_with(DAY_ONE_V04)));
}

#[tokio::test]
async fn test_failed_file_still_writes_list_and_fails_product() {
    let mut routes = HashMap::new();
    routes.insert(
        "/POOL/PRODA.061/".to_string(),
        listing(&["2020.01.02/"]),
    );
    routes.insert(
        "/POOL/PRODA.061/2020.01.02/".to_string(),
        listing(&[DAY_TWO_V04, DAY_TWO_V05]),
    );
    // DAY_TWO_V05 is listed but answers 404
    routes.insert(
        format!("/POOL/PRODA.061/2020.01.02/{DAY_TWO_V04}"),
        "day two".to_string(),
    );
    let pool = DataPool::start(routes).await;

    let dest = TempDir::new().unwrap();
    let window = resolve_date_window(Some("2020-01-02"), Some("2020-01-02")).unwrap();
    let result = engine()
        .download(job(&pool, window, TileFilter::All, dest.path()))
        .await;

    match result {
        Err(AppError::NetworkError(msg)) => assert!(msg.contains(DAY_TWO_V05)),
        other => panic!("Expected NetworkError, got {other:?}"),
    }

    let list_file = dest.path().join("listfilePRODA.061.txt");
    let contents = fs::read_to_string(&list_file).unwrap();
    assert_eq!(contents.lines().count(), 1);
    assert!(contents.trim_end().ends_with(DAY_TWO_V04));
    assert!(dest.path().join(DAY_TWO_V04).exists());
    assert!(!dest.path().join(DAY_TWO_V05).exists());
    assert!(!dest.path().join(format!("{DAY_TWO_V05}.part")).exists());
}
