//! Series loader: remote CSV first, cache file as fallback.
//!
//! Remote failures of any kind (transport error, timeout, non-2xx, HTML or other
//! non-CSV body, unparseable or empty content) are logged and swallowed. Only the
//! cache read can fail the run.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use crate::domain::LoadConfig;
use crate::error::AppError;
use crate::io::cache::write_observations_csv;
use crate::io::ingest::{CleanOptions, IngestedData, parse_observations, read_observations_csv};

/// FAOSTAT food price resources exposed through the HDX proxy.
///
/// HDX changes these paths from time to time; the cache keeps the tool usable.
pub const DEFAULT_SOURCE_URLS: &[&str] = &[
    "https://proxy.hxlstandard.org/data/download?url=https%3A%2F%2Ffenixservices.fao.org%2Ffaostat%%2Fapi%2Fv1%2Fen%2FFBS%2F",
];

pub const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimum comma count for an untyped body to be treated as CSV.
const MIN_CSV_COMMAS: usize = 5;

/// Raw HTTP response, reduced to what the fallback rule needs.
#[derive(Debug, Clone)]
pub struct RemoteResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

/// Something that can GET a URL. Errors are plain messages; they are never fatal.
pub trait RemoteSource {
    fn get(&self, url: &str) -> Result<RemoteResponse, String>;
}

/// Blocking HTTP transport with a fixed timeout.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("heat/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::runtime(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl RemoteSource for HttpSource {
    fn get(&self, url: &str) -> Result<RemoteResponse, String> {
        let resp = self.client.get(url).send().map_err(|e| e.to_string())?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = resp.text().map_err(|e| e.to_string())?;
        Ok(RemoteResponse {
            status,
            content_type,
            body,
        })
    }
}

/// Where the loaded observations came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    Remote { url: String },
    Cache { path: PathBuf },
}

impl fmt::Display for LoadOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOrigin::Remote { url } => write!(f, "remote: {url}"),
            LoadOrigin::Cache { path } => write!(f, "cache: {}", path.display()),
        }
    }
}

/// Loader output.
#[derive(Debug, Clone)]
pub struct LoadedSeries {
    pub data: IngestedData,
    pub origin: LoadOrigin,
}

/// Load observations, trying each remote URL before the cache file.
///
/// `remote = None` (or `config.offline`) goes straight to the cache.
pub fn load_series(config: &LoadConfig, remote: Option<&dyn RemoteSource>) -> Result<LoadedSeries, AppError> {
    let options = CleanOptions {
        country: config.country.clone(),
    };

    if let Some(remote) = remote.filter(|_| !config.offline) {
        for url in &config.source_urls {
            match fetch_remote(remote, url, &options) {
                Ok(data) => {
                    info!(%url, observations = data.observations.len(), "loaded CPI series from remote");
                    if config.refresh_cache {
                        // A failed write-back must not discard good remote data.
                        if let Err(e) = write_observations_csv(&config.cache_path, &data.observations) {
                            warn!("cache refresh failed: {e}");
                        }
                    }
                    return Ok(LoadedSeries {
                        data,
                        origin: LoadOrigin::Remote { url: url.clone() },
                    });
                }
                Err(reason) => warn!(%url, "remote fetch failed, falling back: {reason}"),
            }
        }
    }

    let data = read_observations_csv(&config.cache_path, &options)?;
    info!(
        path = %config.cache_path.display(),
        observations = data.observations.len(),
        "loaded CPI series from cache"
    );
    Ok(LoadedSeries {
        data,
        origin: LoadOrigin::Cache {
            path: config.cache_path.clone(),
        },
    })
}

fn fetch_remote(remote: &dyn RemoteSource, url: &str, options: &CleanOptions) -> Result<IngestedData, String> {
    debug!(%url, "fetching remote CPI series");
    let resp = remote.get(url)?;

    if !(200..300).contains(&resp.status) {
        return Err(format!("HTTP status {}", resp.status));
    }
    if !looks_like_csv(&resp) {
        return Err("response body does not look like CSV".to_string());
    }

    let data = parse_observations(resp.body.as_bytes(), options).map_err(|e| e.to_string())?;
    if data.observations.is_empty() {
        return Err("remote CSV had no usable rows".to_string());
    }
    Ok(data)
}

/// CSV content type, or an untyped body with enough commas; never markup.
pub(crate) fn looks_like_csv(resp: &RemoteResponse) -> bool {
    if resp.body.trim_start().starts_with('<') {
        return false;
    }
    let typed_csv = resp
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("csv"));
    typed_csv || resp.body.matches(',').count() > MIN_CSV_COMMAS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::Path;

    const CACHE_CSV: &str = "\
Area,Indicator,Date,Value
Saudi Arabia,Food CPI,2024-01-01,100.0
Saudi Arabia,General CPI,2024-01-01,99.0
Saudi Arabia,Food CPI,2024-02-01,101.0
Saudi Arabia,General CPI,2024-02-01,99.1
";

    struct StubSource {
        response: Result<RemoteResponse, String>,
        calls: RefCell<Vec<String>>,
    }

    impl StubSource {
        fn new(response: Result<RemoteResponse, String>) -> Self {
            Self {
                response,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl RemoteSource for StubSource {
        fn get(&self, url: &str) -> Result<RemoteResponse, String> {
            self.calls.borrow_mut().push(url.to_string());
            self.response.clone()
        }
    }

    fn ok(content_type: Option<&str>, body: &str) -> Result<RemoteResponse, String> {
        Ok(RemoteResponse {
            status: 200,
            content_type: content_type.map(str::to_string),
            body: body.to_string(),
        })
    }

    fn config(cache_path: &Path) -> LoadConfig {
        LoadConfig {
            cache_path: cache_path.to_path_buf(),
            source_urls: vec!["https://example.invalid/a.csv".to_string()],
            country: Some("Saudi".to_string()),
            offline: false,
            refresh_cache: false,
        }
    }

    fn cache_file() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.csv");
        std::fs::write(&path, CACHE_CSV).unwrap();
        (dir, path)
    }

    #[test]
    fn html_body_falls_back_to_cache_unchanged() {
        let (_dir, path) = cache_file();
        let cfg = config(&path);
        let html = "<!DOCTYPE html><html><body>a, b, c, d, e, f, g, h</body></html>";
        let stub = StubSource::new(ok(Some("text/html; charset=utf-8"), html));

        let loaded = load_series(&cfg, Some(&stub)).unwrap();
        let direct = read_observations_csv(&path, &CleanOptions {
            country: cfg.country.clone(),
        })
        .unwrap();

        assert_eq!(loaded.origin, LoadOrigin::Cache { path: path.clone() });
        assert_eq!(loaded.data, direct);
        assert_eq!(stub.calls.borrow().len(), 1);
    }

    #[test]
    fn transport_error_and_bad_status_fall_back() {
        let (_dir, path) = cache_file();
        let cfg = config(&path);

        let failing = StubSource::new(Err("operation timed out".to_string()));
        assert!(matches!(load_series(&cfg, Some(&failing)).unwrap().origin, LoadOrigin::Cache { .. }));

        let not_found = StubSource::new(Ok(RemoteResponse {
            status: 404,
            content_type: Some("text/csv".to_string()),
            body: CACHE_CSV.to_string(),
        }));
        assert!(matches!(load_series(&cfg, Some(&not_found)).unwrap().origin, LoadOrigin::Cache { .. }));
    }

    #[test]
    fn csv_without_date_column_falls_back() {
        let (_dir, path) = cache_file();
        let body = "Area,Indicator,Value\nSaudi Arabia,Food CPI,1\nSaudi Arabia,Food CPI,2\n";
        let stub = StubSource::new(ok(Some("text/csv"), body));
        let loaded = load_series(&config(&path), Some(&stub)).unwrap();
        assert!(matches!(loaded.origin, LoadOrigin::Cache { .. }));
    }

    #[test]
    fn good_remote_csv_wins_and_can_refresh_cache() {
        let (_dir, path) = cache_file();
        let mut cfg = config(&path);
        cfg.refresh_cache = true;
        let body = "area,indicator,date,value\nSaudi Arabia,Food CPI,2025-05-01,130.5\n";
        let stub = StubSource::new(ok(Some("text/csv"), body));

        let loaded = load_series(&cfg, Some(&stub)).unwrap();
        assert!(matches!(loaded.origin, LoadOrigin::Remote { .. }));
        assert_eq!(loaded.data.observations.len(), 1);

        let cached = read_observations_csv(&path, &CleanOptions::default()).unwrap();
        assert_eq!(cached.observations, loaded.data.observations);
    }

    #[test]
    fn refreshed_cache_without_area_reloads_offline() {
        let (_dir, path) = cache_file();
        let mut cfg = config(&path);
        cfg.refresh_cache = true;
        let body = "Date,Indicator,Value\n2025-01-01,Food CPI,120.0\n2025-02-01,Food CPI,121.5\n";
        let stub = StubSource::new(ok(Some("text/csv"), body));

        let remote = load_series(&cfg, Some(&stub)).unwrap();
        assert!(matches!(remote.origin, LoadOrigin::Remote { .. }));

        cfg.offline = true;
        cfg.refresh_cache = false;
        let cached = load_series(&cfg, None).unwrap();
        assert!(matches!(cached.origin, LoadOrigin::Cache { .. }));
        assert_eq!(cached.data.observations.len(), 2);
        assert_eq!(cached.data.observations, remote.data.observations);
    }

    #[test]
    fn offline_skips_remote() {
        let (_dir, path) = cache_file();
        let mut cfg = config(&path);
        cfg.offline = true;
        let stub = StubSource::new(Err("should not be called".to_string()));

        let loaded = load_series(&cfg, Some(&stub)).unwrap();
        assert!(matches!(loaded.origin, LoadOrigin::Cache { .. }));
        assert!(stub.calls.borrow().is_empty());
    }

    #[test]
    fn unreadable_cache_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = config(&dir.path().join("missing.csv"));
        let stub = StubSource::new(Err("down".to_string()));
        let err = load_series(&cfg, Some(&stub)).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT);
    }

    #[test]
    fn csv_sniffing() {
        let untyped = |body: &str| RemoteResponse {
            status: 200,
            content_type: None,
            body: body.to_string(),
        };
        assert!(looks_like_csv(&untyped("a,b,c\n1,2,3\n4,5,6\n")));
        assert!(!looks_like_csv(&untyped("a,b\n1,2\n")));
        assert!(!looks_like_csv(&untyped("  <html>,,,,,,,,</html>")));
        assert!(looks_like_csv(&RemoteResponse {
            content_type: Some("Text/CSV".to_string()),
            ..untyped("Date,Value\n")
        }));
    }
}
