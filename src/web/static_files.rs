//! Example: Static file serving with an in-memory cache, plus upload,
//! download and directory listing endpoints.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, SystemTime};

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE, LAST_MODIFIED};
use hyper::{Method, Request, Response, StatusCode};
use path_clean::PathClean;
use percent_encoding::percent_decode_str;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::router::Router;
use super::server::{error_response, handler, header_str, json, query_params, response, text};
use crate::config::StaticFilesConfig;

// =============================================================================
// File cache
// =============================================================================

#[derive(Debug, Clone)]
struct CachedFile {
    data: Bytes,
    cached_at: SystemTime,
}

/// File contents keyed by path, stamped with the time they were cached.
#[derive(Debug, Default)]
pub struct FileCache {
    files: RwLock<HashMap<PathBuf, CachedFile>>,
}

impl FileCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, path: impl Into<PathBuf>, data: Bytes) {
        self.add_at(path, data, SystemTime::now());
    }

    fn add_at(&self, path: impl Into<PathBuf>, data: Bytes, cached_at: SystemTime) {
        self.files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.into(), CachedFile { data, cached_at });
    }

    pub fn get(&self, path: &Path) -> Option<Bytes> {
        self.files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
            .map(|f| f.data.clone())
    }

    /// True when `path` is not cached or was modified after it was cached.
    pub fn needs_refresh(&self, path: &Path, modified: SystemTime) -> bool {
        match self
            .files
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(path)
        {
            Some(cached) => modified > cached.cached_at,
            None => true,
        }
    }

    pub fn len(&self) -> usize {
        self.files.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "css" => Some("text/css"),
        "js" => Some("application/javascript"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

/// Formats `time` as an HTTP date, e.g. `Tue, 15 Nov 1994 08:12:31 GMT`.
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}

/// Joins `requested` under `root`, dropping any `..` that would climb above it.
pub fn resolve_under(root: &Path, requested: &str) -> PathBuf {
    let cleaned = Path::new("/").join(requested.trim_start_matches('/')).clean();
    let relative = cleaned.strip_prefix("/").unwrap_or(&cleaned);
    root.join(relative)
}

// =============================================================================
// Multipart
// =============================================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    #[error("missing multipart boundary")]
    MissingBoundary,
    #[error("malformed multipart body")]
    Malformed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub filename: Option<String>,
    pub data: Bytes,
}

pub fn boundary_from(content_type: &str) -> Option<&str> {
    let (mime, params) = content_type.split_once(';')?;
    if !mime.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }
    params.split(';').find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("boundary")
            .then(|| value.trim().trim_matches('"'))
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn disposition_param(header: &str, key: &str) -> Option<String> {
    header.split(';').find_map(|part| {
        let (k, v) = part.split_once('=')?;
        (k.trim() == key).then(|| v.trim().trim_matches('"').to_string())
    })
}

/// Splits a `multipart/form-data` body into its parts.
pub fn parse_multipart(body: &Bytes, boundary: &str) -> Result<Vec<Part>, MultipartError> {
    let delimiter = format!("--{boundary}");
    let delimiter = delimiter.as_bytes();
    let start = find(body, delimiter).ok_or(MultipartError::Malformed)?;
    let mut rest = body.slice(start + delimiter.len()..);
    let mut parts = Vec::new();

    loop {
        if rest.starts_with(b"--") {
            return Ok(parts);
        }
        let rest_body = rest.strip_prefix(b"\r\n").ok_or(MultipartError::Malformed)?;
        let offset = rest.len() - rest_body.len();
        rest = rest.slice(offset..);

        let header_end = find(&rest, b"\r\n\r\n").ok_or(MultipartError::Malformed)?;
        let headers = std::str::from_utf8(&rest[..header_end]).map_err(|_| MultipartError::Malformed)?;
        let disposition = headers
            .split("\r\n")
            .find_map(|line| {
                let (name, value) = line.split_once(':')?;
                name.trim()
                    .eq_ignore_ascii_case("content-disposition")
                    .then_some(value)
            })
            .ok_or(MultipartError::Malformed)?;

        let data_start = header_end + 4;
        let closing = [b"\r\n".as_slice(), delimiter].concat();
        let data_len = find(&rest[data_start..], &closing).ok_or(MultipartError::Malformed)?;

        parts.push(Part {
            name: disposition_param(disposition, "name").ok_or(MultipartError::Malformed)?,
            filename: disposition_param(disposition, "filename"),
            data: rest.slice(data_start..data_start + data_len),
        });
        rest = rest.slice(data_start + data_len + closing.len()..);
    }
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
    pub mod_time: DateTime<Utc>,
    pub is_dir: bool,
}

pub struct StaticFiles {
    static_dir: PathBuf,
    upload_dir: PathBuf,
    max_age: Duration,
    cache: FileCache,
}

impl StaticFiles {
    pub fn new(config: &StaticFilesConfig) -> Self {
        Self {
            static_dir: config.static_dir.clone(),
            upload_dir: config.upload_dir.clone(),
            max_age: Duration::from_secs(config.max_age_secs),
            cache: FileCache::new(),
        }
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Serves `/static/{path}` from the static directory.
    pub fn serve_static(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        let requested = req.uri().path().strip_prefix("/static/").unwrap_or("");
        let requested = percent_decode_str(requested).decode_utf8_lossy();
        let path = resolve_under(&self.static_dir, &requested);

        let modified = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => meta.modified().unwrap_or_else(|_| SystemTime::now()),
            _ => return error_response(StatusCode::NOT_FOUND, "File not found"),
        };

        let data = match self.cache.get(&path) {
            Some(data) if !self.cache.needs_refresh(&path, modified) => {
                debug!(path = %path.display(), "cache hit");
                data
            }
            _ => match fs::read(&path) {
                Ok(data) => {
                    let data = Bytes::from(data);
                    self.cache.add(&path, data.clone());
                    data
                }
                Err(err) => {
                    warn!(path = %path.display(), %err, "failed to read static file");
                    return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error reading file");
                }
            },
        };

        let mut resp = Response::new(Full::new(data));
        let headers = resp.headers_mut();
        if let Some(content_type) = content_type_for(&path) {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        if let Ok(value) = HeaderValue::from_str(&format!("public, max-age={}", self.max_age.as_secs())) {
            headers.insert(CACHE_CONTROL, value);
        }
        if let Ok(value) = HeaderValue::from_str(&http_date(modified)) {
            headers.insert(LAST_MODIFIED, value);
        }
        resp
    }

    pub fn upload(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        if req.method() != Method::POST {
            return error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed");
        }
        let parts = match boundary_from(header_str(req, "content-type"))
            .ok_or(MultipartError::MissingBoundary)
            .and_then(|boundary| parse_multipart(req.body(), boundary))
        {
            Ok(parts) => parts,
            Err(err) => {
                debug!(%err, "rejecting upload");
                return error_response(StatusCode::BAD_REQUEST, "Error parsing form");
            }
        };

        let file = parts.into_iter().find(|p| p.name == "file");
        let Some((filename, data)) = file.and_then(|p| {
            let filename = Path::new(p.filename.as_deref()?).file_name()?.to_str()?.to_string();
            Some((filename, p.data))
        }) else {
            return error_response(StatusCode::BAD_REQUEST, "Error getting file");
        };

        if let Err(err) = fs::create_dir_all(&self.upload_dir) {
            warn!(%err, "failed to create upload directory");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error creating directory");
        }
        if let Err(err) = fs::write(self.upload_dir.join(&filename), &data) {
            warn!(%err, "failed to store upload");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error creating file");
        }

        info!(%filename, bytes = data.len(), "file uploaded");
        text(StatusCode::OK, format!("File uploaded successfully: {filename}"))
    }

    pub fn download(&self, req: &Request<Bytes>) -> Response<Full<Bytes>> {
        let params = query_params(req);
        let Some(filename) = params.get("file").filter(|f| !f.is_empty()) else {
            return error_response(StatusCode::BAD_REQUEST, "No file specified");
        };

        let path = resolve_under(&self.upload_dir, filename);
        let data = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => fs::read(&path),
            _ => return error_response(StatusCode::NOT_FOUND, "File not found"),
        };
        let data = match data {
            Ok(data) => data,
            Err(_) => return error_response(StatusCode::NOT_FOUND, "File not found"),
        };

        let length = data.len();
        let mut resp = response(StatusCode::OK, "application/octet-stream", data);
        if let Ok(value) = HeaderValue::from_str(&format!("attachment; filename={filename}")) {
            resp.headers_mut().insert(CONTENT_DISPOSITION, value);
        }
        resp.headers_mut().insert(CONTENT_LENGTH, HeaderValue::from(length));
        resp
    }

    pub fn list_files(&self) -> std::io::Result<Vec<FileInfo>> {
        let mut files: Vec<FileInfo> = fs::read_dir(&self.upload_dir)?
            .filter_map(|entry| {
                let entry = entry.ok()?;
                let meta = entry.metadata().ok()?;
                Some(FileInfo {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    size: meta.len(),
                    mod_time: meta.modified().ok()?.into(),
                    is_dir: meta.is_dir(),
                })
            })
            .collect();
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    pub fn files(&self) -> Response<Full<Bytes>> {
        match self.list_files() {
            Ok(files) => json(StatusCode::OK, &files),
            Err(err) => {
                warn!(%err, "failed to list uploads");
                error_response(StatusCode::INTERNAL_SERVER_ERROR, "Error reading directory")
            }
        }
    }
}

pub fn router(files: Arc<StaticFiles>) -> Router {
    let serve = Arc::clone(&files);
    let upload = Arc::clone(&files);
    let download = Arc::clone(&files);
    Router::new()
        .route("/static/", handler(move |req| serve.serve_static(&req)))
        .route("/upload", handler(move |req| upload.upload(&req)))
        .route("/download", handler(move |req| download.download(&req)))
        .route("/files", handler(move |_| files.files()))
}

#[cfg(test)]
mod static_files_tests {
    use super::*;
    use http_body_util::BodyExt;
    use tempfile::TempDir;

    struct Fixture {
        _dir: TempDir,
        files: StaticFiles,
        static_dir: PathBuf,
        upload_dir: PathBuf,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let static_dir = dir.path().join("static");
        let upload_dir = dir.path().join("uploads");
        fs::create_dir_all(&static_dir).unwrap();
        fs::create_dir_all(&upload_dir).unwrap();
        let config = StaticFilesConfig {
            static_dir: static_dir.clone(),
            upload_dir: upload_dir.clone(),
            max_age_secs: 3600,
            max_upload_bytes: 10 << 20,
        };
        Fixture {
            _dir: dir,
            files: StaticFiles::new(&config),
            static_dir,
            upload_dir,
        }
    }

    fn request(method: Method, uri: &str) -> Request<Bytes> {
        Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap()
    }

    async fn body(resp: Response<Full<Bytes>>) -> Vec<u8> {
        resp.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    fn multipart_request(boundary: &str, body: &str) -> Request<Bytes> {
        Request::builder()
            .method(Method::POST)
            .uri("/upload")
            .header("Content-Type", format!("multipart/form-data; boundary={boundary}"))
            .body(Bytes::from(body.replace('\n', "\r\n")))
            .unwrap()
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for(Path::new("a.css")), Some("text/css"));
        assert_eq!(content_type_for(Path::new("a.js")), Some("application/javascript"));
        assert_eq!(content_type_for(Path::new("a.JPEG")), Some("image/jpeg"));
        assert_eq!(content_type_for(Path::new("a.svg")), Some("image/svg+xml"));
        assert_eq!(content_type_for(Path::new("a.txt")), None);
        assert_eq!(content_type_for(Path::new("README")), None);
    }

    #[test]
    fn test_resolve_stays_under_root() {
        let root = Path::new("/srv/static");
        assert_eq!(resolve_under(root, "css/site.css"), root.join("css/site.css"));
        assert_eq!(resolve_under(root, "../../etc/passwd"), root.join("etc/passwd"));
        assert_eq!(resolve_under(root, "a/../../b"), root.join("b"));
    }

    #[test]
    fn test_cache_refresh() {
        let cache = FileCache::new();
        let path = Path::new("static/a.css");
        assert!(cache.needs_refresh(path, SystemTime::now()));

        let cached_at = SystemTime::now();
        cache.add_at(path, Bytes::from_static(b"body{}"), cached_at);
        assert_eq!(cache.get(path), Some(Bytes::from_static(b"body{}")));
        assert!(!cache.needs_refresh(path, cached_at - Duration::from_secs(10)));
        assert!(cache.needs_refresh(path, cached_at + Duration::from_secs(10)));
    }

    #[test]
    fn test_http_date_format() {
        let time = SystemTime::UNIX_EPOCH + Duration::from_secs(784_887_151);
        assert_eq!(http_date(time), "Tue, 15 Nov 1994 08:12:31 GMT");
    }

    #[tokio::test]
    async fn test_serve_static_sets_headers_and_caches() {
        let fx = fixture();
        fs::write(fx.static_dir.join("site.css"), "body{}").unwrap();

        let resp = fx.files.serve_static(&request(Method::GET, "/static/site.css"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/css");
        assert_eq!(resp.headers()[CACHE_CONTROL], "public, max-age=3600");
        assert!(resp.headers()[LAST_MODIFIED].to_str().unwrap().ends_with(" GMT"));
        assert_eq!(body(resp).await, b"body{}");
        assert_eq!(fx.files.cache().len(), 1);
    }

    #[tokio::test]
    async fn test_serve_static_refreshes_modified_file() {
        let fx = fixture();
        let path = fx.static_dir.join("app.js");
        fs::write(&path, "old").unwrap();
        fx.files.serve_static(&request(Method::GET, "/static/app.js"));

        fs::write(&path, "new").unwrap();
        let future = SystemTime::now() + Duration::from_secs(60);
        filetime::set_file_mtime(&path, filetime::FileTime::from_system_time(future)).unwrap();

        let resp = fx.files.serve_static(&request(Method::GET, "/static/app.js"));
        assert_eq!(body(resp).await, b"new");
    }

    #[tokio::test]
    async fn test_serve_static_missing_and_traversal() {
        let fx = fixture();
        fs::write(fx.upload_dir.join("secret.txt"), "x").unwrap();

        let resp = fx.files.serve_static(&request(Method::GET, "/static/nope.css"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(resp).await, b"File not found");

        let resp = fx
            .files
            .serve_static(&request(Method::GET, "/static/../uploads/secret.txt"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_serve_static_decodes_path() {
        let fx = fixture();
        fs::write(fx.static_dir.join("my file.css"), "p{}").unwrap();
        fs::write(fx.upload_dir.join("secret.txt"), "x").unwrap();

        let resp = fx.files.serve_static(&request(Method::GET, "/static/my%20file.css"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_TYPE], "text/css");
        assert_eq!(body(resp).await, b"p{}");

        let resp = fx
            .files
            .serve_static(&request(Method::GET, "/static/%2e%2e/uploads/secret.txt"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_parse_multipart() {
        let body = Bytes::from(
            "--XYZ\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhi\r\n\
             --XYZ\r\nContent-Disposition: form-data; name=\"file\"; filename=\"a.txt\"\r\n\
             Content-Type: text/plain\r\n\r\nline1\r\nline2\r\n--XYZ--\r\n",
        );
        let parts = parse_multipart(&body, "XYZ").unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].name, "note");
        assert_eq!(parts[0].filename, None);
        assert_eq!(parts[1].filename.as_deref(), Some("a.txt"));
        assert_eq!(&parts[1].data[..], b"line1\r\nline2");

        assert_eq!(
            parse_multipart(&Bytes::from_static(b"garbage"), "XYZ"),
            Err(MultipartError::Malformed)
        );
        assert_eq!(boundary_from("multipart/form-data; boundary=\"abc\""), Some("abc"));
        assert_eq!(boundary_from("text/plain"), None);
    }

    #[tokio::test]
    async fn test_upload_then_download_and_list() {
        let fx = fixture();
        let req = multipart_request(
            "b1",
            "--b1\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\n\nhello\n--b1--\n",
        );
        let resp = fx.files.upload(&req);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body(resp).await, b"File uploaded successfully: notes.txt");
        assert_eq!(fs::read_to_string(fx.upload_dir.join("notes.txt")).unwrap(), "hello");

        let resp = fx.files.download(&request(Method::GET, "/download?file=notes.txt"));
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[CONTENT_DISPOSITION], "attachment; filename=notes.txt");
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/octet-stream");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "5");
        assert_eq!(body(resp).await, b"hello");

        fs::write(fx.upload_dir.join("a.bin"), [0u8; 3]).unwrap();
        let listed = fx.files.list_files().unwrap();
        let names: Vec<_> = listed.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["a.bin", "notes.txt"]);

        let resp = fx.files.files();
        let value: serde_json::Value = serde_json::from_slice(&body(resp).await).unwrap();
        assert_eq!(value[1]["Name"], "notes.txt");
        assert_eq!(value[1]["Size"], 5);
        assert_eq!(value[1]["IsDir"], false);
    }

    #[tokio::test]
    async fn test_upload_errors() {
        let fx = fixture();
        let resp = fx.files.upload(&request(Method::GET, "/upload"));
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

        let resp = fx.files.upload(&request(Method::POST, "/upload"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await, b"Error parsing form");

        let req = multipart_request(
            "b2",
            "--b2\nContent-Disposition: form-data; name=\"other\"\n\nx\n--b2--\n",
        );
        let resp = fx.files.upload(&req);
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await, b"Error getting file");
    }

    #[tokio::test]
    async fn test_download_errors() {
        let fx = fixture();
        let resp = fx.files.download(&request(Method::GET, "/download"));
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body(resp).await, b"No file specified");

        let resp = fx.files.download(&request(Method::GET, "/download?file=missing.txt"));
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(resp).await, b"File not found");
    }
}
