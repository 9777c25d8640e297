//! Static server implementation.

use std::net::SocketAddr;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::State,
    handler::Handler,
    http::{header, HeaderValue, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::listing;

/// Configuration for the static server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory to serve
    pub root: PathBuf,

    /// Port to listen on
    pub port: u16,

    /// Host to bind to
    pub host: String,

    /// Open browser on start
    pub open: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            port: 3000,
            host: "127.0.0.1".to_string(),
            open: true,
        }
    }
}

/// Errors that can occur with the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Directory to serve does not exist: {}", .0.display())]
    MissingRoot(PathBuf),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind to {0}: {1}")]
    BindError(SocketAddr, String),

    #[error("Server error: {0}")]
    ServeError(String),
}

/// Static file server.
pub struct StaticServer {
    config: ServerConfig,
}

impl StaticServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Bind and serve until the process is stopped.
    pub async fn start(self) -> Result<(), ServerError> {
        if !self.config.root.is_dir() {
            return Err(ServerError::MissingRoot(self.config.root));
        }

        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .map_err(|e| ServerError::InvalidAddress(format!("{}: {}", self.config.host, e)))?;

        let app = router(&self.config.root);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| ServerError::BindError(addr, e.to_string()))?;

        tracing::info!(
            "Serving {} at http://{}",
            self.config.root.display(),
            addr
        );

        if self.config.open {
            let url = format!("http://{}", addr);
            if let Err(e) = open::that(&url) {
                tracing::warn!("Failed to open browser: {}", e);
            }
        }

        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::ServeError(e.to_string()))?;

        Ok(())
    }
}

/// Build the router serving `root`.
///
/// Existing files and directory indexes are served by `ServeDir`; misses
/// fall through to [`fallback`].
pub fn router(root: &Path) -> Router {
    let root = Arc::new(root.to_path_buf());
    let serve_dir = ServeDir::new(root.as_path())
        .append_index_html_on_directories(true)
        .fallback(fallback.with_state(Arc::clone(&root)));

    Router::new()
        .fallback_service(serve_dir)
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
}

/// Retry misses as `<path>.html`, list index-less directories and reject
/// parent-directory segments.
async fn fallback(State(root): State<Arc<PathBuf>>, uri: Uri) -> Response {
    let url_path = uri.path();
    let rel = url_path.trim_start_matches('/');

    if Path::new(rel)
        .components()
        .any(|c| matches!(c, Component::ParentDir))
    {
        tracing::warn!("Rejected path {}", url_path);
        return (StatusCode::FORBIDDEN, "Forbidden").into_response();
    }

    let path = root.join(rel);

    if !rel.is_empty() && !rel.ends_with('/') {
        let html = root.join(format!("{rel}.html"));
        if html.is_file() {
            return match tokio::fs::read_to_string(&html).await {
                Ok(content) => Html(content).into_response(),
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", html.display(), e);
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
            };
        }
    }

    if path.is_dir() && url_path.ends_with('/') {
        return match listing::read_entries(&path).await {
            Ok(entries) => Html(listing::render(url_path, &entries)).into_response(),
            Err(e) => {
                tracing::warn!("Failed to list {}: {}", path.display(), e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        };
    }

    (StatusCode::NOT_FOUND, "Not Found").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::fs;
    use tempfile::{tempdir, TempDir};
    use tower::ServiceExt;

    fn public() -> TempDir {
        let dir = tempdir().unwrap();
        let preview = dir.path().join("preview/ana-marko");
        fs::create_dir_all(&preview).unwrap();
        fs::write(preview.join("index.html"), "selector").unwrap();
        fs::write(preview.join("classic.html"), "classic page").unwrap();
        fs::create_dir_all(dir.path().join("preview/.mila-jovan.staging-a1")).unwrap();
        fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        dir
    }

    async fn get(root: &Path, uri: &str) -> (StatusCode, Option<HeaderValue>, String) {
        let response = router(root)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let cache = response.headers().get(header::CACHE_CONTROL).cloned();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, cache, String::from_utf8_lossy(&body).into_owned())
    }

    #[tokio::test]
    async fn serves_directory_index() {
        let dir = public();

        let (status, cache, body) = get(dir.path(), "/preview/ana-marko/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "selector");
        assert_eq!(cache, Some(HeaderValue::from_static("no-cache")));
    }

    #[tokio::test]
    async fn serves_files_byte_for_byte() {
        let dir = public();

        let (status, _, body) = get(dir.path(), "/preview/ana-marko/classic.html").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "classic page");
    }

    #[tokio::test]
    async fn retries_with_html_extension() {
        let dir = public();

        let (status, _, body) = get(dir.path(), "/preview/ana-marko/classic").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "classic page");
    }

    #[tokio::test]
    async fn lists_directories_without_index() {
        let dir = public();

        let (status, cache, body) = get(dir.path(), "/preview/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<a href="ana-marko/">"#));
        assert!(!body.contains("staging"));
        assert_eq!(cache, Some(HeaderValue::from_static("no-cache")));
    }

    #[tokio::test]
    async fn missing_paths_are_not_found() {
        let dir = public();

        let (status, _, body) = get(dir.path(), "/preview/nepoznat/").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Not Found");
    }

    #[tokio::test]
    async fn rejects_parent_segments() {
        let dir = public();
        let root = dir.path().join("preview");

        let (status, _, body) = get(&root, "/ana-marko/../../secret.txt").await;

        assert!(status.is_client_error());
        assert!(!body.contains("secret"));
    }

    #[tokio::test]
    async fn start_requires_existing_root() {
        let dir = tempdir().unwrap();
        let server = StaticServer::new(ServerConfig {
            root: dir.path().join("missing"),
            open: false,
            ..Default::default()
        });

        let err = server.start().await.unwrap_err();

        assert!(matches!(err, ServerError::MissingRoot(_)));
    }
}
