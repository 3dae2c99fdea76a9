//! The listing service: `GET /api/files?path=<urlencoded>&sort=<asc|desc>`
//! over a configured root directory.
//!
//! Listings cover direct children only. A directory's reported size is the
//! recursive sum of the regular files beneath it. Entries are sorted by
//! size in the requested order (path as tie-break, so responses are
//! deterministic).

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use walkdir::WalkDir;

use crate::api::{DirectoryEntry, SortOrder};
use crate::error::{AppError, Result};

/// Shared state: the canonicalized root every request is confined to.
#[derive(Debug, Clone)]
struct ServeState {
    root: PathBuf,
}

/// Query parameters of the listing endpoint. `sort` defaults to `desc`.
#[derive(Debug, Deserialize)]
struct ListingQuery {
    path: String,
    #[serde(default)]
    sort: SortOrder,
}

/// Why a listing request was refused.
#[derive(Debug)]
enum ListingRejection {
    /// The path does not resolve to anything.
    NotFound(String),
    /// The path resolves outside the served root.
    OutsideRoot(String),
    /// The path resolves to something that is not a directory.
    NotADirectory(String),
    /// The directory exists but could not be scanned.
    Scan(std::io::Error),
}

impl IntoResponse for ListingRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ListingRejection::NotFound(p) => {
                (StatusCode::NOT_FOUND, format!("no such directory: {p}"))
            }
            ListingRejection::OutsideRoot(p) => (
                StatusCode::BAD_REQUEST,
                format!("path is outside the served root: {p}"),
            ),
            ListingRejection::NotADirectory(p) => {
                (StatusCode::BAD_REQUEST, format!("not a directory: {p}"))
            }
            ListingRejection::Scan(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("failed to scan directory: {e}"),
            ),
        };
        (status, message).into_response()
    }
}

/// Build the service router for the given (already canonicalized) root.
fn router(root: PathBuf) -> Router {
    Router::new()
        .route("/api/files", get(list_files))
        .with_state(ServeState { root })
}

async fn list_files(
    State(state): State<ServeState>,
    Query(query): Query<ListingQuery>,
) -> Response {
    match scan_children(&state.root, Path::new(&query.path)) {
        Ok(mut entries) => {
            sort_entries(&mut entries, query.sort);
            tracing::info!(
                path = %query.path,
                sort = query.sort.as_str(),
                count = entries.len(),
                "listing served"
            );
            Json(entries).into_response()
        }
        Err(rejection) => {
            tracing::warn!(path = %query.path, rejection = ?rejection, "listing refused");
            rejection.into_response()
        }
    }
}

/// Resolve `requested` and check it is a directory under `root`.
fn resolve(root: &Path, requested: &Path) -> std::result::Result<PathBuf, ListingRejection> {
    let display = requested.display().to_string();
    let canonical = requested
        .canonicalize()
        .map_err(|_| ListingRejection::NotFound(display.clone()))?;
    if !canonical.starts_with(root) {
        return Err(ListingRejection::OutsideRoot(display));
    }
    if !canonical.is_dir() {
        return Err(ListingRejection::NotADirectory(display));
    }
    Ok(canonical)
}

/// List the direct children of `requested`, with recursive directory sizes.
/// Children whose metadata cannot be read are skipped, not fatal.
fn scan_children(
    root: &Path,
    requested: &Path,
) -> std::result::Result<Vec<DirectoryEntry>, ListingRejection> {
    let dir = resolve(root, requested)?;
    let mut entries = Vec::new();
    for child in std::fs::read_dir(&dir).map_err(ListingRejection::Scan)? {
        let child = child.map_err(ListingRejection::Scan)?;
        let path = child.path();
        let metadata = match child.metadata() {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "skipping unreadable entry");
                continue;
            }
        };
        let is_dir = metadata.is_dir();
        let size = if is_dir { dir_size(&path) } else { metadata.len() };
        entries.push(DirectoryEntry {
            path: path.to_string_lossy().into_owned(),
            size,
            is_dir,
        });
    }
    Ok(entries)
}

/// Recursive size of all regular files under `path`. Unreadable subtrees
/// contribute nothing.
fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| entry.metadata().ok())
        .map(|metadata| metadata.len())
        .sum()
}

/// Sort by size in the requested order, path as tie-break.
fn sort_entries(entries: &mut [DirectoryEntry], order: SortOrder) {
    entries.sort_by(|a, b| {
        let by_size = match order {
            SortOrder::Asc => a.size.cmp(&b.size),
            SortOrder::Desc => b.size.cmp(&a.size),
        };
        by_size.then_with(|| a.path.cmp(&b.path))
    });
}

/// Run the listing service until Ctrl-C / SIGTERM.
pub async fn run(root: PathBuf, bind: SocketAddr) -> Result<()> {
    let root = root
        .canonicalize()
        .map_err(|_| AppError::InvalidPath(format!("{} does not exist", root.display())))?;
    if !root.is_dir() {
        return Err(AppError::InvalidPath(format!(
            "{} is not a directory",
            root.display()
        )));
    }

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(root = %root.display(), addr = %bind, "listing service started");
    axum::serve(listener, router(root))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("listing service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending().await,
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ListingClient;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    /// Fixture tree:
    ///   docs/        (dir, inner.txt 10 bytes + sub/deep.txt 20 bytes)
    ///   a.txt        (42 bytes)
    ///   empty.log    (0 bytes)
    fn fixture() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("docs/sub")).unwrap();
        File::create(dir.path().join("docs/inner.txt"))
            .unwrap()
            .write_all(&[1u8; 10])
            .unwrap();
        File::create(dir.path().join("docs/sub/deep.txt"))
            .unwrap()
            .write_all(&[2u8; 20])
            .unwrap();
        File::create(dir.path().join("a.txt"))
            .unwrap()
            .write_all(&[3u8; 42])
            .unwrap();
        File::create(dir.path().join("empty.log")).unwrap();
        dir
    }

    fn canonical_root(dir: &TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    #[test]
    fn scan_lists_direct_children_only() {
        let dir = fixture();
        let root = canonical_root(&dir);
        let entries = scan_children(&root, &root).unwrap();

        let mut paths: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        paths.sort();
        assert_eq!(entries.len(), 3);
        assert!(paths.iter().all(|p| !p.contains("inner.txt")));
        assert!(paths.iter().any(|p| p.ends_with("/docs")));
    }

    #[test]
    fn directory_size_is_recursive() {
        let dir = fixture();
        let root = canonical_root(&dir);
        let entries = scan_children(&root, &root).unwrap();

        let docs = entries.iter().find(|e| e.path.ends_with("/docs")).unwrap();
        assert!(docs.is_dir);
        assert_eq!(docs.size, 30); // 10 + 20 from the subtree

        let a = entries.iter().find(|e| e.path.ends_with("/a.txt")).unwrap();
        assert!(!a.is_dir);
        assert_eq!(a.size, 42);
    }

    #[test]
    fn sort_orders_by_size_with_path_tiebreak() {
        let mut entries = vec![
            DirectoryEntry {
                path: "/b".into(),
                size: 5,
                is_dir: false,
            },
            DirectoryEntry {
                path: "/a".into(),
                size: 5,
                is_dir: false,
            },
            DirectoryEntry {
                path: "/c".into(),
                size: 1,
                is_dir: false,
            },
        ];
        sort_entries(&mut entries, SortOrder::Asc);
        let asc: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(asc, ["/c", "/a", "/b"]);

        sort_entries(&mut entries, SortOrder::Desc);
        let desc: Vec<&str> = entries.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(desc, ["/a", "/b", "/c"]);
    }

    #[test]
    fn resolve_refuses_escapes_and_files() {
        let dir = fixture();
        let root = canonical_root(&dir);

        assert!(matches!(
            resolve(&root, Path::new("/")),
            Err(ListingRejection::OutsideRoot(_))
        ));
        assert!(matches!(
            resolve(&root, &root.join("nope")),
            Err(ListingRejection::NotFound(_))
        ));
        assert!(matches!(
            resolve(&root, &root.join("a.txt")),
            Err(ListingRejection::NotADirectory(_))
        ));
        assert_eq!(resolve(&root, &root.join("docs")).unwrap(), root.join("docs"));
    }

    #[test]
    fn resolve_refuses_dotdot_escape() {
        let dir = fixture();
        let root = canonical_root(&dir);
        let sneaky = root.join("docs").join("..").join("..");
        assert!(matches!(
            resolve(&root, &sneaky),
            Err(ListingRejection::OutsideRoot(_))
        ));
    }

    /// Spin the real router on an ephemeral port and drive it with the
    /// real client: the whole wire protocol in one place.
    #[tokio::test]
    async fn client_and_server_speak_the_same_protocol() {
        let dir = fixture();
        let root = canonical_root(&dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(root.clone())).await.unwrap();
        });

        let client = ListingClient::new(&format!("http://{addr}")).unwrap();
        let root_str = canonical_root(&dir).to_string_lossy().into_owned();

        // Default request order comes from the client; explicit desc here.
        let entries = client.fetch(&root_str, SortOrder::Desc).await.unwrap();
        assert_eq!(entries.len(), 3);
        let sizes: Vec<u64> = entries.iter().map(|e| e.size).collect();
        assert_eq!(sizes, [42, 30, 0]);
        assert!(entries[1].is_dir); // docs, 30 bytes recursive

        let entries = client.fetch(&root_str, SortOrder::Asc).await.unwrap();
        let sizes: Vec<u64> = entries.iter().map(|e| e.size).collect();
        assert_eq!(sizes, [0, 30, 42]);
    }

    #[tokio::test]
    async fn client_surfaces_server_rejections_as_errors() {
        let dir = fixture();
        let root = canonical_root(&dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(root)).await.unwrap();
        });

        let client = ListingClient::new(&format!("http://{addr}")).unwrap();

        // A file path is refused with 400; the client reports the status.
        let file_path = canonical_root(&dir).join("a.txt");
        let err = client
            .fetch(&file_path.to_string_lossy(), SortOrder::Desc)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("400"));

        // A path outside the root is refused too.
        let err = client.fetch("/", SortOrder::Desc).await.unwrap_err();
        assert!(err.to_string().contains("400"));
    }

    #[tokio::test]
    async fn missing_sort_parameter_defaults_to_desc() {
        let dir = fixture();
        let root = canonical_root(&dir);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router(root)).await.unwrap();
        });

        let root_str = canonical_root(&dir).to_string_lossy().into_owned();
        let url = format!(
            "http://{addr}/api/files?path={}",
            url::form_urlencoded::byte_serialize(root_str.as_bytes()).collect::<String>()
        );
        let entries: Vec<DirectoryEntry> =
            reqwest::get(url).await.unwrap().json().await.unwrap();
        let sizes: Vec<u64> = entries.iter().map(|e| e.size).collect();
        assert_eq!(sizes, [42, 30, 0]);
    }
}
