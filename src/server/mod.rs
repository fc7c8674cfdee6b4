// Server module entry point
// Accept loop, per-connection serving and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

use std::future::Future;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use hyper_util::server::graceful::GracefulShutdown;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;
use connection::accept_connection;

pub use listener::create_listener;
pub use signal::shutdown_signal;

/// Accept connections until `shutdown` resolves, then drain.
///
/// In-flight connections get `performance.shutdown_timeout` seconds to finish.
pub async fn run<F>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &graceful);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown(state.active_connections.load(Ordering::SeqCst));

    let drain_timeout = Duration::from_secs(state.config.performance.shutdown_timeout);
    tokio::select! {
        () = graceful.shutdown() => logger::log_info("[Shutdown] All connections closed"),
        () = tokio::time::sleep(drain_timeout) => {
            logger::log_warning(&format!(
                "Shutdown timed out after {} seconds, dropping remaining connections",
                drain_timeout.as_secs()
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Mapping;
    use crate::config::Config;
    use std::net::SocketAddr;
    use tempfile::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;
    use tokio::sync::oneshot;

    struct TestServer {
        addr: SocketAddr,
        stop: oneshot::Sender<()>,
        handle: tokio::task::JoinHandle<std::io::Result<()>>,
        _dir: TempDir,
    }

    async fn start(files: &[(&str, &[u8])]) -> TestServer {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("uploads");
        std::fs::create_dir_all(&root).unwrap();
        for (name, data) in files {
            std::fs::write(root.join(name), data).unwrap();
        }
        std::fs::write(dir.path().join("passwd"), b"root:x:0:0").unwrap();

        let mut config = Config::load_from("this-config-file-does-not-exist").unwrap();
        config.logging.access_log = false;
        let mapping = Mapping::new(&config.assets.url_prefix, &root).unwrap();
        let state = Arc::new(AppState::new(config, mapping));

        let listener = create_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        let handle = tokio::spawn(run(listener, state, async {
            let _ = stopped.await;
        }));

        TestServer {
            addr,
            stop,
            handle,
            _dir: dir,
        }
    }

    /// Send one request and return (status line, headers, body)
    async fn get(addr: SocketAddr, path: &str) -> (String, String, Vec<u8>) {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request =
            format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();

        let split = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .expect("no header terminator");
        let head = String::from_utf8_lossy(&raw[..split]).to_string();
        let body = raw[split + 4..].to_vec();
        let (status, headers) = head.split_once("\r\n").unwrap_or((head.as_str(), ""));
        (status.to_string(), headers.to_ascii_lowercase(), body)
    }

    #[tokio::test]
    async fn test_serves_uploaded_png() {
        let png: &[u8] = b"\x89PNG\r\n\x1a\n carats";
        let server = start(&[("carats.png", png)]).await;

        let (status, headers, body) = get(server.addr, "/uploads/carats.png").await;
        assert_eq!(status, "HTTP/1.1 200 OK");
        assert!(headers.contains("content-type: image/png"));
        assert_eq!(body, png);

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_missing_upload_is_404() {
        let server = start(&[]).await;

        let (status, _, _) = get(server.addr, "/uploads/missing.png").await;
        assert_eq!(status, "HTTP/1.1 404 Not Found");

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_traversal_over_the_wire() {
        let server = start(&[("carats.png", b"png")]).await;

        for path in ["/uploads/../passwd", "/uploads/%2e%2e/passwd", "/uploads/..%2fpasswd"] {
            let (status, _, body) = get(server.addr, path).await;
            assert!(
                status.contains(" 403 ") || status.contains(" 404 "),
                "{path}: {status}"
            );
            assert_ne!(body, b"root:x:0:0");
        }

        server.stop.send(()).unwrap();
        server.handle.await.unwrap().unwrap();
    }
}
