//! One-query-per-connection TCP server.
//!
//! A client connects, sends a query (optionally closing its write half), and
//! receives the rendered result, or the literal `Exception` if anything went
//! wrong. The server then closes the connection. There's no framing; the
//! request is whatever arrived, up to the configured buffer size.
//!
//! Connections are handled on their own tasks so a slow client can't hold up
//! others, but engine access is serialized: only one request touches the
//! database at a time.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_sqlite::ClientBuilder;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::signal;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{Instrument, debug, debug_span, error, info, warn};
use uuid::Uuid;

use crate::encode::QueryOutput;
use crate::errors::Result;
use crate::executor::QueryExecutor;
use crate::{TOOL_NAME, TOOL_VERSION};

pub const DEFAULT_BUFFER_SIZE: usize = 1024;

pub const DEFAULT_SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Response body sent for any failed request.
pub const ERROR_RESPONSE: &[u8] = b"Exception";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Database opened for every request.
    pub db_path: PathBuf,
    /// Max number of request bytes read. Anything beyond is ignored.
    pub buffer_size: usize,
    pub executor: QueryExecutor,
    /// How long in-flight requests may run after shutdown is triggered.
    pub shutdown_grace: Duration,
}

impl ServerConfig {
    pub fn new(db_path: impl Into<PathBuf>, executor: QueryExecutor) -> Self {
        ServerConfig {
            db_path: db_path.into(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            executor,
            shutdown_grace: DEFAULT_SHUTDOWN_GRACE,
        }
    }

    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    pub fn with_shutdown_grace(mut self, grace: Duration) -> Self {
        self.shutdown_grace = grace;
        self
    }
}

pub struct QueryServer {
    listener: TcpListener,
    handler: RequestHandler,
    shutdown_grace: Duration,
}

impl QueryServer {
    pub async fn bind(addr: SocketAddr, conf: ServerConfig) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self::with_listener(listener, conf))
    }

    pub fn with_listener(listener: TcpListener, conf: ServerConfig) -> Self {
        let shutdown_grace = conf.shutdown_grace;
        QueryServer {
            listener,
            handler: RequestHandler {
                conf: Arc::new(conf),
                engine: Arc::new(Mutex::new(())),
            },
            shutdown_grace,
        }
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until interrupted (ctrl-c).
    pub async fn serve(self) -> Result<()> {
        let shutdown = async {
            match signal::ctrl_c().await {
                Ok(()) => info!("shutdown triggered"),
                Err(err) => {
                    // Without a signal handler we can only serve forever.
                    error!(%err, "unable to listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            }
        };
        self.serve_with_shutdown(shutdown).await
    }

    /// Serve until `shutdown` completes.
    ///
    /// The listener is closed as soon as shutdown triggers. Requests already
    /// accepted get the configured grace period to finish, after which they're
    /// aborted.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "{TOOL_NAME} {TOOL_VERSION} ServerMode is running on {}",
            self.listener.local_addr()?
        );

        let QueryServer {
            listener,
            handler,
            shutdown_grace,
        } = self;

        let mut in_flight = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,

                result = listener.accept() => {
                    let (conn, peer) = match result {
                        Ok(accepted) => accepted,
                        Err(e) => {
                            error!(%e, "failed to accept connection");
                            continue;
                        }
                    };

                    let handler = handler.clone();
                    let conn_id = Uuid::new_v4();
                    let span = debug_span!("pulseql_connection", %conn_id);
                    in_flight.spawn(
                        async move {
                            debug!(%peer, "client connected");
                            handler.handle_connection(conn, peer).await;
                            debug!(%peer, "client disconnected");
                        }
                        .instrument(span),
                    );
                }

                Some(_) = in_flight.join_next(), if !in_flight.is_empty() => (),
            }
        }

        drop(listener);
        info!("Closing...");

        if !in_flight.is_empty() {
            info!(requests = in_flight.len(), "waiting on in-flight requests");
            let drained = tokio::time::timeout(shutdown_grace, async {
                while in_flight.join_next().await.is_some() {}
            })
            .await;
            if drained.is_err() {
                warn!(
                    requests = in_flight.len(),
                    "grace period elapsed, aborting in-flight requests"
                );
                in_flight.shutdown().await;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
struct RequestHandler {
    conf: Arc<ServerConfig>,
    /// Held while a request is using the database.
    engine: Arc<Mutex<()>>,
}

impl RequestHandler {
    /// Serve the single request on this connection, then close it.
    async fn handle_connection(&self, mut stream: TcpStream, peer: SocketAddr) {
        let response = match self.serve_request(&mut stream, peer).await {
            Ok(output) => output.to_string().into_bytes(),
            Err(e) => {
                error!(peer = %peer, "{e}");
                ERROR_RESPONSE.to_vec()
            }
        };

        if let Err(e) = stream.write_all(&response).await {
            debug!(%e, %peer, "failed to write response");
        }
        discard_pending(&stream);
        if let Err(e) = stream.shutdown().await {
            debug!(%e, %peer, "failed to shut down connection");
        }
    }

    async fn serve_request(&self, stream: &mut TcpStream, peer: SocketAddr) -> Result<QueryOutput> {
        let request = read_request(stream, self.conf.buffer_size).await?;
        let query = std::str::from_utf8(request.trim_ascii())?.to_string();
        info!(peer = %peer, "{query}");

        let _engine = self.engine.lock().await;

        let client = ClientBuilder::new()
            .path(&self.conf.db_path)
            .open()
            .await?;

        let executor = self.conf.executor.clone();
        let result = client
            .conn(move |conn| Ok(executor.execute(conn, &query)))
            .await;

        if let Err(e) = client.close().await {
            warn!(%e, peer = %peer, "failed to close request connection");
        }

        result?
    }
}

/// Size of the scratch buffer requests are read through.
const READ_CHUNK: usize = 4096;

/// Read a request of at most `limit` bytes.
///
/// Waits for the first bytes, then takes whatever else has already arrived
/// without waiting further. An empty request means the client closed without
/// sending anything. Memory grows with the bytes actually received, not with
/// `limit`.
async fn read_request(stream: &mut TcpStream, limit: usize) -> io::Result<Vec<u8>> {
    let mut chunk = [0; READ_CHUNK];
    let mut buf = Vec::new();

    let n = stream.read(&mut chunk[..limit.min(READ_CHUNK)]).await?;
    buf.extend_from_slice(&chunk[..n]);

    while n > 0 && buf.len() < limit {
        let want = (limit - buf.len()).min(READ_CHUNK);
        match stream.try_read(&mut chunk[..want]) {
            Ok(0) => break,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
            Err(e) => return Err(e),
        }
    }

    Ok(buf)
}

/// Drop request bytes past the buffer size that already arrived, so closing
/// the socket doesn't reset the connection before the client reads the
/// response.
fn discard_pending(stream: &TcpStream) {
    let mut scratch = [0; 4096];
    while let Ok(n) = stream.try_read(&mut scratch) {
        if n == 0 {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use async_sqlite::rusqlite::Connection;
    use tokio::sync::oneshot;
    use tokio::task::JoinHandle;

    use super::*;
    use crate::dictionary::KeywordDictionary;
    use crate::encode::OutputFormat;
    use crate::translate::RewriteMode;

    struct TestServer {
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        handle: JoinHandle<Result<()>>,
        _dir: tempfile::TempDir,
    }

    impl TestServer {
        async fn stop(self) {
            self.shutdown.send(()).unwrap();
            tokio::time::timeout(Duration::from_secs(5), self.handle)
                .await
                .unwrap() // Timeout
                .unwrap() // Join
                .unwrap(); // Serve
        }
    }

    fn create_table(path: &Path) {
        let conn = Connection::open(path).unwrap();
        conn.execute_batch("CREATE TABLE t (id INTEGER)").unwrap();
    }

    async fn start(configure: impl FnOnce(ServerConfig) -> ServerConfig) -> TestServer {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("server.db");
        create_table(&db_path);

        let conf = configure(ServerConfig::new(&db_path, QueryExecutor::default()));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let server = QueryServer::with_listener(listener, conf);
        let addr = server.local_addr().unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_with_shutdown(async move {
            let _ = rx.await;
        }));

        TestServer {
            addr,
            shutdown: tx,
            handle,
            _dir: dir,
        }
    }

    async fn send(addr: SocketAddr, query: &str) -> String {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream.write_all(query.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();

        let mut resp = String::new();
        tokio::time::timeout(Duration::from_secs(5), stream.read_to_string(&mut resp))
            .await
            .unwrap() // Timeout
            .unwrap(); // Read
        resp
    }

    #[tokio::test]
    async fn insert_then_select() {
        let server = start(|conf| conf).await;

        let resp = send(server.addr, "INSERT INTO t VALUES (1)").await;
        assert_ne!("Exception", resp);

        let resp = send(server.addr, "SELECT * FROM t").await;
        assert!(resp.contains('1'), "response: {resp}");

        server.stop().await;
    }

    #[tokio::test]
    async fn invalid_query_responds_exception() {
        let server = start(|conf| conf).await;

        let resp = send(server.addr, "SELEKT * FROM t").await;
        assert_eq!("Exception", resp);

        // Still serving.
        let resp = send(server.addr, "SELECT 42").await;
        assert_eq!("42", resp);

        server.stop().await;
    }

    #[tokio::test]
    async fn request_is_trimmed() {
        let server = start(|conf| conf).await;
        let resp = send(server.addr, "  SELECT 'x'\r\n").await;
        assert_eq!("x", resp);
        server.stop().await;
    }

    #[tokio::test]
    async fn request_truncated_to_buffer_size() {
        let server = start(|conf| conf.with_buffer_size(10)).await;

        // Only "SELECT 123" is read.
        let resp = send(server.addr, "SELECT 12345678").await;
        assert_eq!("123", resp);

        server.stop().await;
    }

    #[tokio::test]
    async fn oversized_buffer_size() {
        let server = start(|conf| conf.with_buffer_size(usize::MAX)).await;

        let resp = send(server.addr, "SELECT 1").await;
        assert_eq!("1", resp);

        let long = format!("SELECT '{}'", "x".repeat(3 * READ_CHUNK));
        let resp = send(server.addr, &long).await;
        assert_eq!(3 * READ_CHUNK, resp.len());

        server.stop().await;
    }

    #[tokio::test]
    async fn json_responses() {
        let server = start(|mut conf| {
            conf.executor = QueryExecutor::new(OutputFormat::Json);
            conf
        })
        .await;

        send(server.addr, "INSERT INTO t VALUES (7)").await;
        let resp = send(server.addr, "SELECT id, 'a' FROM t").await;
        assert_eq!(r#"[[7,"a"]]"#, resp);

        server.stop().await;
    }

    #[tokio::test]
    async fn dictionary_translation() {
        let dict = Arc::new(KeywordDictionary::from_pairs([("PICK", "SELECT")]));
        let server = start(move |mut conf| {
            conf.executor = QueryExecutor::default().with_dictionary(dict, RewriteMode::QuoteAware);
            conf
        })
        .await;

        let resp = send(server.addr, "PICK 'PICK'").await;
        assert_eq!("PICK", resp);

        server.stop().await;
    }

    #[tokio::test]
    async fn invalid_utf8_responds_exception() {
        let server = start(|conf| conf).await;

        let mut stream = TcpStream::connect(server.addr).await.unwrap();
        stream.write_all(&[0xff, 0xfe, 0x00]).await.unwrap();
        stream.shutdown().await.unwrap();
        let mut resp = Vec::new();
        stream.read_to_end(&mut resp).await.unwrap();
        assert_eq!(ERROR_RESPONSE, resp.as_slice());

        server.stop().await;
    }

    #[tokio::test]
    async fn idle_client_does_not_block_others() {
        let server = start(|conf| conf).await;

        // Connected but never sends anything.
        let _idle = TcpStream::connect(server.addr).await.unwrap();

        let resp = send(server.addr, "SELECT 1").await;
        assert_eq!("1", resp);

        drop(_idle);
        server.stop().await;
    }

    #[tokio::test]
    async fn shutdown_aborts_after_grace() {
        let server = start(|conf| conf.with_shutdown_grace(Duration::from_millis(50))).await;

        let _idle = TcpStream::connect(server.addr).await.unwrap();
        // Give the server a chance to accept.
        tokio::time::sleep(Duration::from_millis(50)).await;

        server.stop().await;
    }
}
