
use std::io::{Read, Write};
use std::net::{Shutdown, SocketAddr, TcpListener, TcpStream};
use std::process::{Child, Command, Stdio};
use std::time::Instant;

use crate::setup::DEFAULT_TIMEOUT;

struct ServerProcess {
    child: Child,
    addr: SocketAddr,
}

impl ServerProcess {
    fn start(args: &[&std::ffi::OsStr]) -> Self {
        let addr = TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let child = Command::new(assert_cmd::cargo::cargo_bin(env!("CARGO_PKG_NAME")))
            .args(args)
            .arg("--server")
            .arg(addr.to_string())
            .stdout(Stdio::null())
            .spawn()
            .unwrap();

        let started = Instant::now();
        while TcpStream::connect(addr).is_err() {
            assert!(started.elapsed() < DEFAULT_TIMEOUT, "server did not start");
            std::thread::sleep(std::time::Duration::from_millis(20));
        }
        ServerProcess { child, addr }
    }

    fn request(&self, query: &str) -> String {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        stream.write_all(query.as_bytes()).unwrap();
        stream.shutdown(Shutdown::Write).unwrap();
        let mut out = String::new();
        stream.read_to_string(&mut out).unwrap();
        out
    }
}

impl Drop for ServerProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[test]
fn test_server_requests_and_file_log() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("server.db");
    let log = dir.path().join("server.log");

    let server = ServerProcess::start(&[
        "--db".as_ref(),
        db.as_os_str(),
        "--server-file-log".as_ref(),
        log.as_os_str(),
    ]);

    assert_eq!("", server.request("CREATE TABLE t (x INTEGER)"));
    assert_eq!("", server.request("INSERT INTO t VALUES (42)"));
    assert_eq!("42", server.request("SELECT x FROM t"));
    assert_eq!("Exception", server.request("SELEKT x FROM t"));
    drop(server);

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("ServerMode is running"), "{contents}");
    assert!(contents.contains("-> SELECT x FROM t"), "{contents}");
    assert!(contents.contains("ERROR"), "{contents}");
}

#[test]
fn test_server_json_output() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("json.db");

    let server = ServerProcess::start(&["--db".as_ref(), db.as_os_str(), "-j".as_ref()]);
    assert_eq!("[[1,\"a\"]]", server.request("SELECT 1, 'a'"));
}
