use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::process::{Command, Output};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, mpsc};
use std::thread;
use std::time::Duration;

/// How the test server answers each request, by arrival order.
#[derive(Clone, Copy)]
pub enum ServerBehavior {
    /// Every request gets a 200.
    AlwaysOk,
    /// The first `ok_requests` get a 200, everything after gets a 429.
    RateLimitAfter { ok_requests: usize },
    /// Every request after the first `fast_requests` is delayed before the
    /// 200 is written.
    SlowAfter {
        fast_requests: usize,
        delay: Duration,
    },
}

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server for tests.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server(behavior: ServerBehavior) -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let request_counter = Arc::new(AtomicUsize::new(0));

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => {
                    let counter = Arc::clone(&request_counter);
                    thread::spawn(move || handle_client(stream, behavior, &counter));
                }
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(10));
                }
                Err(_) => break,
            }
        }
    });

    Ok((
        format!("http://{}", addr),
        ServerHandle {
            shutdown: shutdown_tx,
            thread: Some(handle),
        },
    ))
}

/// Spawn the test server, or skip the test in sandboxes that forbid sockets.
///
/// # Errors
///
/// Returns an error for any failure other than a permission denial.
pub fn spawn_http_server_or_skip(
    behavior: ServerBehavior,
) -> Result<Option<(String, ServerHandle)>, String> {
    match spawn_http_server(behavior) {
        Ok(result) => Ok(Some(result)),
        Err(err) if err.contains("Operation not permitted") => {
            eprintln!("Skipping e2e test: {}", err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn handle_client(mut stream: TcpStream, behavior: ServerBehavior, counter: &AtomicUsize) {
    let mut buffer = [0u8; 1024];
    if stream.read(&mut buffer).is_err() {
        return;
    }

    let arrival = counter.fetch_add(1, Ordering::SeqCst);
    let response: &[u8] = match behavior {
        ServerBehavior::AlwaysOk => {
            b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
        }
        ServerBehavior::RateLimitAfter { ok_requests } => {
            if arrival < ok_requests {
                b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
            } else {
                b"HTTP/1.1 429 Too Many Requests\r\nContent-Length: 4\r\nConnection: close\r\n\r\nslow"
            }
        }
        ServerBehavior::SlowAfter {
            fast_requests,
            delay,
        } => {
            if arrival >= fast_requests {
                thread::sleep(delay);
            }
            b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nOK"
        }
    };

    if stream.write_all(response).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

/// Run the `rlprobe` binary and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_rlprobe<I, S>(args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = rlprobe_bin()?;
    Command::new(bin)
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .map_err(|err| format!("run rlprobe failed: {}", err))
}

fn rlprobe_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_rlprobe").map_or_else(
        || Err("CARGO_BIN_EXE_rlprobe missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
