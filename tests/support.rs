use std::ffi::OsStr;
use std::io::{Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::path::Path;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex, mpsc};
use std::thread;
use std::time::Duration;

const REPLY: &[u8] = b"HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 16\r\nConnection: close\r\n\r\n{\"message\":\"ok\"}";

pub struct ServerHandle {
    shutdown: mpsc::Sender<()>,
    thread: Option<thread::JoinHandle<()>>,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ServerHandle {
    /// Request lines (`METHOD /path`) in arrival order.
    pub fn requests(&self) -> Result<Vec<String>, String> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .map_err(|err| format!("request log poisoned: {}", err))
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _send_result = self.shutdown.send(());
        if let Some(handle) = self.thread.take() {
            drop(handle.join());
        }
    }
}

/// Spawn a lightweight HTTP server that answers every request with a JSON
/// `message` and records the request lines.
///
/// Requests are handled one at a time so the log order matches the client's
/// call order.
///
/// # Errors
///
/// Returns an error if the listener cannot be created or configured.
pub fn spawn_http_server() -> Result<(String, ServerHandle), String> {
    let listener = TcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("bind test server failed: {}", err))?;
    let addr = listener
        .local_addr()
        .map_err(|err| format!("server addr failed: {}", err))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("set_nonblocking failed: {}", err))?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = requests.clone();

    let handle = thread::spawn(move || {
        loop {
            if shutdown_rx.try_recv().is_ok() {
                break;
            }

            match listener.accept() {
                Ok((stream, _)) => handle_client(stream, &recorded),
                Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                    thread::sleep(Duration::from_millis(5));
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
            requests,
        },
    ))
}

fn handle_client(mut stream: TcpStream, recorded: &Arc<Mutex<Vec<String>>>) {
    if stream.set_nonblocking(false).is_err() {
        return;
    }
    let Some(request_line) = read_request(&mut stream) else {
        return;
    };
    if let Ok(mut guard) = recorded.lock() {
        guard.push(request_line);
    }
    if stream.write_all(REPLY).is_err() {
        return;
    }
    if stream.flush().is_err() {
        return;
    }
    drop(stream.shutdown(Shutdown::Both));
}

fn read_request(stream: &mut TcpStream) -> Option<String> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let bytes = stream.read(&mut chunk).ok()?;
        if bytes == 0 {
            return None;
        }
        buffer.extend_from_slice(chunk.get(..bytes)?);
        if let Some(pos) = buffer.windows(4).position(|window| window == b"\r\n\r\n") {
            break pos;
        }
    };
    let head = String::from_utf8_lossy(buffer.get(..header_end)?).into_owned();
    let content_length = head
        .lines()
        .filter_map(|line| line.split_once(':'))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, value)| value.trim().parse::<usize>().ok())
        .unwrap_or(0);
    let mut body_len = buffer.len().saturating_sub(header_end.saturating_add(4));
    while body_len < content_length {
        let bytes = stream.read(&mut chunk).ok()?;
        if bytes == 0 {
            break;
        }
        body_len = body_len.saturating_add(bytes);
    }

    let mut parts = head.lines().next()?.split_whitespace();
    let method = parts.next()?;
    let path = parts.next()?;
    Some(format!("{} {}", method, path))
}

/// Writes a config whose generator and provisioning API both point at `url`.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_config(dir: &Path, url: &str, destinations: &[&str]) -> Result<String, String> {
    let list = destinations
        .iter()
        .map(|destination| format!("\"{}\"", destination))
        .collect::<Vec<_>>()
        .join(", ");
    let content = format!(
        "[generator]\nlocation = \"{url}\"\n\n[provisioning]\nbase_url = \"{url}\"\n\n[flows]\ndestinations = [{list}]\n"
    );
    let path = dir.join("flowramp.toml");
    std::fs::write(&path, content).map_err(|err| format!("write config failed: {}", err))?;
    Ok(path.to_string_lossy().into_owned())
}

/// Run the `flowramp` binary from `dir` and capture output.
///
/// # Errors
///
/// Returns an error if the binary cannot be executed.
pub fn run_flowramp<I, S>(dir: &Path, args: I) -> Result<Output, String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let bin = flowramp_bin()?;
    Command::new(bin)
        .current_dir(dir)
        .args(args)
        .env("FLOWRAMP_LOG", "error")
        .env_remove("FLOWRAMP_CONFIG")
        .output()
        .map_err(|err| format!("run flowramp failed: {}", err))
}

fn flowramp_bin() -> Result<String, String> {
    option_env!("CARGO_BIN_EXE_flowramp").map_or_else(
        || Err("CARGO_BIN_EXE_flowramp missing at compile time.".to_owned()),
        |path| Ok(path.to_owned()),
    )
}
