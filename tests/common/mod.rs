//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use telnet_relay::config::RelayConfig;
use telnet_relay::net::Listener;
use telnet_relay::observability::Stats;
use telnet_relay::{HttpForwarder, RelayServer};

/// A request as seen by the mock upstream.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub request_line: String,
    pub content_type: Option<String>,
    pub body: String,
    pub raw_body: Vec<u8>,
}

/// Start a mock upstream answering every request with `echo:<body>`.
///
/// Returns its address and the list of requests it received.
pub async fn start_echo_upstream() -> (SocketAddr, Arc<Mutex<Vec<CapturedRequest>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let captured = Arc::new(Mutex::new(Vec::new()));
    let requests = Arc::clone(&captured);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    let requests = Arc::clone(&requests);
                    tokio::spawn(async move {
                        let (read_half, mut write_half) = socket.into_split();
                        let mut reader = BufReader::new(read_half);

                        let mut request_line = String::new();
                        if reader.read_line(&mut request_line).await.unwrap_or(0) == 0 {
                            return;
                        }

                        let mut content_length = 0usize;
                        let mut content_type = None;
                        loop {
                            let mut header = String::new();
                            reader.read_line(&mut header).await.unwrap();
                            let header = header.trim_end();
                            if header.is_empty() {
                                break;
                            }
                            if let Some((name, value)) = header.split_once(':') {
                                let value = value.trim().to_string();
                                match name.to_ascii_lowercase().as_str() {
                                    "content-length" => content_length = value.parse().unwrap(),
                                    "content-type" => content_type = Some(value),
                                    _ => {}
                                }
                            }
                        }

                        let mut raw_body = vec![0u8; content_length];
                        reader.read_exact(&mut raw_body).await.unwrap();

                        let mut reply = b"echo:".to_vec();
                        reply.extend_from_slice(&raw_body);
                        requests.lock().unwrap().push(CapturedRequest {
                            request_line: request_line.trim_end().to_string(),
                            content_type,
                            body: String::from_utf8_lossy(&raw_body).into_owned(),
                            raw_body,
                        });

                        let mut response = format!(
                            "HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                            reply.len()
                        )
                        .into_bytes();
                        response.extend_from_slice(&reply);
                        let _ = write_half.write_all(&response).await;
                        let _ = write_half.shutdown().await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    (addr, captured)
}

/// A port nothing listens on.
#[allow(dead_code)]
pub fn unused_port() -> u16 {
    let socket = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    socket.local_addr().unwrap().port()
}

/// Relay config listening on an ephemeral loopback port.
pub fn relay_config(upstream_url: String) -> RelayConfig {
    let mut config = RelayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.listener.port = 0;
    config.upstream.url = upstream_url;
    config
}

/// Start the relay in the background.
pub async fn start_relay(config: RelayConfig) -> (SocketAddr, Arc<Stats>, JoinHandle<()>) {
    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let forwarder = HttpForwarder::with_client(client, config.upstream.clone());

    let listener = Listener::bind(&config.listener).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = RelayServer::new(config, forwarder);
    let stats = server.stats();
    let handle = tokio::spawn(server.run(listener));

    (addr, stats, handle)
}

/// Poll until no connection is open, failing after a few seconds.
#[allow(dead_code)]
pub async fn wait_for_no_connections(stats: &Stats) {
    for _ in 0..100 {
        if stats.snapshot().current_connections == 0 {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!(
        "connections still open: {}",
        stats.snapshot().current_connections
    );
}

/// Send `input` on a fresh connection and collect everything until the relay closes it.
#[allow(dead_code)]
pub async fn exchange(addr: SocketAddr, input: &[u8]) -> String {
    String::from_utf8(exchange_raw(addr, input).await).unwrap()
}

/// Like [`exchange`], returning the relay's output bytes undecoded.
#[allow(dead_code)]
pub async fn exchange_raw(addr: SocketAddr, input: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(input).await.unwrap();

    let mut output = Vec::new();
    tokio::time::timeout(Duration::from_secs(10), stream.read_to_end(&mut output))
        .await
        .expect("relay did not close the connection")
        .unwrap();
    output
}
