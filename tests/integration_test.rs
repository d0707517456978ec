//! Tests de integración para el servidor de eco
//! tests/integration_test.rs
//!
//! Cada test levanta su propio servidor en un puerto efímero de 127.0.0.1,
//! en un thread aparte, y lo detiene con `Shutdown` al terminar.

use echo_server::config::Config;
use echo_server::server::{Listener, Server, ServerStats, Shutdown};
use std::io::{ErrorKind, Read, Write};
use std::net::{Ipv4Addr, SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Servidor corriendo en segundo plano
struct TestServer {
    addr: SocketAddr,
    shutdown: Shutdown,
    handle: JoinHandle<ServerStats>,
}

impl TestServer {
    fn start() -> Self {
        let mut config = Config::default();
        config.port = 0;
        Self::start_with(config)
    }

    fn start_with(config: Config) -> Self {
        let listener = Listener::open(config.address(), config.backlog).expect("open listener");
        let addr = listener.local_addr().expect("local addr");
        let shutdown = Shutdown::new(&listener).expect("shutdown");

        let handle = {
            let shutdown = shutdown.clone();
            thread::spawn(move || Server::new(config).run(listener, &shutdown))
        };

        Self {
            addr,
            shutdown,
            handle,
        }
    }

    fn connect(&self) -> TcpStream {
        let stream = TcpStream::connect(self.addr).expect("connect");
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        stream.set_write_timeout(Some(Duration::from_secs(5))).unwrap();
        stream
    }

    fn stop(self) -> ServerStats {
        self.shutdown.trigger();
        self.handle.join().expect("server thread panicked")
    }
}

/// Helper: envía bytes crudos y retorna la response completa
fn send_raw(server: &TestServer, request: &[u8], close_write: bool) -> Vec<u8> {
    let mut stream = server.connect();
    stream.write_all(request).unwrap();
    if close_write {
        stream.shutdown(std::net::Shutdown::Write).unwrap();
    }

    let mut response = Vec::new();
    stream.read_to_end(&mut response).unwrap();
    response
}

/// Helper: separa headers y body de la response
fn split_response(response: &[u8]) -> (String, Vec<u8>) {
    let pos = response
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response without blank line");
    let head = String::from_utf8(response[..pos].to_vec()).unwrap();
    (head, response[pos + 4..].to_vec())
}

fn content_length(head: &str) -> usize {
    head.lines()
        .find_map(|line| line.strip_prefix("Content-Length: "))
        .expect("missing Content-Length")
        .parse()
        .unwrap()
}

#[test]
fn test_echo_hello() {
    let server = TestServer::start();

    let response = send_raw(&server, b"GET / HTTP/1.1\r\nHost: x\r\n\r\nhello", false);
    let (head, body) = split_response(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", head);
    assert!(head.contains("Content-Type: text/html"));
    assert!(head.contains("Server: Rust Echo Server"));
    assert_eq!(content_length(&head), 5);
    assert_eq!(body, b"hello");

    let stats = server.stop();
    assert_eq!(stats.echoed, 1);
}

#[test]
fn test_echo_empty_body() {
    let server = TestServer::start();

    let response = send_raw(&server, b"POST /\r\n\r\n", false);
    let (head, body) = split_response(&response);

    assert_eq!(content_length(&head), 0);
    assert!(body.is_empty());

    server.stop();
}

#[test]
fn test_missing_separator_is_rejected_and_server_survives() {
    let server = TestServer::start();

    let response = send_raw(&server, b"\x00\x01\x02\x03garbage", true);
    let (head, body) = split_response(&response);
    assert!(head.starts_with("HTTP/1.1 400 Bad Request"));
    assert_eq!(content_length(&head), 0);
    assert!(body.is_empty());

    // El siguiente cliente se atiende normalmente
    let response = send_raw(&server, b"GET / HTTP/1.1\r\n\r\nstill alive", false);
    let (_, body) = split_response(&response);
    assert_eq!(body, b"still alive");

    let stats = server.stop();
    assert_eq!(stats.rejected, 1);
    assert_eq!(stats.echoed, 1);
}

#[test]
fn test_peer_closed_immediately() {
    let server = TestServer::start();

    drop(server.connect());

    let response = send_raw(&server, b"X\r\n\r\nafter", false);
    let (_, body) = split_response(&response);
    assert_eq!(body, b"after");

    let stats = server.stop();
    assert_eq!(stats.empty, 1);
}

#[test]
fn test_capture_boundary_exact_4096() {
    let server = TestServer::start();

    let mut request = vec![b'a'; 4096 - 4];
    request.extend_from_slice(b"\r\n\r\n");
    assert_eq!(request.len(), 4096);

    let response = send_raw(&server, &request, false);
    let (head, body) = split_response(&response);
    assert_eq!(content_length(&head), 0);
    assert!(body.is_empty());

    server.stop();
}

#[test]
fn test_small_capture_size() {
    let mut config = Config::default();
    config.port = 0;
    config.max_request_bytes = 64;
    let server = TestServer::start_with(config);

    // 18 bytes hasta el separador + 46 de body: justo 64
    let mut request = b"GET / HTTP/1.1\r\n\r\n".to_vec();
    request.extend_from_slice(&[b'b'; 46]);
    assert_eq!(request.len(), 64);

    let response = send_raw(&server, &request, false);
    let (head, body) = split_response(&response);
    assert_eq!(content_length(&head), 46);
    assert_eq!(body.len(), 46);

    server.stop();
}

#[test]
fn test_custom_server_name() {
    let mut config = Config::default();
    config.port = 0;
    config.server_name = "Mi Eco".to_string();
    let server = TestServer::start_with(config);

    let response = send_raw(&server, b"GET / HTTP/1.1\r\n\r\nx", false);
    let (head, _) = split_response(&response);
    assert!(head.ends_with("Server: Mi Eco"), "got: {}", head);

    server.stop();
}

#[test]
fn test_multiple_requests_sequentially() {
    let server = TestServer::start();

    for i in 0..5 {
        let request = format!("GET /{} HTTP/1.1\r\n\r\nbody-{}", i, i);
        let response = send_raw(&server, request.as_bytes(), false);
        let (_, body) = split_response(&response);
        assert_eq!(body, format!("body-{}", i).as_bytes(), "request {}", i);
    }

    let stats = server.stop();
    assert_eq!(stats.echoed, 5);
}

#[test]
fn test_clients_are_served_one_at_a_time() {
    let server = TestServer::start();

    // El primer cliente envía headers incompletos y deja al servidor esperando
    let mut first = server.connect();
    first.write_all(b"GET / HTTP/1.1\r\n").unwrap();
    thread::sleep(Duration::from_millis(100));

    // El segundo cliente envía un request completo, pero nadie lo atiende aún
    let mut second = server.connect();
    second.write_all(b"GET / HTTP/1.1\r\n\r\nsecond").unwrap();
    second.set_read_timeout(Some(Duration::from_millis(300))).unwrap();

    let mut byte = [0u8; 1];
    let err = second.read(&mut byte).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::WouldBlock | ErrorKind::TimedOut));

    // Al completar el primero, ambos reciben su respuesta en orden
    first.write_all(b"\r\nfirst").unwrap();
    let mut response = Vec::new();
    first.read_to_end(&mut response).unwrap();
    assert_eq!(split_response(&response).1, b"first");

    second.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
    let mut response = Vec::new();
    second.read_to_end(&mut response).unwrap();
    assert_eq!(split_response(&response).1, b"second");

    let stats = server.stop();
    assert_eq!(stats.echoed, 2);
}

#[test]
fn test_shutdown_releases_port() {
    let server = TestServer::start();
    let port = server.addr.port();
    server.stop();

    // El puerto vuelve a estar libre para un nuevo listener
    let address = std::net::SocketAddrV4::new(Ipv4Addr::LOCALHOST, port);
    assert!(Listener::open(address, 50).is_ok());
}

#[test]
fn test_shutdown_interrupts_stalled_client() {
    let server = TestServer::start();

    // El cliente manda headers incompletos y no dice nada más
    let mut stalled = server.connect();
    stalled.write_all(b"GET / HTTP/1.1\r\n").unwrap();
    thread::sleep(Duration::from_millis(200));

    let (tx, rx) = std::sync::mpsc::channel();
    let shutdown = server.shutdown.clone();
    thread::spawn(move || tx.send(server.stop()).unwrap());

    // Un segundo trigger no debe colgar ni terminar el proceso
    shutdown.trigger();

    let stats = rx
        .recv_timeout(Duration::from_secs(3))
        .expect("server still serving the stalled client after shutdown");
    assert_eq!(stats.interrupted, 1);
    assert_eq!(stats.total(), 1);

    // La conexión se cerró sin respuesta
    let mut response = Vec::new();
    let _ = stalled.read_to_end(&mut response);
    assert!(response.is_empty());
}
