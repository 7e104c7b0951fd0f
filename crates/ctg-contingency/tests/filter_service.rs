use ctg_contingency::{FilterExport, FilterServiceClient, FilterServiceConfig};
use ctg_core::{CtgError, EquipmentKind, IdentifiableAttributes};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use uuid::Uuid;

/// Accept one connection, read the request head, then write `response`
/// and keep the socket open for `hold`. Reports the request line.
fn serve_raw(response: String, hold: Duration) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut header = String::new();
            reader.read_line(&mut header).unwrap();
            if header == "\r\n" || header.is_empty() {
                break;
            }
        }
        let mut stream = stream;
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        tx.send(request_line).unwrap();
        thread::sleep(hold);
    });
    (base_url, rx)
}

/// Serve one canned HTTP response and report the request line.
fn serve_once(status: &str, body: &str) -> (String, mpsc::Receiver<String>) {
    serve_raw(
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        ),
        Duration::ZERO,
    )
}

fn client(base_url: String, network: Uuid) -> FilterServiceClient {
    client_with_timeout(base_url, network, 5)
}

fn client_with_timeout(
    base_url: String,
    network: Uuid,
    timeout_seconds: u64,
) -> FilterServiceClient {
    let config = FilterServiceConfig {
        base_url,
        timeout_seconds,
    };
    FilterServiceClient::new(&config, network, Some("variant_1".into()))
}

#[test]
fn export_sends_query_and_parses_attributes() {
    let (base_url, requests) = serve_once(
        "200 OK",
        r#"[{"id":"GEN1","type":"GENERATOR","distributionKey":0.5},{"id":"L1","type":"LINE"}]"#,
    );
    let network = Uuid::new_v4();
    let filter = Uuid::new_v4();
    let matched = client(base_url, network).export(&[filter]).unwrap();

    assert_eq!(matched.len(), 2);
    assert_eq!(matched[0].distribution_key, Some(0.5));
    assert_eq!(matched[1], IdentifiableAttributes::new("L1", EquipmentKind::Line));

    let request_line = requests.recv().unwrap();
    assert!(request_line.starts_with("GET /v1/filters/export?"));
    assert!(request_line.contains(&format!("networkUuid={network}")));
    assert!(request_line.contains("variantId=variant_1"));
    assert!(request_line.contains(&format!("ids={filter}")));
}

#[test]
fn missing_filter_is_not_found() {
    let (base_url, _requests) = serve_once("404 Not Found", "");
    let err = client(base_url, Uuid::new_v4())
        .export(&[Uuid::new_v4()])
        .unwrap_err();
    assert!(err.is_not_found(), "{err}");
}

#[test]
fn server_error_is_retryable() {
    let (base_url, _requests) = serve_once("503 Service Unavailable", "");
    let err = client(base_url, Uuid::new_v4())
        .export(&[Uuid::new_v4()])
        .unwrap_err();
    assert!(err.is_retryable(), "{err}");
}

#[test]
fn stalled_body_is_retryable() {
    let head =
        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: 64\r\n\r\n";
    let (base_url, _requests) = serve_raw(format!("{head}[{{\"id\""), Duration::from_secs(4));
    let err = client_with_timeout(base_url, Uuid::new_v4(), 1)
        .export(&[Uuid::new_v4()])
        .unwrap_err();
    assert!(matches!(err, CtgError::UpstreamUnavailable(_)), "{err}");
    assert!(err.is_retryable());
}

#[test]
fn malformed_body_is_a_parse_error() {
    let (base_url, _requests) = serve_once("200 OK", r#"{"not": "a list"}"#);
    let err = client(base_url, Uuid::new_v4())
        .export(&[Uuid::new_v4()])
        .unwrap_err();
    assert!(matches!(err, CtgError::Parse(_)), "{err}");
    assert!(!err.is_retryable());
}
