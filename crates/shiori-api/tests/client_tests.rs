use std::io;
use std::sync::{Arc, Mutex};

use shiori_api::{MangaDexClient, MangaDexConfig, MangaDexError, PageQuality, SearchResult};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Minimal HTTP/1.1 responder: answers every connection with the same
/// status and body, and records the raw request heads it received.
async fn serve(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let mut head = Vec::new();
            let mut buf = [0u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => head.extend_from_slice(&buf[..n]),
                }
            }
            seen.lock()
                .unwrap()
                .push(String::from_utf8_lossy(&head).into_owned());

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    (format!("http://{addr}"), requests)
}

/// Accepts connections and never answers.
async fn serve_silence() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });

    format!("http://{addr}")
}

/// Base URL of a port nothing is listening on.
async fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

fn client_for(base_url: &str) -> MangaDexClient {
    let config = MangaDexConfig {
        base_url: base_url.to_string(),
        ..MangaDexConfig::default()
    };
    MangaDexClient::from_config(&config).unwrap()
}

#[derive(Clone, Default)]
struct Capture(Arc<Mutex<Vec<u8>>>);

impl io::Write for Capture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Capture {
    fn lines_containing(&self, needle: &str) -> usize {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|l| l.contains(needle))
            .count()
    }
}

#[tokio::test]
async fn test_search_over_http() {
    let (base, requests) = serve(
        "200 OK",
        r#"{"result":"ok","data":[{"id":"abc","attributes":{"title":{"en":"Naruto"}}}]}"#,
    )
    .await;

    let results = client_for(&base).search_manga("Naruto").await;
    assert_eq!(
        results,
        vec![SearchResult {
            id: "abc".into(),
            title: "Naruto".into()
        }]
    );

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].starts_with("GET /manga?limit=20&title=Naruto HTTP/1.1\r\n"));
    assert!(requests[0]
        .to_ascii_lowercase()
        .contains("user-agent: shiori/1.0\r\n"));
}

#[tokio::test]
async fn test_chapter_request_line() {
    let (base, requests) = serve("200 OK", r#"{"data":[{"id":"c1"}]}"#).await;

    let chapters = client_for(&base).get_chapters("m1").await;
    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].id, "c1");

    let requests = requests.lock().unwrap();
    assert!(requests[0]
        .starts_with("GET /chapter?manga=m1&translatedLanguage[]=en&order[chapter]=asc HTTP/1.1\r\n"));
}

#[tokio::test]
async fn test_error_status() {
    let (base, _) = serve(
        "404 Not Found",
        r#"{"result":"error","errors":[{"status":404,"title":"not_found_http_exception"}]}"#,
    )
    .await;
    let client = client_for(&base);

    match client.try_get_manga("missing").await {
        Err(MangaDexError::Api { status, message }) => {
            assert_eq!(status, 404);
            assert!(message.contains("not_found_http_exception"));
        }
        other => panic!("expected API error, got {other:?}"),
    }
    assert!(client.get_manga("missing").await.is_none());
}

#[tokio::test]
async fn test_malformed_body() {
    let (base, _) = serve("200 OK", "<html>maintenance</html>").await;
    let client = client_for(&base);

    let err = client.try_get_chapters("m1").await.unwrap_err();
    assert!(matches!(err, MangaDexError::Parse(_)));
    assert!(client.get_chapters("m1").await.is_empty());
}

#[tokio::test]
async fn test_connection_refused_yields_empty_results() {
    let client = client_for(&refused_base_url().await);

    assert!(client.search_manga("Naruto").await.is_empty());
    assert!(client.get_manga("m1").await.is_none());
    assert!(client.get_chapters("m1").await.is_empty());
    assert!(client.get_page_urls("c1").await.is_empty());
    assert!(client.get_manga_stats("m1").await.is_none());

    let err = client.try_search_manga("Naruto").await.unwrap_err();
    assert!(matches!(err, MangaDexError::Http(_)));
}

#[tokio::test]
async fn test_read_timeout() {
    let config = MangaDexConfig {
        base_url: serve_silence().await,
        read_timeout_secs: 1,
        ..MangaDexConfig::default()
    };
    let client = MangaDexClient::from_config(&config).unwrap();

    let err = client
        .try_get_page_urls("c1", PageQuality::Data)
        .await
        .unwrap_err();
    assert!(matches!(err, MangaDexError::Http(_)));
    assert!(client.get_page_urls("c1").await.is_empty());
}

#[tokio::test]
async fn test_one_request_line_per_failure() {
    let capture = Capture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let client = client_for(&refused_base_url().await);
    assert!(client.search_manga("Naruto").await.is_empty());
    assert!(client.get_manga_stats("m1").await.is_none());

    assert_eq!(capture.lines_containing("MangaDex request failed"), 2);
    assert_eq!(capture.lines_containing("MangaDex lookup failed"), 2);
    assert_eq!(capture.lines_containing("search_manga"), 1);
    assert_eq!(capture.lines_containing("get_manga_stats"), 1);
}
