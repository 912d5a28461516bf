use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::{ChatClient, ChatRequest, ClientError, Transport};
use crate::core::attachment::Attachment;
use crate::core::config::{self, Config};

/// Serve exactly one HTTP response and hand back the raw request text.
async fn one_shot_server(status: &'static str, body: &'static str) -> (Config, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let request = read_request(&mut socket).await;
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();
        request
    });
    let config = config::from_lookup(|_| None)
        .unwrap()
        .with_base_url(&format!("http://{}", addr))
        .unwrap();
    (config, handle)
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = socket.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
        let text = String::from_utf8_lossy(&buf);
        let Some(header_end) = text.find("\r\n\r\n") else {
            continue;
        };
        let headers = text[..header_end].to_ascii_lowercase();
        let body_len = buf.len() - (header_end + 4);
        let content_length = headers
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok());
        let done = match content_length {
            Some(len) => body_len >= len,
            None if headers.contains("transfer-encoding: chunked") => text.ends_with("0\r\n\r\n"),
            None => true,
        };
        if done {
            break;
        }
    }
    String::from_utf8_lossy(&buf).into_owned()
}

fn request<'a>(image: Option<&'a Attachment>) -> ChatRequest<'a> {
    ChatRequest {
        message: "red running shoes",
        thread_id: "thread-1",
        user_id: "user-1",
        image,
    }
}

#[tokio::test]
async fn send_posts_multipart_fields() {
    let (config, server) = one_shot_server("200 OK", r#"{"response":"**Found** 3","thread_id":"thread-1"}"#).await;
    let client = ChatClient::new(&config).unwrap();

    let reply = client.send(&request(None)).await.unwrap();
    assert_eq!(reply.response.as_deref(), Some("**Found** 3"));
    assert_eq!(reply.thread_id.as_deref(), Some("thread-1"));

    let raw = server.await.unwrap();
    assert!(raw.starts_with("POST /api/v1/chat "));
    assert!(raw.contains("multipart/form-data"));
    assert!(raw.contains("name=\"message\"\r\n\r\nred running shoes"));
    assert!(raw.contains("name=\"thread_id\"\r\n\r\nthread-1"));
    assert!(raw.contains("name=\"user_id\"\r\n\r\nuser-1"));
    assert!(!raw.contains("query_image"));
}

#[tokio::test]
async fn send_includes_image_part() {
    let (config, server) = one_shot_server("200 OK", r#"{"response":"nice"}"#).await;
    let client = ChatClient::new(&config).unwrap();
    let image = Attachment {
        file_name: "shoe.png".to_string(),
        mime_type: "image/png",
        bytes: b"PNGDATA".to_vec(),
    };

    client.send(&request(Some(&image))).await.unwrap();

    let raw = server.await.unwrap();
    assert!(raw.contains("name=\"query_image\"; filename=\"shoe.png\""));
    assert!(raw.contains("Content-Type: image/png") || raw.contains("content-type: image/png"));
    assert!(raw.contains("PNGDATA"));
}

#[tokio::test]
async fn send_tolerates_missing_response_field() {
    let (config, server) = one_shot_server("200 OK", r#"{"thread_id":"t"}"#).await;
    let client = ChatClient::new(&config).unwrap();
    let reply = client.send(&request(None)).await.unwrap();
    assert!(reply.response.is_none());
    server.await.unwrap();
}

#[tokio::test]
async fn non_success_status_is_error() {
    let (config, server) =
        one_shot_server("500 Internal Server Error", r#"{"detail":"Chat processing failed"}"#).await;
    let client = ChatClient::new(&config).unwrap();
    let err = client.send(&request(None)).await.unwrap_err();
    assert!(matches!(err, ClientError::Status(500)));
    server.await.unwrap();
}

#[tokio::test]
async fn invalid_json_is_decode_error() {
    let (config, server) = one_shot_server("200 OK", "not json").await;
    let client = ChatClient::new(&config).unwrap();
    let err = client.send(&request(None)).await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)));
    server.await.unwrap();
}

#[tokio::test]
async fn health_reads_status() {
    let (config, server) =
        one_shot_server("200 OK", r#"{"status":"healthy","service":"chatbot-api"}"#).await;
    let client = ChatClient::new(&config).unwrap();
    let health = client.health().await.unwrap();
    assert_eq!(health.status, "healthy");
    assert_eq!(health.service, "chatbot-api");
    assert!(server.await.unwrap().starts_with("GET /api/v1/health "));
}

#[tokio::test]
async fn connection_refused_is_http_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let mut config = config::from_lookup(|_| None)
        .unwrap()
        .with_base_url(&format!("http://{}", addr))
        .unwrap();
    config.timeout = Duration::from_secs(5);
    let client = ChatClient::new(&config).unwrap();
    let err = client.send(&request(None)).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(_)));
}
