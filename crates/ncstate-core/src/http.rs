// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Shared reqwest client construction, plus a one-shot HTTP responder used by
// the service and brand client tests (`test-util` feature).

use std::time::Duration;

use crate::config::HttpSettings;
use crate::error::{NcstateError, Result};

/// Build an HTTP client with the configured timeout and user agent.
/// Certificate verification stays on.
pub fn build_client(settings: &HttpSettings) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(|e| NcstateError::Transport(e.to_string()))
}

#[cfg(any(test, feature = "test-util"))]
pub mod testing {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accept a single connection, answer it with `status` and `body`, and
    /// yield the raw request (head and body) once the exchange is over.
    pub async fn serve_once(
        status: u16,
        content_type: &'static str,
        body: impl Into<Vec<u8>>,
    ) -> (String, JoinHandle<String>) {
        let body = body.into();
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let request = read_request(&mut socket).await;

            let reason = if status == 200 { "OK" } else { "Error" };
            let head = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            socket.write_all(head.as_bytes()).await.expect("write head");
            socket.write_all(&body).await.expect("write body");
            socket.shutdown().await.ok();
            request
        });

        (format!("http://{addr}"), handle)
    }

    async fn read_request(socket: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 4096];
        loop {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);

            let text = String::from_utf8_lossy(&data);
            if let Some(head_end) = text.find("\r\n\r\n") {
                let length = text[..head_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= head_end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_builds_from_defaults() {
        assert!(build_client(&HttpSettings::default()).is_ok());
    }

    #[tokio::test]
    async fn responder_returns_request_with_body() {
        let (base, server) = testing::serve_once(201, "text/plain", "done").await;
        let client = build_client(&HttpSettings::default()).expect("client");

        let response = client
            .post(format!("{base}/submit"))
            .body("payload")
            .send()
            .await
            .expect("send");
        assert_eq!(response.status().as_u16(), 201);
        assert_eq!(response.text().await.expect("body"), "done");

        let request = server.await.expect("server");
        assert!(request.starts_with("POST /submit "), "{request}");
        assert!(request.ends_with("payload"), "{request}");
    }
}
