//! Remote compilation service client.
//!
//! ```text
//! POST <branch url | service.url>/<service.endpoint>
//!   { "code": "...", "options": { "language": "csharp", ... } }
//!
//! 2xx  -> CompileResult
//! else -> { "message", "exceptionMessage"?, "stackTrace"? }
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use super::result::{CompileRequest, CompileResult, ServiceFailure};
use crate::config::section::ServiceConfig;

/// The compile backend. Implemented by [`HttpCompilationService`] and by
/// in-memory fakes in tests.
#[async_trait]
pub trait CompilationService: Send + Sync {
    async fn process(&self, request: &CompileRequest) -> Result<CompileResult, ServiceFailure>;
}

pub struct HttpCompilationService {
    client: reqwest::Client,
    base: Url,
    endpoint: String,
}

impl HttpCompilationService {
    pub fn new(base: Url, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: with_trailing_slash(base),
            endpoint: endpoint.into().trim_start_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(&config.url)?, config.endpoint.clone()))
    }

    /// Endpoint for a request: the branch's service if one is selected,
    /// the configured one otherwise.
    pub fn endpoint_for(&self, branch_url: Option<&str>) -> Result<Url, ServiceFailure> {
        let base = match branch_url {
            Some(raw) => Url::parse(raw)
                .map(with_trailing_slash)
                .map_err(|e| ServiceFailure::new(format!("invalid branch url `{raw}`: {e}")))?,
            None => self.base.clone(),
        };
        base.join(&self.endpoint)
            .map_err(|e| ServiceFailure::new(format!("invalid endpoint `{}`: {e}", self.endpoint)))
    }
}

#[async_trait]
impl CompilationService for HttpCompilationService {
    async fn process(&self, request: &CompileRequest) -> Result<CompileResult, ServiceFailure> {
        let url = self.endpoint_for(request.branch_url.as_deref())?;
        crate::debug!("service"; "POST {}", url);

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceFailure::new(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceFailure::new(e.to_string()))?;

        if status.is_success() {
            serde_json::from_str(&body)
                .map_err(|e| ServiceFailure::new(format!("invalid compile result: {e}")))
        } else {
            Err(decode_failure(status, &body))
        }
    }
}

/// Decode an error response, falling back to the status line when the body
/// is not a failure payload.
fn decode_failure(status: StatusCode, body: &str) -> ServiceFailure {
    match serde_json::from_str::<ServiceFailure>(body) {
        Ok(failure) if !failure.message.is_empty() || failure.exception_message.is_some() => {
            failure
        }
        _ => {
            let body = body.trim();
            if body.is_empty() {
                ServiceFailure::new(status.to_string())
            } else {
                ServiceFailure::new(format!("{status}: {body}"))
            }
        }
    }
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Options;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    fn service(base: &str) -> HttpCompilationService {
        HttpCompilationService::new(Url::parse(base).unwrap(), "api/compilation")
    }

    fn request(branch_url: Option<&str>) -> CompileRequest {
        CompileRequest {
            code: "int x=1;".into(),
            options: Options::default(),
            branch_url: branch_url.map(str::to_string),
        }
    }

    /// Serve exactly one HTTP response and return the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 4096];
            // Read headers and the declared body before answering
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(end) = text.find("\r\n\r\n") {
                    let length = text[..end]
                        .lines()
                        .find_map(|l| {
                            l.to_ascii_lowercase()
                                .strip_prefix("content-length:")
                                .map(|v| v.trim().parse::<usize>().unwrap())
                        })
                        .unwrap_or(0);
                    if request.len() >= end + 4 + length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{addr}/")
    }

    #[test]
    fn test_endpoint_default_and_branch() {
        let service = service("http://lab.example");

        assert_eq!(
            service.endpoint_for(None).unwrap().as_str(),
            "http://lab.example/api/compilation"
        );
        assert_eq!(
            service
                .endpoint_for(Some("http://x.example/branches/x"))
                .unwrap()
                .as_str(),
            "http://x.example/branches/x/api/compilation"
        );
        assert!(service.endpoint_for(Some("not a url")).is_err());
    }

    #[test]
    fn test_decode_failure_payload() {
        let failure = decode_failure(
            StatusCode::BAD_REQUEST,
            r#"{"message":"bad request"}"#,
        );
        assert_eq!(failure, ServiceFailure::new("bad request"));
    }

    #[test]
    fn test_decode_failure_fallback() {
        let failure = decode_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(failure.report(), "502 Bad Gateway: upstream down");

        let failure = decode_failure(StatusCode::INTERNAL_SERVER_ERROR, "");
        assert_eq!(failure.report(), "500 Internal Server Error");
    }

    #[tokio::test]
    async fn test_process_success() {
        let base = serve_once(
            "200 OK",
            r#"{"success":true,"errors":[],"warnings":[{"severity":"Warning","message":"unused","start":{"line":1,"column":4},"end":{"line":1,"column":5}}]}"#,
        )
        .await;

        let result = service(&base).process(&request(None)).await.unwrap();
        assert!(result.success);
        assert_eq!(result.warnings[0].message, "unused");
    }

    #[tokio::test]
    async fn test_process_rejection() {
        let base = serve_once(
            "500 Internal Server Error",
            r#"{"message":"An error has occurred.","exceptionMessage":"boom","stackTrace":"at X"}"#,
        )
        .await;

        let failure = service(&base).process(&request(None)).await.unwrap_err();
        assert_eq!(failure.report(), "boom\r\nat X");
    }

    #[tokio::test]
    async fn test_process_uses_branch_url() {
        let branch = serve_once("200 OK", r#"{"success":true}"#).await;

        // Default base is unreachable; only the branch service answers
        let result = service("http://127.0.0.1:9/")
            .process(&request(Some(&branch)))
            .await
            .unwrap();
        assert!(result.success);
    }

    #[tokio::test]
    async fn test_process_transport_error() {
        let failure = service("http://127.0.0.1:9/")
            .process(&request(None))
            .await
            .unwrap_err();
        assert!(!failure.message.is_empty());
    }
}
