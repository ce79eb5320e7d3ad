//! reqwest implementation of [`QuoteApi`]

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::QuoteApi;
use crate::config::Config;
use crate::error::{ApiError, ApiResult};
use crate::models::{Like, NewLike, NewQuote, QuoteId, QuotePatch, QuoteRecord};

/// HTTP client for the quotes backend
#[derive(Debug, Clone)]
pub struct HttpApi {
    client: Client,
    base_url: String,
}

impl HttpApi {
    /// Create a client from configuration
    pub fn new(config: &Config) -> ApiResult<Self> {
        let base_url = config.base_url().to_string();
        Url::parse(&base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.clone(),
            details: e.to_string(),
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("quotes/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::from_reqwest(e, base_url.clone()))?;

        Ok(Self { client, base_url })
    }

    /// URL of the quotes collection
    pub fn quotes_url(&self) -> String {
        format!("{}/quotes", self.base_url)
    }

    /// URL of a single quote
    pub fn quote_url(&self, id: QuoteId) -> String {
        format!("{}/quotes/{}", self.base_url, id)
    }

    /// URL of the likes collection
    pub fn likes_url(&self) -> String {
        format!("{}/likes", self.base_url)
    }

    /// Send a request, failing on transport errors and non-2xx statuses
    async fn send(&self, request: RequestBuilder, url: &str) -> ApiResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, url))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{} returned {}", url, status);
            return Err(ApiError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(response)
    }

    /// Send a request and decode a JSON body
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder, url: &str) -> ApiResult<T> {
        let response = self.send(request, url).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(e, url))?;

        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            url: url.to_string(),
            details: e.to_string(),
        })
    }
}

#[async_trait]
impl QuoteApi for HttpApi {
    async fn list_quotes(&self) -> ApiResult<Vec<QuoteRecord>> {
        let url = self.quotes_url();
        debug!("GET {}", url);
        self.send_json(self.client.get(&url), &url).await
    }

    async fn list_quotes_with_likes(&self) -> ApiResult<Vec<QuoteRecord>> {
        let url = self.quotes_url();
        debug!("GET {}?_embed=likes", url);
        let request = self.client.get(&url).query(&[("_embed", "likes")]);
        self.send_json(request, &url).await
    }

    async fn create_quote(&self, quote: &NewQuote) -> ApiResult<QuoteRecord> {
        let url = self.quotes_url();
        debug!("POST {}", url);
        self.send_json(self.client.post(&url).json(quote), &url).await
    }

    async fn update_quote(&self, id: QuoteId, patch: &QuotePatch) -> ApiResult<QuoteRecord> {
        let url = self.quote_url(id);
        debug!("PATCH {}", url);
        self.send_json(self.client.patch(&url).json(patch), &url).await
    }

    async fn delete_quote(&self, id: QuoteId) -> ApiResult<()> {
        let url = self.quote_url(id);
        debug!("DELETE {}", url);
        self.send(self.client.delete(&url), &url).await?;
        Ok(())
    }

    async fn list_likes(&self, quote_id: QuoteId) -> ApiResult<Vec<Like>> {
        let url = self.likes_url();
        debug!("GET {}?quoteId={}", url, quote_id);
        let request = self.client.get(&url).query(&[("quoteId", quote_id)]);
        self.send_json(request, &url).await
    }

    async fn create_like(&self, like: &NewLike) -> ApiResult<Like> {
        let url = self.likes_url();
        debug!("POST {} quoteId={}", url, like.quote_id);
        self.send_json(self.client.post(&url).json(like), &url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::task::JoinHandle;

    fn api_for(base_url: &str) -> ApiResult<HttpApi> {
        let config = Config {
            base_url: base_url.to_string(),
            ..Config::default()
        };
        HttpApi::new(&config)
    }

    /// Answer a single request with `status` and `body`.
    ///
    /// Returns the base URL to talk to and a handle yielding the raw
    /// request the client sent.
    async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
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
            let _ = socket.shutdown().await;
            request
        });

        (format!("http://{}", addr), handle)
    }

    /// Read headers plus a Content-Length body
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 1024];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);

            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    #[test]
    fn test_endpoint_urls() {
        let api = api_for("http://localhost:3000").unwrap();
        assert_eq!(api.quotes_url(), "http://localhost:3000/quotes");
        assert_eq!(api.quote_url(42), "http://localhost:3000/quotes/42");
        assert_eq!(api.likes_url(), "http://localhost:3000/likes");
    }

    #[test]
    fn test_trailing_slash_in_base_url() {
        let api = api_for("http://localhost:3000/").unwrap();
        assert_eq!(api.quote_url(1), "http://localhost:3000/quotes/1");
    }

    #[test]
    fn test_invalid_base_url() {
        let err = api_for("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
        assert!(!err.is_recoverable());
    }

    #[tokio::test]
    async fn test_list_likes_filters_by_quote() {
        let (base_url, server) =
            serve_once("200 OK", r#"[{"id":1,"quoteId":3,"createdAt":1558524356}]"#).await;
        let api = api_for(&base_url).unwrap();

        let likes = api.list_likes(3).await.unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(likes[0].quote_id, 3);

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /likes?quoteId=3 HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_embedded_list_with_bad_body_is_decode_error() {
        let (base_url, server) = serve_once("200 OK", "not json").await;
        let api = api_for(&base_url).unwrap();

        let err = api.list_quotes_with_likes().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { .. }));
        assert!(!err.is_recoverable());

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /quotes?_embed=likes HTTP/1.1\r\n"));
    }

    #[tokio::test]
    async fn test_update_sends_patch_and_maps_status() {
        let (base_url, server) = serve_once("404 Not Found", "{}").await;
        let api = api_for(&base_url).unwrap();

        let err = api
            .update_quote(4, &QuotePatch::new("a", "b"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));

        let request = server.await.unwrap();
        assert!(request.starts_with("PATCH /quotes/4 HTTP/1.1\r\n"));
        assert!(request.ends_with(r#"{"quote":"a","author":"b"}"#));
    }

    #[tokio::test]
    async fn test_create_like_posts_body() {
        let (base_url, server) =
            serve_once("201 Created", r#"{"id":9,"quoteId":7,"createdAt":1558524356}"#).await;
        let api = api_for(&base_url).unwrap();

        let like = api
            .create_like(&NewLike {
                quote_id: 7,
                created_at: 1_558_524_356,
            })
            .await
            .unwrap();
        assert_eq!(like.id, 9);

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /likes HTTP/1.1\r\n"));
        assert!(request.ends_with(r#"{"quoteId":7,"createdAt":1558524356}"#));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Grab a free port, then close it so the connection is refused
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let config = Config {
            base_url: format!("http://{}", addr),
            timeout_secs: 2,
            ..Config::default()
        };
        let api = HttpApi::new(&config).unwrap();

        let err = api.list_quotes().await.unwrap_err();
        assert!(matches!(err, ApiError::Network { .. }));
        assert!(err.is_recoverable());
    }
}
