//! HTTP transport abstraction for testability

use async_trait::async_trait;

/// HTTP response from a request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Abstraction over HTTP client for dependency injection
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait HttpClient: Send + Sync {
    /// Send a GET request to the given URL
    async fn get(&self, url: &str) -> crate::Result<HttpResponse>;

    /// Send a POST request with a JSON body
    async fn post_json(&self, url: &str, body: &serde_json::Value)
        -> crate::Result<HttpResponse>;

    /// Send a DELETE request with the given query parameters
    async fn delete(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse>;
}

/// Production HTTP client using reqwest
#[derive(Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self::default()
    }
}

async fn read_response(
    method: &str,
    url: &str,
    response: reqwest::Response,
) -> crate::Result<HttpResponse> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| crate::AdminError::Http(format!("Reading response body: {}", e)))?;

    tracing::debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());
    Ok(HttpResponse { status, body })
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str) -> crate::Result<HttpResponse> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| crate::AdminError::Http(format!("GET {} failed: {}", url, e)))?;

        read_response("GET", url, response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> crate::Result<HttpResponse> {
        tracing::debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| crate::AdminError::Http(format!("POST {} failed: {}", url, e)))?;

        read_response("POST", url, response).await
    }

    async fn delete(&self, url: &str, query: &[(&str, &str)]) -> crate::Result<HttpResponse> {
        let mut target = reqwest::Url::parse(url)
            .map_err(|e| crate::AdminError::Http(format!("Invalid URL {}: {}", url, e)))?;
        if !query.is_empty() {
            target.query_pairs_mut().extend_pairs(query);
        }

        tracing::debug!("DELETE {}", target);
        let response = self
            .client
            .delete(target.clone())
            .send()
            .await
            .map_err(|e| crate::AdminError::Http(format!("DELETE {} failed: {}", target, e)))?;

        read_response("DELETE", target.as_str(), response).await
    }
}
