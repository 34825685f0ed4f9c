//! Live HTTP implementation of [`EventsApi`] backed by reqwest.

use async_trait::async_trait;
use reqwest::Method;

use super::error::ApiError;
use super::traits::EventsApi;
use super::types::{EventId, FeedPage, UserId, UserResponse};
use crate::config::ClientConfig;
use crate::feed::query::QuerySignature;

#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    base_url: String,
    auth_token: Option<String>,
    timeout: std::time::Duration,
    client: reqwest::Client,
}

impl HttpEventsApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            base_url: config.base_url,
            auth_token: config.auth_token,
            timeout: config.timeout,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Build a request with the per-request timeout and, when configured,
    /// the bearer token the backend expects on every call.
    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self
            .client
            .request(method, self.endpoint(path))
            .timeout(self.timeout);
        if let Some(token) = &self.auth_token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        builder
    }
}

/// Fail on non-2xx before attempting to decode a body.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(ApiError::Server {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn fetch_feed(&self, query: &QuerySignature) -> Result<FeedPage, ApiError> {
        let mut request = self.request(Method::GET, "events").query(&[
            ("page", query.page.to_string()),
            ("search", query.search.clone()),
            ("order", query.order.as_str().to_string()),
        ]);
        if let Some(creator) = query.creator {
            request = request.query(&[("creator", creator.to_string())]);
        }
        if let Some(attending) = query.attending {
            request = request.query(&[("attending", attending.to_string())]);
        }

        let response = check_status(request.send().await?).await?;
        let page: FeedPage = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        tracing::debug!(
            page = page.page,
            received = page.events.len(),
            more = page.more,
            "feed page fetched"
        );
        Ok(page)
    }

    async fn delete_event(&self, id: EventId) -> Result<(), ApiError> {
        let response = self
            .request(Method::DELETE, &format!("events/{id}"))
            .send()
            .await?;
        check_status(response).await?;
        tracing::debug!(event = id, "event deleted");
        Ok(())
    }

    async fn set_attend(&self, id: EventId, currently_attending: bool) -> Result<bool, ApiError> {
        // The protocol encodes the current state through the verb: DELETE
        // removes an existing attendance, POST creates one.
        let method = if currently_attending {
            Method::DELETE
        } else {
            Method::POST
        };
        let response = self
            .request(method, &format!("events/{id}/attend"))
            .send()
            .await?;
        check_status(response).await?;
        let now_attending = !currently_attending;
        tracing::debug!(event = id, attending = now_attending, "attendance toggled");
        Ok(now_attending)
    }

    async fn lookup_user_name(&self, id: UserId) -> Result<String, ApiError> {
        let response = self
            .request(Method::GET, &format!("users/{id}"))
            .send()
            .await?;
        let response = check_status(response).await?;
        let parsed: UserResponse = response
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.to_string()))?;
        Ok(parsed.user.name)
    }
}
