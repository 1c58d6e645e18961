//! API client for the customer and orders gateway.
//!
//! Every protected request goes through [`ApiClient::call`], which attaches the
//! stored bearer token, encodes the body and classifies failures.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{header, Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::SessionStore;
use crate::config::Config;
use crate::models::{
    AuthToken, Customer, CustomerInput, CustomerList, LoginRequest, Order, OrderInput, OrderList,
};

use super::ApiError;

/// HTTP methods the gateway accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// API client for the CRM gateway.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn SessionStore>,
}

impl ApiClient {
    /// Create a client without a request timeout
    pub fn new(base_url: &str, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        Self::build(base_url, store, None)
    }

    pub fn from_config(config: &Config, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        Self::build(&config.base_url, store, timeout)
    }

    fn build(
        base_url: &str,
        store: Arc<dyn SessionStore>,
        timeout: Option<Duration>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: Response) -> Result<Response, ApiError> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let url = response.url().to_string();
        let body = response.text().await.unwrap_or_default();
        warn!(status = %status, url = %url, body = %body, "API request failed");
        Err(ApiError::from_status(status, &body))
    }

    async fn read_json(response: Response) -> Result<Value, ApiError> {
        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("body is not JSON: {}", e)))
    }

    /// Perform an authenticated request and return the decoded JSON body.
    ///
    /// Fails with [`ApiError::Unauthenticated`] before touching the network when
    /// no token is stored. `Content-Type: application/json` is only sent with a body.
    pub async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let token = self.store.token()?.ok_or(ApiError::Unauthenticated)?;

        let url = self.url(path);
        debug!(method = %method, url = %url, has_body = body.is_some(), "API request");

        let mut request = self
            .client
            .request(method.into(), &url)
            .bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        Self::read_json(response).await
    }

    /// Typed wrapper over [`call`](Self::call)
    pub async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        method: Method,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let body = body
            .map(serde_json::to_value)
            .transpose()
            .map_err(ApiError::Encode)?;
        let value = self.call(path, method, body.as_ref()).await?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("unexpected shape from {}: {}", path, e)))
    }

    async fn public_post(&self, url: &str, body: Option<&LoginRequest>) -> Result<AuthToken, ApiError> {
        let mut request = self
            .client
            .post(url)
            .header(header::ACCEPT, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let response = Self::check_response(response).await?;
        let value = Self::read_json(response).await?;
        let token: AuthToken = serde_json::from_value(value)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse auth response: {}", e)))?;
        if token.access_token.trim().is_empty() {
            return Err(ApiError::InvalidResponse(
                "auth response carried an empty access_token".to_string(),
            ));
        }
        Ok(token)
    }

    // ===== Authentication =====

    /// Exchange credentials for a token. Sent without an Authorization header.
    pub async fn authenticate(&self, credentials: &LoginRequest) -> Result<AuthToken, ApiError> {
        let url = self.url("/login");
        debug!(url = %url, "Authenticating");
        self.public_post(&url, Some(credentials)).await
    }

    pub async fn register(&self, username: &str) -> Result<AuthToken, ApiError> {
        let url = format!(
            "{}?username={}",
            self.url("/register"),
            urlencoding::encode(username)
        );
        debug!(url = %url, "Registering");
        self.public_post(&url, None).await
    }

    // ===== Customers =====

    pub async fn list_customers(&self) -> Result<Vec<Customer>, ApiError> {
        let list: CustomerList = self.request("/customers", Method::Get, None::<&()>).await?;
        debug!("Fetched {} customers", list.customers.len());
        Ok(list.customers)
    }

    pub async fn create_customer(&self, input: &CustomerInput) -> Result<Customer, ApiError> {
        self.request("/customers", Method::Post, Some(input)).await
    }

    pub async fn update_customer(&self, id: &str, input: &CustomerInput) -> Result<Customer, ApiError> {
        let path = format!("/customers/{}", urlencoding::encode(id));
        self.request(&path, Method::Put, Some(input)).await
    }

    pub async fn delete_customer(&self, id: &str) -> Result<(), ApiError> {
        let path = format!("/customers/{}", urlencoding::encode(id));
        self.call(&path, Method::Delete, None).await?;
        Ok(())
    }

    // ===== Orders =====

    /// Create an order. A missing customer comes back as a 404 status error.
    pub async fn create_order(&self, input: &OrderInput) -> Result<Order, ApiError> {
        self.request("/orders", Method::Post, Some(input)).await
    }

    pub async fn fetch_customer_orders(&self, customer_id: &str) -> Result<Vec<Order>, ApiError> {
        let path = format!("/orders/customer/{}", urlencoding::encode(customer_id));
        let list: OrderList = self.request(&path, Method::Get, None::<&()>).await?;
        debug!(customer_id, "Fetched {} orders", list.orders.len());
        Ok(list.orders)
    }
}
