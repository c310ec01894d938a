//! Request gateway: the single chokepoint for calls to the clinic backend.
//!
//! Every call, whatever its outcome:
//! 1. shows the busy overlay, and hides it again on every exit path
//! 2. sends `Content-Type: application/json` unless the caller overrides it
//! 3. turns non-2xx answers into [`ConsoleError::Http`] carrying the body text
//! 4. on failure, notifies the user, logs a redacted diagnostic and returns
//!    the error so the caller's flow stops there
//!
//! There are no retries. A failed call is terminal for that user action.

use std::future::Future;
use std::sync::Arc;

use config_engine::ConsoleConfig;
use error_common::{ConsoleError, Result};
use logger_redacted::redacted_error;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::busy::BusyIndicator;
use crate::notification::{NotificationKind, NotificationService};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Verb, headers, query and body of one call
#[derive(Debug, Clone)]
pub struct RequestOptions {
    method: Method,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self::new(Method::GET)
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            headers: HeaderMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::GET)
    }

    pub fn post() -> Self {
        Self::new(Method::POST)
    }

    pub fn put() -> Self {
        Self::new(Method::PUT)
    }

    pub fn delete() -> Self {
        Self::new(Method::DELETE)
    }

    /// Add a header; it wins over the gateway defaults.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        let encoded = serde_json::to_string(body)
            .map_err(|e| ConsoleError::Other(e.into()))?;
        self.body = Some(encoded);
        Ok(self)
    }
}

pub struct Gateway {
    client: reqwest::Client,
    base_url: String,
    busy: Arc<BusyIndicator>,
    notifier: Arc<NotificationService>,
}

impl Gateway {
    pub fn new(
        config: &ConsoleConfig,
        busy: Arc<BusyIndicator>,
        notifier: Arc<NotificationService>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| ConsoleError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            busy,
            notifier,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Perform a call and return the parsed JSON body.
    ///
    /// Returns `None` when the response does not declare a JSON content
    /// type, which covers `204 No Content` and empty `DELETE` answers.
    pub async fn request(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<serde_json::Value>> {
        self.send(endpoint, options).await
    }

    /// GET `endpoint` and decode the body as `T`.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let method = Method::GET;
        self.guarded(&method, endpoint, async {
            self.dispatch::<T>(endpoint, RequestOptions::get())
                .await?
                .ok_or_else(|| ConsoleError::Decode(format!("{} returned no JSON body", endpoint)))
        })
        .await
    }

    /// Perform a call and decode a JSON body, if any, as `T`.
    pub async fn send<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<T>> {
        let method = options.method.clone();
        self.guarded(&method, endpoint, self.dispatch::<T>(endpoint, options))
            .await
    }

    async fn guarded<T, F>(&self, method: &Method, endpoint: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let _busy = self.busy.acquire();
        match call.await {
            Ok(value) => Ok(value),
            Err(err) => {
                redacted_error!("API error: {} {} failed: {}", method, endpoint, err);
                self.notifier
                    .notify(err.user_message(), NotificationKind::Error);
                Err(err)
            }
        }
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_MEDIA_TYPE));
        for (name, value) in options.headers.iter() {
            headers.insert(name.clone(), value.clone());
        }

        debug!(method = %options.method, url = %url, "Dispatching request");

        let mut request = self
            .client
            .request(options.method, &url)
            .headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        if let Some(body) = options.body {
            request = request.body(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConsoleError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ConsoleError::http(status.as_u16(), body));
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains(JSON_MEDIA_TYPE));
        if !is_json {
            return Ok(None);
        }

        let body = response
            .json::<T>()
            .await
            .map_err(|e| ConsoleError::Decode(e.to_string()))?;
        Ok(Some(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::busy::BUSY_ELEMENT;
    use crate::document::Document;
    use crate::memory::MemoryDocument;
    use mockito::Matcher;
    use serde_json::json;
    use std::time::Duration;

    fn gateway_for(url: &str) -> (Gateway, Arc<MemoryDocument>) {
        let doc = Arc::new(MemoryDocument::new());
        let document: Arc<dyn Document> = doc.clone();
        let busy = Arc::new(BusyIndicator::new(document.clone()));
        let notifier = Arc::new(NotificationService::new(
            document,
            Duration::from_millis(3000),
        ));
        let config = ConsoleConfig {
            api_base_url: url.to_string(),
            request_timeout_secs: 5,
            ..Default::default()
        };
        (Gateway::new(&config, busy, notifier).unwrap(), doc)
    }

    #[tokio::test]
    async fn test_success_returns_parsed_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/doctors")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id":1,"name":"Dr. A","specialization":"Cardiology","available":true}]"#)
            .create_async()
            .await;

        let (gateway, doc) = gateway_for(&server.url());
        let body = gateway
            .request("/doctors", RequestOptions::get())
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(body.unwrap()[0]["name"], "Dr. A");
        assert!(doc.toasts().is_empty());
    }

    #[tokio::test]
    async fn test_non_json_success_returns_none() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/doctors/4")
            .with_status(204)
            .create_async()
            .await;

        let (gateway, _doc) = gateway_for(&server.url());
        let body = gateway
            .request("/doctors/4", RequestOptions::delete())
            .await
            .unwrap();
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_http_error_surfaces_body_text() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/appointments")
            .with_status(400)
            .with_header("content-type", "text/plain")
            .with_body("Doctor not available")
            .create_async()
            .await;

        let (gateway, doc) = gateway_for(&server.url());
        let err = gateway
            .request("/appointments", RequestOptions::post())
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert_eq!(err.to_string(), "Doctor not available");
        let toast = doc.toast().unwrap();
        assert_eq!(toast.message, "Doctor not available");
        assert_eq!(toast.kind, NotificationKind::Error);
    }

    #[tokio::test]
    async fn test_http_error_with_empty_body_is_generic() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/patients")
            .with_status(500)
            .create_async()
            .await;

        let (gateway, doc) = gateway_for(&server.url());
        let err = gateway.fetch::<Vec<serde_json::Value>>("/patients").await.unwrap_err();

        assert_eq!(err.user_message(), "HTTP error, status 500");
        assert_eq!(doc.toast().unwrap().message, "HTTP error, status 500");
    }

    #[tokio::test]
    async fn test_network_error_is_notified_and_reraised() {
        let (gateway, doc) = gateway_for("http://127.0.0.1:1");
        let err = gateway.fetch::<Vec<serde_json::Value>>("/doctors").await.unwrap_err();

        assert!(matches!(err, ConsoleError::Network(_)));
        let toast = doc.toast().unwrap();
        assert_eq!(toast.kind, NotificationKind::Error);
        assert_eq!(toast.message, err.user_message());
    }

    #[tokio::test]
    async fn test_busy_shown_and_hidden_once_per_call() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/doctors")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        server
            .mock("GET", "/patients")
            .with_status(503)
            .create_async()
            .await;

        let (gateway, doc) = gateway_for(&server.url());
        gateway.fetch::<Vec<serde_json::Value>>("/doctors").await.unwrap();
        assert_eq!(doc.visibility_changes(BUSY_ELEMENT), vec![false, true]);

        gateway.fetch::<Vec<serde_json::Value>>("/patients").await.unwrap_err();
        assert_eq!(
            doc.visibility_changes(BUSY_ELEMENT),
            vec![false, true, false, true]
        );

        let (offline, offline_doc) = gateway_for("http://127.0.0.1:1");
        offline.request("/doctors", RequestOptions::get()).await.unwrap_err();
        assert_eq!(offline_doc.visibility_changes(BUSY_ELEMENT), vec![false, true]);
        assert!(offline_doc.is_hidden(BUSY_ELEMENT));
    }

    #[tokio::test]
    async fn test_default_content_type_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/doctors")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({
                "name": "Dr. A",
                "specialization": "Cardiology",
                "available": true
            })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":9,"name":"Dr. A","specialization":"Cardiology","available":true}"#)
            .create_async()
            .await;

        let (gateway, _doc) = gateway_for(&server.url());
        let options = RequestOptions::post()
            .json(&json!({"name": "Dr. A", "specialization": "Cardiology", "available": true}))
            .unwrap();
        let created = gateway.request("/doctors", options).await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(created["id"], 9);
    }

    #[tokio::test]
    async fn test_caller_headers_override_defaults() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/bills/5/pay")
            .match_header("content-type", "text/plain")
            .match_header("x-request-source", "console")
            .with_status(200)
            .create_async()
            .await;

        let (gateway, _doc) = gateway_for(&server.url());
        let options = RequestOptions::put()
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain"))
            .header(
                HeaderName::from_static("x-request-source"),
                HeaderValue::from_static("console"),
            );
        gateway.request("/bills/5/pay", options).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_query_parameters_are_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/bills")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("appointmentId".into(), "3".into()),
                Matcher::UrlEncoded("patientId".into(), "7".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":1,"appointmentId":3,"patientId":7,"amount":500.0,"status":"UNPAID"}"#)
            .create_async()
            .await;

        let (gateway, _doc) = gateway_for(&server.url());
        let options = RequestOptions::post()
            .query("appointmentId", 3)
            .query("patientId", 7);
        gateway.request("/bills", options).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_undecodable_json_is_a_failure() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/doctors/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"unexpected":true}"#)
            .create_async()
            .await;

        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Named {
            name: String,
        }

        let (gateway, doc) = gateway_for(&server.url());
        let err = gateway.fetch::<Named>("/doctors/1").await.unwrap_err();
        assert!(matches!(err, ConsoleError::Decode(_)));
        assert_eq!(doc.toast().unwrap().kind, NotificationKind::Error);
    }
}
