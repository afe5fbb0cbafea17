//! HTTP implementation of [`QuizService`]
//!
//! JSON over HTTP with a bearer token on every authenticated call.
//! Login is the one form-encoded request.

use crate::api::types::*;
use crate::api::QuizService;
use crate::config::ServerConfig;
use crate::error::{Result, SecquizError};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Quiz service reached over HTTP
///
/// # Examples
///
/// ```
/// use secquiz::api::HttpQuizService;
/// use secquiz::config::ServerConfig;
///
/// let service = HttpQuizService::new(&ServerConfig::default())
///     .unwrap()
///     .with_token("abc");
/// assert_eq!(service.base_url(), "http://localhost:8000/api");
/// assert!(service.has_token());
/// ```
#[derive(Debug, Clone)]
pub struct HttpQuizService {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpQuizService {
    /// Create a client for the configured server
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("secquiz/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SecquizError::Network(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = config.base_url.trim_end_matches('/').to_string();
        tracing::debug!("Initialized quiz service client: base_url={}", base_url);

        Ok(Self {
            client,
            base_url,
            token: None,
        })
    }

    /// Attach the bearer token used for authenticated calls
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether a bearer token is attached
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder> {
        match &self.token {
            Some(token) => Ok(builder.bearer_auth(token)),
            None => Err(SecquizError::NotAuthenticated.into()),
        }
    }

    async fn send<T: DeserializeOwned>(&self, what: &str, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("{} request failed: {}", what, e);
            SecquizError::Network(format!("{}: {}", what, e))
        })?;

        let response = check_status(what, response).await?;

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse {} response: {}", what, e);
            SecquizError::Decode(format!("{}: {}", what, e)).into()
        })
    }
}

/// Map a non-success response to a typed error
async fn check_status(what: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = extract_detail(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::error!("{} returned {}: {}", what, status, message);

    if status == StatusCode::UNAUTHORIZED {
        return Err(SecquizError::Authentication(message).into());
    }

    Err(SecquizError::Api {
        status: status.as_u16(),
        message,
    }
    .into())
}

/// Pull a message out of a `{"detail": ...}` error body
///
/// `detail` is either a string or a list of validation errors carrying
/// `msg` fields.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Array(items) => {
            let msgs: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(|m| m.as_str()))
                .collect();
            if msgs.is_empty() {
                None
            } else {
                Some(msgs.join("; "))
            }
        }
        other => Some(other.to_string()),
    }
}

#[async_trait]
impl QuizService for HttpQuizService {
    async fn login(&self, username: &str, password: &str) -> Result<TokenResponse> {
        let url = self.url("/auth/login");
        tracing::debug!("POST {}", url);
        let builder = self
            .client
            .post(&url)
            .form(&[("username", username), ("password", password)]);
        self.send("login", builder).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserInfo> {
        let url = self.url("/auth/register");
        tracing::debug!("POST {}", url);
        let builder = self.client.post(&url).json(request);
        self.send("register", builder).await
    }

    async fn current_user(&self) -> Result<UserInfo> {
        let url = self.url("/auth/me");
        tracing::debug!("GET {}", url);
        let builder = self.authorized(self.client.get(&url))?;
        self.send("current user", builder).await
    }

    async fn start_quiz(&self, topic: &str, number_of_questions: u32) -> Result<QuizStart> {
        let url = self.url("/quiz/start");
        tracing::debug!("POST {} topic={} count={}", url, topic, number_of_questions);
        let body = StartQuizRequest {
            topic: topic.to_string(),
            number_of_questions,
        };
        let builder = self.authorized(self.client.post(&url).json(&body))?;
        self.send("start quiz", builder).await
    }

    async fn submit_answer(
        &self,
        session_id: &str,
        submission: &AnswerSubmission,
    ) -> Result<AnswerResponse> {
        let url = self.url("/quiz/answer");
        tracing::debug!("POST {} session_id={}", url, session_id);
        let builder = self.authorized(
            self.client
                .post(&url)
                .query(&[("session_id", session_id)])
                .json(submission),
        )?;
        self.send("submit answer", builder).await
    }

    async fn complete_quiz(&self, session_id: &str) -> Result<QuizResults> {
        let url = self.url("/quiz/complete");
        tracing::debug!("POST {} session_id={}", url, session_id);
        let builder = self.authorized(
            self.client
                .post(&url)
                .query(&[("session_id", session_id)])
                .json(&serde_json::json!({})),
        )?;
        self.send("complete quiz", builder).await
    }

    async fn chat_message(&self, request: &ChatRequest) -> Result<ChatReply> {
        let url = self.url("/chat/message");
        tracing::debug!("POST {} topic={}", url, request.topic);
        let builder = self.authorized(self.client.post(&url).json(request))?;
        self.send("chat message", builder).await
    }

    async fn chat_answer(&self, request: &ChatAnswerRequest) -> Result<ChatAnswerResult> {
        let url = self.url("/chat/answer");
        tracing::debug!("POST {} question_id={}", url, request.question_id);
        let builder = self.authorized(self.client.post(&url).json(request))?;
        self.send("chat answer", builder).await
    }

    async fn performance(&self) -> Result<PerformanceReport> {
        let url = self.url("/analytics/performance");
        tracing::debug!("GET {}", url);
        let builder = self.authorized(self.client.get(&url))?;
        self.send("performance", builder).await
    }

    async fn history(&self, limit: u32) -> Result<Vec<HistoryEntry>> {
        let url = self.url("/analytics/history");
        tracing::debug!("GET {} limit={}", url, limit);
        let builder = self.authorized(self.client.get(&url).query(&[("limit", limit)]))?;
        self.send("history", builder).await
    }

    async fn progress_summary(&self) -> Result<ProgressSummary> {
        let url = self.url("/progress/summary");
        tracing::debug!("GET {}", url);
        let builder = self.authorized(self.client.get(&url))?;
        self.send("progress summary", builder).await
    }
}
