use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client as HttpClient, Response};
use reqwest::header::USER_AGENT;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("{0}")]
    Api(String),
    #[error("backend returned status {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("backend returned {got} annotations for {want} comments")]
    Misaligned { want: usize, got: usize },
    #[error("invalid backend endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub base_url: Option<String>,
    pub user_agent: String,
    pub request_timeout: Option<Duration>,
    pub http_client: Option<HttpClient>,
}

pub struct Client {
    http: HttpClient,
    user_agent: String,
    base_url: Url,
}

impl Client {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.user_agent.trim().is_empty() {
            bail!("backend client user agent required");
        }
        let base = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base)
            .with_context(|| format!("parse backend base url {base:?}"))?;

        let http = match config.http_client {
            Some(client) => client,
            // The backend owns quota management and may take arbitrarily long
            // on large videos, so calls run without a deadline unless one is
            // configured.
            None => HttpClient::builder()
                .timeout(config.request_timeout)
                .build()
                .context("build backend http client")?,
        };

        Ok(Client {
            http,
            user_agent: config.user_agent,
            base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// One page of comments. The first request carries an empty token; the
    /// backend controls the page size.
    pub fn fetch_comment_page(
        &self,
        video_id: &str,
        page_token: &str,
    ) -> Result<CommentPage, BackendError> {
        let body = json!({ "video_id": video_id, "page_token": page_token });
        let resp = self.post("/fetch_youtube_comments", &body)?;
        Ok(resp.json()?)
    }

    pub fn predict_with_timestamps(
        &self,
        comments: &[RawComment],
    ) -> Result<Vec<AnnotatedComment>, BackendError> {
        let body = json!({ "comments": comments });
        let resp = self.post("/predict_with_timestamps", &body)?;
        Ok(resp.json()?)
    }

    pub fn extract_topics(&self, texts: &[String]) -> Result<Vec<Topic>, BackendError> {
        let body = json!({ "comments": texts });
        let resp = self.post("/extract_topics", &body)?;
        Ok(resp.json()?)
    }

    pub fn generate_chart(&self, counts: &SentimentCounts) -> Result<Vec<u8>, BackendError> {
        let body = json!({ "sentiment_counts": counts });
        self.post_for_bytes("/generate_chart", &body)
    }

    pub fn generate_trend_graph(
        &self,
        points: &[SentimentPoint],
    ) -> Result<Vec<u8>, BackendError> {
        let body = json!({ "sentiment_data": points });
        self.post_for_bytes("/generate_trend_graph", &body)
    }

    pub fn generate_wordcloud(&self, texts: &[String]) -> Result<Vec<u8>, BackendError> {
        let body = json!({ "comments": texts });
        self.post_for_bytes("/generate_wordcloud", &body)
    }

    fn post(&self, path: &str, body: &serde_json::Value) -> Result<Response, BackendError> {
        let url = self.base_url.join(path)?;
        let resp = self
            .http
            .post(url)
            .header(USER_AGENT, &self.user_agent)
            .json(body)
            .send()?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let text = resp.text().unwrap_or_default();
        // Failure payloads are '{"error": "..."}' when the backend got far
        // enough to explain itself; the message is surfaced verbatim.
        match serde_json::from_str::<ErrorBody>(&text) {
            Ok(err) if !err.error.is_empty() => Err(BackendError::Api(err.error)),
            _ => Err(BackendError::Status { status, body: text }),
        }
    }

    fn post_for_bytes(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Vec<u8>, BackendError> {
        let resp = self.post(path, body)?;
        Ok(resp.bytes()?.to_vec())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawComment {
    #[serde(default)]
    pub id: String,
    pub text: String,
    #[serde(default, rename = "authorId")]
    pub author_id: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommentPage {
    #[serde(default)]
    pub comments: Vec<RawComment>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    #[serde(rename = "1")]
    Positive,
    #[serde(rename = "0")]
    Neutral,
    #[serde(rename = "-1")]
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// The wire encoding, also shown next to each listed comment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "1",
            Sentiment::Neutral => "0",
            Sentiment::Negative => "-1",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
        }
    }

    pub fn score(&self) -> i64 {
        match self {
            Sentiment::Positive => 1,
            Sentiment::Neutral => 0,
            Sentiment::Negative => -1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatedComment {
    pub comment: String,
    pub sentiment: Sentiment,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub theme: String,
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentCounts {
    #[serde(rename = "1")]
    pub positive: usize,
    #[serde(rename = "0")]
    pub neutral: usize,
    #[serde(rename = "-1")]
    pub negative: usize,
}

impl SentimentCounts {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn get(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentPoint {
    pub timestamp: String,
    pub sentiment: i64,
}
