use std::sync::{Arc, Mutex};

use crate::backend::{
    AnnotatedComment, BackendError, Client, CommentPage, RawComment, SentimentCounts,
    SentimentPoint, Topic,
};

pub trait CommentSource: Send + Sync {
    fn fetch_page(&self, video_id: &str, page_token: &str) -> Result<CommentPage, BackendError>;
}

pub trait SentimentService: Send + Sync {
    fn predict(&self, comments: &[RawComment]) -> Result<Vec<AnnotatedComment>, BackendError>;
}

pub trait ThemeService: Send + Sync {
    fn extract_topics(&self, texts: &[String]) -> Result<Vec<Topic>, BackendError>;
}

pub trait ChartService: Send + Sync {
    fn render_distribution(&self, counts: &SentimentCounts) -> Result<Vec<u8>, BackendError>;
    fn render_trend(&self, points: &[SentimentPoint]) -> Result<Vec<u8>, BackendError>;
    fn render_wordcloud(&self, texts: &[String]) -> Result<Vec<u8>, BackendError>;
}

pub struct BackendCommentSource {
    client: Arc<Client>,
}

impl BackendCommentSource {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl CommentSource for BackendCommentSource {
    fn fetch_page(&self, video_id: &str, page_token: &str) -> Result<CommentPage, BackendError> {
        self.client.fetch_comment_page(video_id, page_token)
    }
}

pub struct BackendSentimentService {
    client: Arc<Client>,
}

impl BackendSentimentService {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl SentimentService for BackendSentimentService {
    fn predict(&self, comments: &[RawComment]) -> Result<Vec<AnnotatedComment>, BackendError> {
        self.client.predict_with_timestamps(comments)
    }
}

pub struct BackendThemeService {
    client: Arc<Client>,
}

impl BackendThemeService {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl ThemeService for BackendThemeService {
    fn extract_topics(&self, texts: &[String]) -> Result<Vec<Topic>, BackendError> {
        self.client.extract_topics(texts)
    }
}

pub struct BackendChartService {
    client: Arc<Client>,
}

impl BackendChartService {
    pub fn new(client: Arc<Client>) -> Self {
        Self { client }
    }
}

impl ChartService for BackendChartService {
    fn render_distribution(&self, counts: &SentimentCounts) -> Result<Vec<u8>, BackendError> {
        self.client.generate_chart(counts)
    }

    fn render_trend(&self, points: &[SentimentPoint]) -> Result<Vec<u8>, BackendError> {
        self.client.generate_trend_graph(points)
    }

    fn render_wordcloud(&self, texts: &[String]) -> Result<Vec<u8>, BackendError> {
        self.client.generate_wordcloud(texts)
    }
}

/// Serves a scripted sequence of pages and records the tokens it was asked
/// for. Once the script runs out it hands back empty pages.
#[derive(Default)]
pub struct MockCommentSource {
    pages: Vec<CommentPage>,
    cursor: Mutex<usize>,
    tokens_seen: Mutex<Vec<String>>,
    error: Option<String>,
}

impl MockCommentSource {
    pub fn new(pages: Vec<CommentPage>) -> Self {
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn tokens_seen(&self) -> Vec<String> {
        self.tokens_seen.lock().unwrap().clone()
    }
}

impl CommentSource for MockCommentSource {
    fn fetch_page(&self, _video_id: &str, page_token: &str) -> Result<CommentPage, BackendError> {
        self.tokens_seen
            .lock()
            .unwrap()
            .push(page_token.to_string());
        if let Some(message) = &self.error {
            return Err(BackendError::Api(message.clone()));
        }
        let mut cursor = self.cursor.lock().unwrap();
        let page = self.pages.get(*cursor).cloned().unwrap_or_default();
        *cursor += 1;
        Ok(page)
    }
}

#[derive(Default)]
pub struct MockSentimentService {
    annotations: Vec<AnnotatedComment>,
    error: Option<String>,
}

impl MockSentimentService {
    pub fn new(annotations: Vec<AnnotatedComment>) -> Self {
        Self {
            annotations,
            error: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            annotations: Vec::new(),
            error: Some(message.to_string()),
        }
    }
}

impl SentimentService for MockSentimentService {
    fn predict(&self, _comments: &[RawComment]) -> Result<Vec<AnnotatedComment>, BackendError> {
        match &self.error {
            Some(message) => Err(BackendError::Api(message.clone())),
            None => Ok(self.annotations.clone()),
        }
    }
}

#[derive(Default)]
pub struct MockThemeService {
    topics: Vec<Topic>,
    error: Option<String>,
    unreachable: bool,
}

impl MockThemeService {
    pub fn new(topics: Vec<Topic>) -> Self {
        Self {
            topics,
            ..Self::default()
        }
    }

    /// An answered failure, as if the backend returned an error payload.
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// A failure below the HTTP layer, with no backend answer at all.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }
}

impl ThemeService for MockThemeService {
    fn extract_topics(&self, _texts: &[String]) -> Result<Vec<Topic>, BackendError> {
        if self.unreachable {
            return Err(BackendError::Endpoint(url::ParseError::EmptyHost));
        }
        match &self.error {
            Some(message) => Err(BackendError::Api(message.clone())),
            None => Ok(self.topics.clone()),
        }
    }
}

#[derive(Default)]
pub struct MockChartService {
    image: Vec<u8>,
    error: Option<String>,
}

impl MockChartService {
    pub fn new(image: Vec<u8>) -> Self {
        Self { image, error: None }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            image: Vec::new(),
            error: Some(message.to_string()),
        }
    }

    fn respond(&self) -> Result<Vec<u8>, BackendError> {
        match &self.error {
            Some(message) => Err(BackendError::Api(message.clone())),
            None => Ok(self.image.clone()),
        }
    }
}

impl ChartService for MockChartService {
    fn render_distribution(&self, _counts: &SentimentCounts) -> Result<Vec<u8>, BackendError> {
        self.respond()
    }

    fn render_trend(&self, _points: &[SentimentPoint]) -> Result<Vec<u8>, BackendError> {
        self.respond()
    }

    fn render_wordcloud(&self, _texts: &[String]) -> Result<Vec<u8>, BackendError> {
        self.respond()
    }
}
