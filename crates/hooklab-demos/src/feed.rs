//! Comment listing client used by the effect demo.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_COMMENTS_URL: &str = "https://jsonplaceholder.typicode.com/comments";

#[derive(Clone, Debug)]
pub struct FeedConfig {
    pub url: String,
    /// Whole-request timeout. `None` keeps the client default.
    pub timeout: Option<Duration>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_COMMENTS_URL.to_string(),
            timeout: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("comment listing was empty")]
    EmptyListing,
}

/// Source of the first comment's email. Called from a worker thread.
pub trait CommentFeed: Send + Sync {
    fn first_email(&self) -> Result<String, FeedError>;
}

#[derive(Debug, Deserialize)]
struct Comment {
    email: String,
}

pub struct HttpCommentFeed {
    client: reqwest::blocking::Client,
    config: FeedConfig,
}

impl HttpCommentFeed {
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(t) = config.timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    pub fn url(&self) -> &str {
        &self.config.url
    }
}

impl CommentFeed for HttpCommentFeed {
    fn first_email(&self) -> Result<String, FeedError> {
        log::debug!("GET {}", self.config.url);
        let comments: Vec<Comment> = self
            .client
            .get(&self.config.url)
            .send()?
            .error_for_status()?
            .json()?;
        first_email(comments)
    }
}

fn first_email(comments: Vec<Comment>) -> Result<String, FeedError> {
    comments
        .into_iter()
        .next()
        .map(|c| c.email)
        .ok_or(FeedError::EmptyListing)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_email_and_ignores_other_fields() {
        let body = r#"[
            {"postId": 1, "id": 1, "name": "a", "email": "Eliseo@gardner.biz", "body": "..."},
            {"postId": 1, "id": 2, "name": "b", "email": "Jayne_Kuhic@sydney.com", "body": "..."}
        ]"#;
        let comments: Vec<Comment> = serde_json::from_str(body).unwrap();
        assert_eq!(first_email(comments).unwrap(), "Eliseo@gardner.biz");
    }

    #[test]
    fn empty_listing_is_an_error() {
        assert!(matches!(first_email(Vec::new()), Err(FeedError::EmptyListing)));
    }

    #[test]
    fn default_config_points_at_the_public_listing() {
        let config = FeedConfig::default();
        assert_eq!(config.url, DEFAULT_COMMENTS_URL);
        assert!(config.timeout.is_none());
    }
}
