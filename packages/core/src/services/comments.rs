//! Comment collaborator
//!
//! Comments reference a block by id but live outside the document tree.
//! [`CommentStore`] is CRUD over `(resource_id, block_id) -> [Comment]`;
//! [`InMemoryCommentStore`] backs tests and previews.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub resource_id: String,
    pub block_id: String,
    pub author: String,
    pub body: String,
    #[serde(default)]
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for [`CommentStore::create`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    pub author: String,
    pub body: String,
}

impl NewComment {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommentError {
    #[error("Comment not found: {id}")]
    NotFound { id: String },

    #[error("Comment body cannot be empty")]
    EmptyBody,

    #[error("Comment backend failed: {0}")]
    Backend(String),
}

impl CommentError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }
}

#[async_trait]
pub trait CommentStore: Send + Sync {
    /// Comments on one block, oldest first
    async fn list(&self, resource_id: &str, block_id: &str) -> Result<Vec<Comment>, CommentError>;

    async fn create(
        &self,
        resource_id: &str,
        block_id: &str,
        comment: NewComment,
    ) -> Result<Comment, CommentError>;

    async fn update(&self, comment_id: &str, body: &str) -> Result<Comment, CommentError>;

    async fn delete(&self, comment_id: &str) -> Result<(), CommentError>;

    async fn resolve(&self, comment_id: &str, resolved: bool) -> Result<Comment, CommentError>;
}

/// Comment store held in process memory
#[derive(Debug, Default)]
pub struct InMemoryCommentStore {
    comments: RwLock<HashMap<String, Comment>>,
}

impl InMemoryCommentStore {
    pub fn new() -> Self {
        Self::default()
    }

    async fn modify(
        &self,
        comment_id: &str,
        change: impl FnOnce(&mut Comment),
    ) -> Result<Comment, CommentError> {
        let mut comments = self.comments.write().await;
        let comment = comments
            .get_mut(comment_id)
            .ok_or_else(|| CommentError::not_found(comment_id))?;
        change(comment);
        comment.updated_at = Utc::now();
        Ok(comment.clone())
    }
}

#[async_trait]
impl CommentStore for InMemoryCommentStore {
    async fn list(&self, resource_id: &str, block_id: &str) -> Result<Vec<Comment>, CommentError> {
        let comments = self.comments.read().await;
        let mut found: Vec<Comment> = comments
            .values()
            .filter(|c| c.resource_id == resource_id && c.block_id == block_id)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(found)
    }

    async fn create(
        &self,
        resource_id: &str,
        block_id: &str,
        comment: NewComment,
    ) -> Result<Comment, CommentError> {
        if comment.body.trim().is_empty() {
            return Err(CommentError::EmptyBody);
        }
        let now = Utc::now();
        let created = Comment {
            id: Uuid::new_v4().to_string(),
            resource_id: resource_id.to_string(),
            block_id: block_id.to_string(),
            author: comment.author,
            body: comment.body,
            resolved: false,
            created_at: now,
            updated_at: now,
        };
        self.comments
            .write()
            .await
            .insert(created.id.clone(), created.clone());
        tracing::debug!("Created comment {} on block {}", created.id, block_id);
        Ok(created)
    }

    async fn update(&self, comment_id: &str, body: &str) -> Result<Comment, CommentError> {
        if body.trim().is_empty() {
            return Err(CommentError::EmptyBody);
        }
        self.modify(comment_id, |c| c.body = body.to_string()).await
    }

    async fn delete(&self, comment_id: &str) -> Result<(), CommentError> {
        self.comments
            .write()
            .await
            .remove(comment_id)
            .map(|_| ())
            .ok_or_else(|| CommentError::not_found(comment_id))
    }

    async fn resolve(&self, comment_id: &str, resolved: bool) -> Result<Comment, CommentError> {
        self.modify(comment_id, |c| c.resolved = resolved).await
    }
}
