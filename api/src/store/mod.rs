use async_trait::async_trait;
use diesel_async::pooled_connection::deadpool::PoolError;

use crate::{
    identity::models::user::User,
    meetup::models::{
        comment::{AuthoredComment, Comment, NewComment},
        question::Question,
    },
};

#[cfg(test)]
pub mod memory;
pub mod postgres;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Could not get a database connection: {0}")]
    Pool(#[from] PoolError),

    #[error("Database query failed: {0}")]
    Query(#[from] diesel::result::Error),
}

/// Record lookups and comment persistence used by the request handlers.
///
/// Every method runs as its own statement, nothing here is transactional
/// across calls.
#[async_trait]
pub trait Store: Send + Sync {
    async fn meetup_exists(&self, meetup_id: i32) -> Result<bool, StoreError>;

    /// Finds a question only if it belongs to the given meetup.
    async fn find_question(
        &self,
        meetup_id: i32,
        question_id: i32,
    ) -> Result<Option<Question>, StoreError>;

    /// Oldest first.
    async fn list_comments(&self, question_id: i32) -> Result<Vec<AuthoredComment>, StoreError>;

    async fn find_comment(
        &self,
        question_id: i32,
        comment_id: i32,
    ) -> Result<Option<AuthoredComment>, StoreError>;

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError>;

    /// Returns `None` when the comment no longer exists.
    async fn update_comment_text(
        &self,
        comment_id: i32,
        text: &str,
    ) -> Result<Option<Comment>, StoreError>;

    /// Returns whether a row was deleted.
    async fn delete_comment(&self, comment_id: i32) -> Result<bool, StoreError>;

    /// Resolves an active, unexpired session token to its user.
    async fn find_user_by_session_token(&self, token: &str) -> Result<Option<User>, StoreError>;
}
