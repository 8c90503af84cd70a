pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;


use axum::http::StatusCode;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiRequestError, AppError},
    meetup::models::{comment::AuthoredComment, question::Question},
    store::Store,
};

pub const MAX_COMMENT_LENGTH: usize = 5000;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum CommentError {
    #[error("Meetup not found.")]
    MeetupNotFound,

    #[error("Question not found.")]
    QuestionNotFound,

    #[error("Comment not found.")]
    CommentNotFound,

    #[error("Fields cannot be left empty or missing.")]
    MissingFields,

    #[error("Comment too long (max 5000 characters).")]
    TooLong,

    #[error("You cannot update this comment.")]
    UpdateForbidden,

    #[error("You cannot delete this comment.")]
    DeleteForbidden,
}

impl ApiRequestError for CommentError {
    fn status_code(&self) -> StatusCode {
        match self {
            CommentError::MeetupNotFound
            | CommentError::QuestionNotFound
            | CommentError::CommentNotFound => StatusCode::NOT_FOUND,
            CommentError::MissingFields | CommentError::TooLong => StatusCode::BAD_REQUEST,
            CommentError::UpdateForbidden | CommentError::DeleteForbidden => {
                StatusCode::FORBIDDEN
            }
        }
    }
}

// The model that will be returned to the client
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct CommentPayload {
    pub id: i32,
    pub question: i32,
    pub comment: String,
    pub created_by: String,
    pub created_by_id: i32,
    pub question_name: String,
    pub created_at: NaiveDateTime,
}

impl CommentPayload {
    pub fn new(authored: AuthoredComment, question: &Question) -> Self {
        let AuthoredComment {
            comment,
            author_username,
        } = authored;

        CommentPayload {
            id: comment.id,
            question: comment.question_id,
            comment: comment.comment,
            created_by: author_username,
            created_by_id: comment.created_by,
            question_name: question.title.clone(),
            created_at: comment.created_at,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CommentSubmission {
    #[serde(default)]
    comment: Option<String>,
}

impl CommentSubmission {
    /// Returns the trimmed comment text.
    fn validate(self) -> Result<String, CommentError> {
        let text = self
            .comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(CommentError::MissingFields)?;

        if text.chars().count() > MAX_COMMENT_LENGTH {
            return Err(CommentError::TooLong);
        }

        Ok(text)
    }
}

#[derive(Serialize, Debug)]
pub struct StatusMessage {
    pub status: u16,
    pub message: &'static str,
}

impl StatusMessage {
    pub fn new(status: StatusCode, message: &'static str) -> Self {
        StatusMessage {
            status: status.as_u16(),
            message,
        }
    }
}

/// Checks the meetup, then the question within that meetup.
async fn find_question(
    store: &dyn Store,
    meetup_id: i32,
    question_id: i32,
) -> Result<Question, AppError> {
    if !store.meetup_exists(meetup_id).await? {
        return Err(CommentError::MeetupNotFound.into());
    }

    let question = store
        .find_question(meetup_id, question_id)
        .await?
        .ok_or(CommentError::QuestionNotFound)?;

    Ok(question)
}

async fn find_comment(
    store: &dyn Store,
    question: &Question,
    comment_id: i32,
) -> Result<AuthoredComment, AppError> {
    let comment = store
        .find_comment(question.id, comment_id)
        .await?
        .ok_or(CommentError::CommentNotFound)?;

    Ok(comment)
}
