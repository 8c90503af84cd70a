use axum::{Json, debug_handler, extract::State, http::StatusCode};

use crate::{App, error::AppError, extract::Path, identity::AuthUser};

use super::{CommentError, CommentSubmission, StatusMessage, find_comment, find_question};

#[debug_handler]
pub async fn update_comment(
    State(ctx): State<App>,
    Path((meetup_id, question_id, id)): Path<(i32, i32, i32)>,
    AuthUser(user): AuthUser,
    submission: Result<crate::extract::Json<CommentSubmission>, AppError>,
) -> Result<Json<StatusMessage>, AppError> {
    let question = find_question(ctx.store.as_ref(), meetup_id, question_id).await?;
    let existing = find_comment(ctx.store.as_ref(), &question, id).await?;

    if !existing.comment.is_owned_by(user.id) {
        return Err(CommentError::UpdateForbidden.into());
    }

    let crate::extract::Json(submission) = submission?;
    let text = submission.validate()?;

    // only the text is writable, the owner and question stay as they are
    ctx.store
        .update_comment_text(existing.comment.id, &text)
        .await?
        .ok_or(CommentError::CommentNotFound)?;

    tracing::info!(comment_id = id, user_id = user.id, "Comment updated");

    Ok(Json(StatusMessage::new(
        StatusCode::OK,
        "Comment successfully updated.",
    )))
}
