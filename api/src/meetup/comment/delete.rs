use axum::{Json, debug_handler, extract::State, http::StatusCode};

use crate::{App, error::AppError, extract::Path, identity::AuthUser};

use super::{CommentError, StatusMessage, find_comment, find_question};

#[debug_handler]
pub async fn delete_comment(
    State(ctx): State<App>,
    Path((meetup_id, question_id, id)): Path<(i32, i32, i32)>,
    AuthUser(user): AuthUser,
) -> Result<(StatusCode, Json<StatusMessage>), AppError> {
    let question = find_question(ctx.store.as_ref(), meetup_id, question_id).await?;
    let existing = find_comment(ctx.store.as_ref(), &question, id).await?;

    if !existing.comment.is_owned_by(user.id) {
        return Err(CommentError::DeleteForbidden.into());
    }

    if !ctx.store.delete_comment(existing.comment.id).await? {
        return Err(CommentError::CommentNotFound.into());
    }

    tracing::info!(comment_id = id, user_id = user.id, "Comment deleted");

    Ok((
        StatusCode::NO_CONTENT,
        Json(StatusMessage::new(
            StatusCode::NO_CONTENT,
            "Comment successfully deleted.",
        )),
    ))
}
