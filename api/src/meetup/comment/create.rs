use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{
    App,
    error::AppError,
    extract::Path,
    identity::AuthUser,
    meetup::models::comment::{AuthoredComment, NewComment},
};

use super::{CommentPayload, CommentSubmission, find_question};

#[derive(Serialize, Debug)]
pub struct CommentCreated {
    comment: CommentPayload,
    message: &'static str,
}

#[debug_handler]
pub async fn create_comment(
    State(ctx): State<App>,
    Path((meetup_id, question_id)): Path<(i32, i32)>,
    AuthUser(user): AuthUser,
    submission: Result<crate::extract::Json<CommentSubmission>, AppError>,
) -> Result<(StatusCode, Json<CommentCreated>), AppError> {
    let question = find_question(ctx.store.as_ref(), meetup_id, question_id).await?;

    // the body is only looked at once the parents are known to exist
    let crate::extract::Json(submission) = submission?;
    let text = submission.validate()?;

    let comment = ctx
        .store
        .create_comment(NewComment {
            comment: text,
            created_by: user.id,
            question_id: question.id,
        })
        .await?;

    tracing::info!(
        comment_id = comment.id,
        question_id = question.id,
        user_id = user.id,
        "Comment created"
    );

    let comment = CommentPayload::new(
        AuthoredComment {
            comment,
            author_username: user.username,
        },
        &question,
    );

    Ok((
        StatusCode::CREATED,
        Json(CommentCreated {
            comment,
            message: "Comment successfully created.",
        }),
    ))
}
