use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{App, error::AppError, extract::Path, identity::AuthUser};

use super::{CommentPayload, find_question};

#[derive(Serialize, Debug)]
pub struct CommentList {
    status: u16,
    comments: Vec<CommentPayload>,
}

#[debug_handler]
pub async fn list_comments(
    State(ctx): State<App>,
    Path((meetup_id, question_id)): Path<(i32, i32)>,
    AuthUser(_user): AuthUser,
) -> Result<Json<CommentList>, AppError> {
    let question = find_question(ctx.store.as_ref(), meetup_id, question_id).await?;

    let comments = ctx
        .store
        .list_comments(question.id)
        .await?
        .into_iter()
        .map(|c| CommentPayload::new(c, &question))
        .collect();

    Ok(Json(CommentList {
        status: StatusCode::OK.as_u16(),
        comments,
    }))
}
