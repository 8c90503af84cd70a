use axum::{Json, debug_handler, extract::State, http::StatusCode};
use serde::Serialize;

use crate::{App, error::AppError, extract::Path, identity::AuthUser};

use super::{CommentPayload, find_comment, find_question};

#[derive(Serialize, Debug)]
pub struct CommentDetail {
    status: u16,
    comment: CommentPayload,
}

#[debug_handler]
pub async fn get_comment(
    State(ctx): State<App>,
    Path((meetup_id, question_id, id)): Path<(i32, i32, i32)>,
    AuthUser(_user): AuthUser,
) -> Result<Json<CommentDetail>, AppError> {
    let question = find_question(ctx.store.as_ref(), meetup_id, question_id).await?;
    let comment = find_comment(ctx.store.as_ref(), &question, id).await?;

    Ok(Json(CommentDetail {
        status: StatusCode::OK.as_u16(),
        comment: CommentPayload::new(comment, &question),
    }))
}
