use axum::{Router, routing::get};

use crate::App;

use super::comment::{
    create::create_comment, delete::delete_comment, get::get_comment, list::list_comments,
    update::update_comment,
};

pub fn route() -> Router<App> {
    Router::<App>::new()
        .route(
            "/{meetup_id}/questions/{question_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/{meetup_id}/questions/{question_id}/comments/{id}",
            get(get_comment).put(update_comment).delete(delete_comment),
        )
}
