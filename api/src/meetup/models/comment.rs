use chrono::NaiveDateTime;
use diesel::prelude::*;

#[derive(Queryable, Selectable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Comment {
    pub id: i32,
    pub comment: String,
    pub created_by: i32,
    pub question_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::comments)]
pub struct NewComment {
    pub comment: String,
    pub created_by: i32,
    pub question_id: i32,
}

/// A comment joined with its author's username.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthoredComment {
    pub comment: Comment,
    pub author_username: String,
}

impl Comment {
    pub fn is_owned_by(&self, user_id: i32) -> bool {
        self.created_by == user_id
    }
}
