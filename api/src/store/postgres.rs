use std::{num::NonZeroUsize, time::Duration};

use async_trait::async_trait;
use deadpool_runtime::Runtime;
use diesel::prelude::*;
use diesel_async::{
    AsyncPgConnection, RunQueryDsl,
    pooled_connection::{
        AsyncDieselConnectionManager,
        deadpool::{BuildError, Pool},
    },
};

use crate::{
    identity::models::user::User,
    meetup::models::{
        comment::{AuthoredComment, Comment, NewComment},
        question::Question,
    },
    schema::{comments, meetups, questions, sessions, users},
};

use super::{Store, StoreError};

pub type DbPool = Pool<AsyncPgConnection>;

pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    /// Builds the pool without opening a connection. `acquire_timeout` bounds
    /// both waiting for a free slot and establishing a new connection, so a
    /// saturated or unreachable database surfaces as `StoreError::Pool`.
    pub fn connect(
        database_url: &str,
        max_connections: NonZeroUsize,
        acquire_timeout: Duration,
    ) -> Result<Self, BuildError> {
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
        let pool = Pool::builder(manager)
            .max_size(max_connections.get())
            .wait_timeout(Some(acquire_timeout))
            .create_timeout(Some(acquire_timeout))
            .runtime(Runtime::Tokio1)
            .build()?;

        Ok(Self { pool })
    }
}

fn authored((comment, author_username): (Comment, String)) -> AuthoredComment {
    AuthoredComment {
        comment,
        author_username,
    }
}

#[async_trait]
impl Store for PgStore {
    async fn meetup_exists(&self, meetup_id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        let exists = diesel::select(diesel::dsl::exists(
            meetups::table.filter(meetups::id.eq(meetup_id)),
        ))
        .get_result::<bool>(&mut conn)
        .await?;

        Ok(exists)
    }

    async fn find_question(
        &self,
        meetup_id: i32,
        question_id: i32,
    ) -> Result<Option<Question>, StoreError> {
        let mut conn = self.pool.get().await?;

        let question = questions::table
            .filter(questions::id.eq(question_id))
            .filter(questions::meetup_id.eq(meetup_id))
            .select(Question::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(question)
    }

    async fn list_comments(&self, question_id: i32) -> Result<Vec<AuthoredComment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let rows = comments::table
            .inner_join(users::table)
            .filter(comments::question_id.eq(question_id))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((Comment::as_select(), users::username))
            .load::<(Comment, String)>(&mut conn)
            .await?;

        Ok(rows.into_iter().map(authored).collect())
    }

    async fn find_comment(
        &self,
        question_id: i32,
        comment_id: i32,
    ) -> Result<Option<AuthoredComment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let row = comments::table
            .inner_join(users::table)
            .filter(comments::id.eq(comment_id))
            .filter(comments::question_id.eq(question_id))
            .select((Comment::as_select(), users::username))
            .first::<(Comment, String)>(&mut conn)
            .await
            .optional()?;

        Ok(row.map(authored))
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError> {
        let mut conn = self.pool.get().await?;

        let comment = diesel::insert_into(comments::table)
            .values(&new_comment)
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await?;

        Ok(comment)
    }

    async fn update_comment_text(
        &self,
        comment_id: i32,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        let mut conn = self.pool.get().await?;

        let comment = diesel::update(comments::table.find(comment_id))
            .set(comments::comment.eq(text))
            .returning(Comment::as_returning())
            .get_result(&mut conn)
            .await
            .optional()?;

        Ok(comment)
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<bool, StoreError> {
        let mut conn = self.pool.get().await?;

        let deleted = diesel::delete(comments::table.find(comment_id))
            .execute(&mut conn)
            .await?;

        Ok(deleted > 0)
    }

    async fn find_user_by_session_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.pool.get().await?;

        let user = sessions::table
            .inner_join(users::table)
            .filter(sessions::token.eq(token))
            .filter(sessions::active.eq(true))
            .filter(sessions::expires_at.gt(diesel::dsl::now))
            .filter(sessions::issued_at.le(diesel::dsl::now))
            .select(User::as_select())
            .first(&mut conn)
            .await
            .optional()?;

        Ok(user)
    }
}
