use std::{
    collections::{HashMap, HashSet},
    sync::{
        Mutex, MutexGuard,
        atomic::{AtomicBool, Ordering},
    },
};

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};

use crate::{
    identity::models::user::User,
    meetup::models::{
        comment::{AuthoredComment, Comment, NewComment},
        question::Question,
    },
};

use super::{Store, StoreError};

/// In-memory store for driving the router in tests.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    unavailable: AtomicBool,
}

#[derive(Default)]
struct State {
    meetups: HashSet<i32>,
    questions: Vec<Question>,
    users: Vec<User>,
    sessions: HashMap<String, Session>,
    comments: Vec<Comment>,
    next_comment_id: i32,
}

/// Mirrors the columns of the `sessions` table that decide validity.
struct Session {
    user_id: i32,
    active: bool,
    issued_at: NaiveDateTime,
    expires_at: NaiveDateTime,
}

impl Session {
    fn is_valid_at(&self, now: NaiveDateTime) -> bool {
        self.active && self.issued_at <= now && now < self.expires_at
    }
}

impl State {
    fn authored(&self, comment: &Comment) -> Option<AuthoredComment> {
        self.users
            .iter()
            .find(|u| u.id == comment.created_by)
            .map(|u| AuthoredComment {
                comment: comment.clone(),
                author_username: u.username.clone(),
            })
    }
}

impl MemoryStore {
    pub fn with_meetup(self, id: i32) -> Self {
        self.lock().meetups.insert(id);
        self
    }

    pub fn with_question(self, id: i32, meetup_id: i32, title: &str) -> Self {
        self.lock().questions.push(Question {
            id,
            meetup_id,
            title: title.to_string(),
        });
        self
    }

    /// Adds a user with a live session issued an hour ago for a day.
    pub fn with_user(self, id: i32, username: &str, session_token: &str) -> Self {
        self.lock().users.push(User {
            id,
            username: username.to_string(),
        });
        let now = Utc::now().naive_utc();
        self.with_session(
            id,
            session_token,
            true,
            now - Duration::hours(1),
            now + Duration::days(1),
        )
    }

    pub fn with_session(
        self,
        user_id: i32,
        token: &str,
        active: bool,
        issued_at: NaiveDateTime,
        expires_at: NaiveDateTime,
    ) -> Self {
        self.lock().sessions.insert(
            token.to_string(),
            Session {
                user_id,
                active,
                issued_at,
                expires_at,
            },
        );
        self
    }

    pub fn insert_comment(&self, question_id: i32, created_by: i32, text: &str) -> Comment {
        let mut state = self.lock();
        state.next_comment_id += 1;
        let comment = Comment {
            id: state.next_comment_id,
            comment: text.to_string(),
            created_by,
            question_id,
            created_at: Utc::now().naive_utc(),
        };
        state.comments.push(comment.clone());
        comment
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.lock().comments.clone()
    }

    pub fn comment(&self, id: i32) -> Option<Comment> {
        self.lock().comments.iter().find(|c| c.id == id).cloned()
    }

    /// Makes every subsequent call fail like a lost database connection.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("memory store lock poisoned")
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Query(
                diesel::result::Error::BrokenTransactionManager,
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn meetup_exists(&self, meetup_id: i32) -> Result<bool, StoreError> {
        self.check()?;
        Ok(self.lock().meetups.contains(&meetup_id))
    }

    async fn find_question(
        &self,
        meetup_id: i32,
        question_id: i32,
    ) -> Result<Option<Question>, StoreError> {
        self.check()?;
        Ok(self
            .lock()
            .questions
            .iter()
            .find(|q| q.id == question_id && q.meetup_id == meetup_id)
            .cloned())
    }

    async fn list_comments(&self, question_id: i32) -> Result<Vec<AuthoredComment>, StoreError> {
        self.check()?;
        let state = self.lock();
        let mut comments: Vec<AuthoredComment> = state
            .comments
            .iter()
            .filter(|c| c.question_id == question_id)
            .filter_map(|c| state.authored(c))
            .collect();
        comments.sort_by_key(|c| (c.comment.created_at, c.comment.id));
        Ok(comments)
    }

    async fn find_comment(
        &self,
        question_id: i32,
        comment_id: i32,
    ) -> Result<Option<AuthoredComment>, StoreError> {
        self.check()?;
        let state = self.lock();
        Ok(state
            .comments
            .iter()
            .find(|c| c.id == comment_id && c.question_id == question_id)
            .and_then(|c| state.authored(c)))
    }

    async fn create_comment(&self, new_comment: NewComment) -> Result<Comment, StoreError> {
        self.check()?;
        Ok(self.insert_comment(
            new_comment.question_id,
            new_comment.created_by,
            &new_comment.comment,
        ))
    }

    async fn update_comment_text(
        &self,
        comment_id: i32,
        text: &str,
    ) -> Result<Option<Comment>, StoreError> {
        self.check()?;
        let mut state = self.lock();
        Ok(state
            .comments
            .iter_mut()
            .find(|c| c.id == comment_id)
            .map(|c| {
                c.comment = text.to_string();
                c.clone()
            }))
    }

    async fn delete_comment(&self, comment_id: i32) -> Result<bool, StoreError> {
        self.check()?;
        let mut state = self.lock();
        let before = state.comments.len();
        state.comments.retain(|c| c.id != comment_id);
        Ok(state.comments.len() < before)
    }

    async fn find_user_by_session_token(&self, token: &str) -> Result<Option<User>, StoreError> {
        self.check()?;
        let now = Utc::now().naive_utc();
        let state = self.lock();
        Ok(state
            .sessions
            .get(token)
            .filter(|session| session.is_valid_at(now))
            .and_then(|session| state.users.iter().find(|u| u.id == session.user_id))
            .cloned())
    }
}
