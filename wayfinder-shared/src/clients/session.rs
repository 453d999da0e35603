use uuid::Uuid;

use super::redis::RedisClient;
use crate::middleware::SessionId;

const SESSION_TTL_SECS: u64 = 60 * 60 * 24 * 7;

const CAPTCHA_REQUIRED_KEY: &str = "captcha_required";
const CAPTCHA_QUESTION_KEY: &str = "captcha_question";
const CAPTCHA_ANSWER_KEY: &str = "captcha_answer";
const GUEST_REVIEWED_KEY: &str = "guest_reviewed_places";

/// Redis-backed per-browser session state.
///
/// Holds only the anti-spam bookkeeping: the CAPTCHA challenge lifecycle and
/// the set of places a guest session has already reviewed. Values expire with
/// the session cookie.
#[derive(Clone)]
pub struct SessionStore {
    redis: RedisClient,
}

impl SessionStore {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    fn key(session_id: SessionId, suffix: &str) -> String {
        format!("sess:{session_id}:{suffix}")
    }

    pub async fn captcha_required(&self, session_id: SessionId) -> Result<bool, redis::RedisError> {
        let flag = self.redis.get(&Self::key(session_id, CAPTCHA_REQUIRED_KEY)).await?;
        Ok(flag.as_deref() == Some("1"))
    }

    /// Arm the CAPTCHA and drop any cached challenge so the next render
    /// generates a fresh question.
    pub async fn require_captcha(&self, session_id: SessionId) -> Result<(), redis::RedisError> {
        self.redis
            .set(&Self::key(session_id, CAPTCHA_REQUIRED_KEY), "1", SESSION_TTL_SECS)
            .await?;
        self.redis
            .del(&[
                Self::key(session_id, CAPTCHA_QUESTION_KEY),
                Self::key(session_id, CAPTCHA_ANSWER_KEY),
            ])
            .await
    }

    pub async fn captcha_question(&self, session_id: SessionId) -> Result<Option<String>, redis::RedisError> {
        self.redis.get(&Self::key(session_id, CAPTCHA_QUESTION_KEY)).await
    }

    pub async fn captcha_answer(&self, session_id: SessionId) -> Result<Option<String>, redis::RedisError> {
        self.redis.get(&Self::key(session_id, CAPTCHA_ANSWER_KEY)).await
    }

    pub async fn store_captcha(
        &self,
        session_id: SessionId,
        question: &str,
        answer: &str,
    ) -> Result<(), redis::RedisError> {
        self.redis
            .set(&Self::key(session_id, CAPTCHA_QUESTION_KEY), question, SESSION_TTL_SECS)
            .await?;
        self.redis
            .set(&Self::key(session_id, CAPTCHA_ANSWER_KEY), answer, SESSION_TTL_SECS)
            .await
    }

    pub async fn clear_captcha(&self, session_id: SessionId) -> Result<(), redis::RedisError> {
        self.redis
            .del(&[
                Self::key(session_id, CAPTCHA_REQUIRED_KEY),
                Self::key(session_id, CAPTCHA_QUESTION_KEY),
                Self::key(session_id, CAPTCHA_ANSWER_KEY),
            ])
            .await
    }

    pub async fn guest_has_reviewed(
        &self,
        session_id: SessionId,
        place_id: Uuid,
    ) -> Result<bool, redis::RedisError> {
        self.redis
            .sismember(&Self::key(session_id, GUEST_REVIEWED_KEY), &place_id.to_string())
            .await
    }

    pub async fn mark_guest_reviewed(
        &self,
        session_id: SessionId,
        place_id: Uuid,
    ) -> Result<(), redis::RedisError> {
        self.redis
            .sadd(
                &Self::key(session_id, GUEST_REVIEWED_KEY),
                &place_id.to_string(),
                SESSION_TTL_SECS,
            )
            .await
    }
}
