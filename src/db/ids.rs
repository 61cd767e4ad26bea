// src/db/ids.rs

//! Identifier allocation for tasks and questions.
//!
//! Uniqueness is owned by the store: a candidate is claimed by inserting the
//! row under it, and a primary-key violation counts as a collision. There is
//! no separate existence query, so there is no window between check and
//! insert.

use std::{future::Future, pin::Pin, sync::Arc};

use uuid::Uuid;

use crate::{
    config::ID_MAX_ATTEMPTS,
    error::{TaskError, is_unique_violation},
};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Produces identifier candidates.
pub trait IdSource: Send + Sync {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidSource;

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Outcome of storing a row under a candidate identifier.
#[derive(Debug, PartialEq, Eq)]
pub enum Claim<T> {
    Claimed(T),
    Taken,
}

/// Interprets the result of an insert keyed by a candidate identifier.
pub fn claim_insert<R>(result: Result<R, sqlx::Error>) -> Result<Claim<R>, TaskError> {
    match result {
        Ok(value) => Ok(Claim::Claimed(value)),
        Err(e) if is_unique_violation(&e) => Ok(Claim::Taken),
        Err(e) => Err(e.into()),
    }
}

#[derive(Clone)]
pub struct IdAllocator {
    source: Arc<dyn IdSource>,
    max_attempts: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new(Arc::new(UuidSource), ID_MAX_ATTEMPTS)
    }
}

impl IdAllocator {
    pub fn new(source: Arc<dyn IdSource>, max_attempts: u32) -> Self {
        Self {
            source,
            max_attempts,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Draws candidates until `claim` stores one, at most `max_attempts` times.
    ///
    /// `claim` receives the context (usually the open transaction) and the
    /// candidate, and reports whether the candidate was free. Every collision
    /// is logged. Exhaustion is a hard error: no empty identifier is ever
    /// returned.
    pub async fn allocate<C, T, F>(
        &self,
        kind: &str,
        ctx: &mut C,
        mut claim: F,
    ) -> Result<(String, T), TaskError>
    where
        C: Send,
        T: Send,
        F: for<'c> FnMut(&'c mut C, String) -> BoxFuture<'c, Result<Claim<T>, TaskError>> + Send,
    {
        for attempt in 1..=self.max_attempts {
            let candidate = self.source.next_id();

            match claim(&mut *ctx, candidate.clone()).await? {
                Claim::Claimed(value) => return Ok((candidate, value)),
                Claim::Taken => {
                    tracing::warn!(
                        "{} id collision (attempt {}/{}): {}",
                        kind,
                        attempt,
                        self.max_attempts,
                        candidate
                    );
                }
            }
        }

        tracing::error!(
            "Failed to allocate a {} id after {} attempts",
            kind,
            self.max_attempts
        );
        Err(TaskError::AllocationExhausted(self.max_attempts))
    }
}

/// Hands out a fixed sequence of identifiers, then falls back to UUIDs.
#[cfg(test)]
pub(crate) struct SequenceSource(std::sync::Mutex<std::collections::VecDeque<String>>);

#[cfg(test)]
impl SequenceSource {
    pub(crate) fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(std::sync::Mutex::new(ids.into_iter().map(Into::into).collect()))
    }
}

#[cfg(test)]
impl IdSource for SequenceSource {
    fn next_id(&self) -> String {
        self.0
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }
}
