//! Per-user wizard context store.
//!
//! Every operation is atomic per user key; different keys never contend on a global lock.
//! [`InMemoryStateStore`] keeps contexts in a [`DashMap`] (sharded locks), which is enough for a
//! single process. Another backend only has to implement [`WizardStateStore`].

use crate::context::{ContextPatch, WizardContext};
use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A compare-and-merge found a newer context than the one the caller read.
    #[error("Stale update: expected generation {expected}, found {found}")]
    Stale { expected: u64, found: u64 },
}

#[async_trait]
pub trait WizardStateStore: Send + Sync {
    /// Current context of the user; a fresh `Idle` context when none exists.
    async fn get(&self, user_id: i64) -> WizardContext;

    /// Applies `patch` atomically, bumps the generation and returns the committed context.
    /// Honors [`ContextPatch::expected_generation`].
    async fn merge(&self, user_id: i64, patch: ContextPatch) -> Result<WizardContext, StoreError>;

    /// Resets the user's context to defaults. The generation keeps increasing.
    async fn clear(&self, user_id: i64);
}

#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    contexts: DashMap<i64, WizardContext>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a stored context.
    pub fn len(&self) -> usize {
        self.contexts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contexts.is_empty()
    }
}

#[async_trait]
impl WizardStateStore for InMemoryStateStore {
    async fn get(&self, user_id: i64) -> WizardContext {
        self.contexts.entry(user_id).or_default().clone()
    }

    async fn merge(&self, user_id: i64, patch: ContextPatch) -> Result<WizardContext, StoreError> {
        let mut ctx = self.contexts.entry(user_id).or_default();
        if let Some(expected) = patch.expected_generation {
            if ctx.generation != expected {
                return Err(StoreError::Stale {
                    expected,
                    found: ctx.generation,
                });
            }
        }
        patch.apply(&mut ctx);
        ctx.generation += 1;
        debug!(
            user_id = user_id,
            step = %ctx.step,
            generation = ctx.generation,
            "Wizard context merged"
        );
        Ok(ctx.clone())
    }

    async fn clear(&self, user_id: i64) {
        let mut ctx = self.contexts.entry(user_id).or_default();
        let generation = ctx.generation + 1;
        *ctx = WizardContext {
            generation,
            ..WizardContext::default()
        };
        debug!(user_id = user_id, generation = generation, "Wizard context cleared");
    }
}
