//! Per-user event queues in front of the state machine.
//!
//! Events of one user are processed strictly one at a time, in arrival order; each user gets an
//! unbounded queue drained by its own task, so a slow geocoding call only delays that user.
//!
//! **Data flow:** [`WizardService::submit`] → per-user queue → `process_queue_loop` →
//! [`ConversationStateMachine::handle_event`].

use crate::machine::ConversationStateMachine;
use dashmap::DashMap;
use filterbot_core::{InboundEvent, WizardError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

type QueueSender = mpsc::UnboundedSender<InboundEvent>;

pub struct WizardService {
    machine: Arc<ConversationStateMachine>,
    queues: DashMap<i64, QueueSender>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl WizardService {
    pub fn new(machine: Arc<ConversationStateMachine>) -> Self {
        Self {
            machine,
            queues: DashMap::new(),
            workers: Mutex::new(Vec::new()),
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueues `event` on its user's queue and returns immediately. Must be called from within a
    /// tokio runtime. Events without a user, or submitted after [`shutdown`](Self::shutdown), are
    /// dropped.
    pub fn submit(&self, event: InboundEvent) {
        let Some(user_id) = event.user.as_ref().map(|u| u.id) else {
            let e = WizardError::MissingUserIdentity;
            warn!(chat_id = event.chat.id, error = %e, "Event dropped");
            return;
        };
        if self.closed.load(Ordering::SeqCst) {
            warn!(user_id = user_id, "Wizard service is shut down, event dropped");
            return;
        }

        debug!(user_id = user_id, kind = event.kind.name(), "Queuing wizard event");
        let tx = self
            .queues
            .entry(user_id)
            .or_insert_with(|| self.spawn_queue(user_id))
            .clone();

        if tx.send(event).is_err() {
            error!(user_id = user_id, "Failed to send event to queue (receiver dropped)");
        }
    }

    /// Number of users with a live queue.
    pub fn active_queues(&self) -> usize {
        self.queues.len()
    }

    /// Stops accepting events, closes every queue and waits until queued events are processed.
    pub async fn shutdown(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.queues.clear();

        let workers = match self.workers.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        };
        info!(workers = workers.len(), "Waiting for wizard queues to drain");
        for worker in workers {
            if let Err(e) = worker.await {
                error!(error = %e, "Wizard queue task failed");
            }
        }
        info!("Wizard service stopped");
    }

    fn spawn_queue(&self, user_id: i64) -> QueueSender {
        let (tx, rx) = mpsc::unbounded_channel::<InboundEvent>();
        let handle = tokio::spawn(Self::process_queue_loop(rx, self.machine.clone(), user_id));
        match self.workers.lock() {
            Ok(mut workers) => workers.push(handle),
            Err(poisoned) => poisoned.into_inner().push(handle),
        }
        tx
    }

    async fn process_queue_loop(
        mut rx: mpsc::UnboundedReceiver<InboundEvent>,
        machine: Arc<ConversationStateMachine>,
        user_id: i64,
    ) {
        while let Some(event) = rx.recv().await {
            debug!(user_id = user_id, kind = event.kind.name(), "Processing queued event");
            if let Err(e) = machine.handle_event(&event).await {
                error!(error = %e, user_id = user_id, "Failed to process wizard event");
            }
        }
        debug!(user_id = user_id, "Wizard queue closed");
    }
}
