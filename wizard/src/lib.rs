//! # wizard
//!
//! Multi-turn wizard that assembles a real-estate search filter (category, city, currency, price
//! range) one step at a time.
//!
//! - [`context`] – `WizardStep`, `WizardContext`, `ContextPatch`, `PriceBound`, `RenderAnchor`
//! - [`state_store`] – per-user context store (`WizardStateStore`, `InMemoryStateStore`)
//! - [`payload`] – button payload encoding and parsing
//! - [`render`] – user-facing texts, keyboards and the progressive summary card
//! - [`machine`] – `ConversationStateMachine`: table-driven `(step, event)` dispatch
//! - [`service`] – `WizardService`: one worker queue per user
//!
//! **Data flow:** transport → [`WizardService::submit`] → per-user queue →
//! [`ConversationStateMachine::handle_event`] → state store / geocoder / filter store → [`Bot`](filterbot_core::Bot) render.

pub mod context;
pub mod machine;
pub mod payload;
pub mod render;
pub mod service;
pub mod state_store;

pub use context::{ContextPatch, PriceBound, RenderAnchor, WizardContext, WizardStep};
pub use machine::{route, ConversationStateMachine, EventClass, Transition, MAX_CANDIDATES, TRANSITIONS};
pub use service::WizardService;
pub use state_store::{InMemoryStateStore, StoreError, WizardStateStore};
