//! Shared fixtures for wizard integration tests: mock collaborators, event builders and a
//! harness wiring them into a [`ConversationStateMachine`].
#![allow(dead_code)]

pub mod mock_bot;
pub mod mock_collaborators;

use filterbot_core::{Bot, Chat, EventKind, InboundEvent, User};
use geocoder::Geocoder;
use mock_bot::{MockBot, Rendered};
use mock_collaborators::{MockFilterStore, MockGeocoder};
use std::sync::Arc;
use storage::FilterStore;
use tokio::sync::mpsc;
use wizard::{
    ContextPatch, ConversationStateMachine, InMemoryStateStore, RenderAnchor, WizardStateStore,
    WizardStep,
};

pub const USER_ID: i64 = 42;
/// Id the mock bot assigns to the first sent message (the `/start` menu).
pub const MENU_MESSAGE_ID: i32 = 100;

pub fn user(id: i64) -> User {
    User {
        id,
        username: Some(format!("user{}", id)),
        first_name: Some("Олена".to_string()),
        last_name: None,
    }
}

/// Private chats share the user's id.
fn event(user_id: i64, kind: EventKind, message_id: Option<i32>) -> InboundEvent {
    InboundEvent {
        kind,
        user: Some(user(user_id)),
        chat: Chat {
            id: user_id,
            chat_type: "private".to_string(),
        },
        message_id,
    }
}

pub fn start(user_id: i64) -> InboundEvent {
    event(user_id, EventKind::CommandStart, Some(1))
}

pub fn cancel(user_id: i64) -> InboundEvent {
    event(user_id, EventKind::CommandCancel, Some(2))
}

pub fn text(user_id: i64, text: &str) -> InboundEvent {
    event(user_id, EventKind::TextInput(text.to_string()), Some(3))
}

/// Button press on the bot message `message_id`.
pub fn press(user_id: i64, payload: &str, message_id: i32) -> InboundEvent {
    event(
        user_id,
        EventKind::ButtonPress(payload.to_string()),
        Some(message_id),
    )
}

pub struct Harness {
    pub machine: Arc<ConversationStateMachine>,
    pub bot: Arc<MockBot>,
    pub renders: mpsc::UnboundedReceiver<Rendered>,
    pub geocoder: Arc<MockGeocoder>,
    pub states: Arc<InMemoryStateStore>,
    pub filters: Arc<MockFilterStore>,
}

pub fn harness(geocoder: MockGeocoder) -> Harness {
    let (bot, renders) = MockBot::with_receiver(MENU_MESSAGE_ID);
    let geocoder = Arc::new(geocoder);
    let states = Arc::new(InMemoryStateStore::new());
    let filters = Arc::new(MockFilterStore::default());
    let machine = Arc::new(ConversationStateMachine::new(
        bot.clone() as Arc<dyn Bot>,
        geocoder.clone() as Arc<dyn Geocoder>,
        states.clone() as Arc<dyn WizardStateStore>,
        filters.clone() as Arc<dyn FilterStore>,
    ));
    Harness {
        machine,
        bot,
        renders,
        geocoder,
        states,
        filters,
    }
}

impl Harness {
    pub async fn handle(&self, event: InboundEvent) {
        self.machine
            .handle_event(&event)
            .await
            .expect("handle_event must not fail with a working transport");
    }

    pub async fn step(&self, user_id: i64) -> WizardStep {
        self.states.get(user_id).await.step
    }

    /// Seeds a context as if the user had just picked "Купити квартиру" on the menu message.
    pub async fn seed_awaiting_city(&self, user_id: i64) {
        self.states
            .merge(
                user_id,
                ContextPatch::advance(WizardStep::AwaitingCity)
                    .category(1602, "Купити квартиру")
                    .anchor(Some(RenderAnchor {
                        chat_id: user_id,
                        message_id: MENU_MESSAGE_ID,
                    })),
            )
            .await
            .unwrap();
    }
}
