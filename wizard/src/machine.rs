//! Conversation state machine.
//!
//! Every `(WizardStep, EventClass)` pair either appears in [`TRANSITIONS`] or is rejected as a
//! malformed event with no state change. `/cancel` is accepted in every step. Each transition
//! commits its context change to the [`WizardStateStore`] before it renders.
//!
//! **Data flow:** [`ConversationStateMachine::handle_event`] → [`route`] → transition handler →
//! store merge → [`Bot::render`].

use crate::context::{ContextPatch, RenderAnchor, WizardContext, WizardStep};
use crate::payload::{self, PRICE_FROM, PRICE_TO};
use crate::render;
use crate::state_store::{StoreError, WizardStateStore};
use filterbot_core::{
    Bot, BotError, EventKind, InboundEvent, RenderInstruction, Result, User, WizardError,
};
use geocoder::{dedup_by_place, validate_query, GeocodeError, Geocoder};
use std::sync::Arc;
use storage::{FilterStore, SearchFilter};
use tracing::{error, info, instrument, warn};

/// Upper bound on city candidates offered in one render.
pub const MAX_CANDIDATES: usize = 5;

/// Event kinds as the transition table sees them; button presses are split by payload family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventClass {
    Start,
    Cancel,
    Text,
    CategoryMenu,
    CategoryDetail,
    ChooseCity,
    Currency,
    PriceFrom,
    PriceTo,
    UnknownButton,
}

impl EventClass {
    pub const ALL: [EventClass; 10] = [
        EventClass::Start,
        EventClass::Cancel,
        EventClass::Text,
        EventClass::CategoryMenu,
        EventClass::CategoryDetail,
        EventClass::ChooseCity,
        EventClass::Currency,
        EventClass::PriceFrom,
        EventClass::PriceTo,
        EventClass::UnknownButton,
    ];

    pub fn of(kind: &EventKind) -> Self {
        match kind {
            EventKind::CommandStart => EventClass::Start,
            EventKind::CommandCancel => EventClass::Cancel,
            EventKind::TextInput(_) => EventClass::Text,
            EventKind::ButtonPress(data) => match payload::family(data) {
                payload::CATEGORY_REAL_ESTATE => EventClass::CategoryMenu,
                payload::CATEGORY_DETAIL => EventClass::CategoryDetail,
                payload::CHOOSE_CITY => EventClass::ChooseCity,
                payload::CURRENCY => EventClass::Currency,
                payload::PRICE_FROM => EventClass::PriceFrom,
                payload::PRICE_TO => EventClass::PriceTo,
                _ => EventClass::UnknownButton,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    ShowMenu,
    ShowCategoryDetails,
    SelectCategory,
    SearchCity,
    SelectCity,
    SelectCurrency,
    SelectPriceFrom,
    SelectPriceTo,
    Cancel,
}

/// The wizard's transition table. Anything not listed here (other than `/cancel`) is malformed.
pub const TRANSITIONS: &[(WizardStep, EventClass, Transition)] = &[
    (WizardStep::Idle, EventClass::Start, Transition::ShowMenu),
    (
        WizardStep::Idle,
        EventClass::CategoryMenu,
        Transition::ShowCategoryDetails,
    ),
    (
        WizardStep::AwaitingCategoryDetail,
        EventClass::CategoryDetail,
        Transition::SelectCategory,
    ),
    (WizardStep::AwaitingCity, EventClass::Text, Transition::SearchCity),
    (
        WizardStep::AwaitingCitySelection,
        EventClass::ChooseCity,
        Transition::SelectCity,
    ),
    (
        WizardStep::AwaitingCurrency,
        EventClass::Currency,
        Transition::SelectCurrency,
    ),
    (
        WizardStep::AwaitingPriceFrom,
        EventClass::PriceFrom,
        Transition::SelectPriceFrom,
    ),
    (
        WizardStep::AwaitingPriceTo,
        EventClass::PriceTo,
        Transition::SelectPriceTo,
    ),
];

/// Looks up the transition for `(step, class)`.
pub fn route(step: WizardStep, class: EventClass) -> Option<Transition> {
    if class == EventClass::Cancel {
        return Some(Transition::Cancel);
    }
    TRANSITIONS
        .iter()
        .find(|(s, c, _)| *s == step && *c == class)
        .map(|(_, _, t)| *t)
}

/// Inputs of one turn, resolved once per event.
struct Turn<'a> {
    event: &'a InboundEvent,
    user: &'a User,
    ctx: WizardContext,
}

impl Turn<'_> {
    fn user_id(&self) -> i64 {
        self.user.id
    }

    fn button_payload(&self) -> std::result::Result<&str, WizardError> {
        match &self.event.kind {
            EventKind::ButtonPress(data) => Ok(data),
            other => Err(WizardError::MalformedEvent(format!(
                "expected a button press, got {}",
                other.name()
            ))),
        }
    }

    fn text(&self) -> std::result::Result<&str, WizardError> {
        match &self.event.kind {
            EventKind::TextInput(text) => Ok(text),
            other => Err(WizardError::MalformedEvent(format!(
                "expected text, got {}",
                other.name()
            ))),
        }
    }

    /// A button press must come from the current anchor message once one exists.
    fn check_anchor(&self) -> std::result::Result<(), WizardError> {
        let (EventKind::ButtonPress(_), Some(anchor)) = (&self.event.kind, self.ctx.render_anchor)
        else {
            return Ok(());
        };
        if self.event.chat.id == anchor.chat_id && self.event.message_id == Some(anchor.message_id) {
            Ok(())
        } else {
            Err(WizardError::MalformedEvent(format!(
                "button from message {:?}, current card is {}",
                self.event.message_id, anchor.message_id
            )))
        }
    }
}

/// Where a render goes: the anchor when set, else the message holding the pressed button,
/// else a new message.
fn target(ctx: &WizardContext, event: &InboundEvent, text: impl Into<String>) -> RenderInstruction {
    if let Some(anchor) = ctx.render_anchor {
        return RenderInstruction::edit(anchor.chat_id, anchor.message_id, text);
    }
    match (&event.kind, event.message_id) {
        (EventKind::ButtonPress(_), Some(message_id)) => {
            RenderInstruction::edit(event.chat.id, message_id, text)
        }
        _ => RenderInstruction::send(event.chat.id, text),
    }
}

/// Builds the filter handed to persistence from a context that has reached the last step.
pub(crate) fn assemble_filter(ctx: &WizardContext) -> std::result::Result<SearchFilter, WizardError> {
    let missing = |field: &str| {
        WizardError::InconsistentContext(format!("{} not set at step {}", field, ctx.step))
    };
    let category_id = ctx.category_id.ok_or_else(|| missing("category_id"))?;
    let category_name = ctx
        .category_name
        .as_deref()
        .ok_or_else(|| missing("category_name"))?;
    let city_id = ctx.city_id.ok_or_else(|| missing("city_id"))?;
    let city_name = ctx.city_name.as_deref().ok_or_else(|| missing("city_name"))?;
    let region_id = ctx.region_id.ok_or_else(|| missing("region_id"))?;
    let currency = ctx.currency.ok_or_else(|| missing("currency"))?;
    let price_from = ctx.price_from.ok_or_else(|| missing("price_from"))?;
    let price_to = ctx.price_to.ok_or_else(|| missing("price_to"))?;

    Ok(SearchFilter {
        filter_name: format!("{} - {}", category_name, city_name),
        category_id,
        city_id,
        region_id,
        currency,
        price_from: price_from.amount(),
        price_to: price_to.amount(),
    })
}

/// Table-driven wizard over injected collaborators. Not reentrant per user: callers serialize
/// events of one user (see [`WizardService`](crate::WizardService)).
pub struct ConversationStateMachine {
    bot: Arc<dyn Bot>,
    geocoder: Arc<dyn Geocoder>,
    states: Arc<dyn WizardStateStore>,
    filters: Arc<dyn FilterStore>,
}

impl ConversationStateMachine {
    pub fn new(
        bot: Arc<dyn Bot>,
        geocoder: Arc<dyn Geocoder>,
        states: Arc<dyn WizardStateStore>,
        filters: Arc<dyn FilterStore>,
    ) -> Self {
        Self {
            bot,
            geocoder,
            states,
            filters,
        }
    }

    /// Processes one event. Wizard-level failures are rendered to the user and return `Ok`;
    /// only transport failures are returned.
    #[instrument(skip(self, event), fields(chat_id = event.chat.id, kind = event.kind.name()))]
    pub async fn handle_event(&self, event: &InboundEvent) -> Result<()> {
        let Some(user) = event.user.as_ref() else {
            let e = WizardError::MissingUserIdentity;
            warn!(error = %e, "step: event dropped");
            return Ok(());
        };

        let ctx = self.states.get(user.id).await;
        let step = ctx.step;
        let turn = Turn { event, user, ctx };

        match self.dispatch(&turn).await {
            Ok(()) => Ok(()),
            Err(BotError::Wizard(WizardError::MalformedEvent(reason))) => {
                warn!(user_id = user.id, step = %step, reason = %reason, "step: malformed event rejected");
                self.emit(RenderInstruction::send(event.chat.id, render::MSG_MALFORMED))
                    .await
            }
            Err(BotError::Wizard(e)) => {
                error!(user_id = user.id, step = %step, error = %e, "step: wizard turn failed");
                self.emit(RenderInstruction::send(event.chat.id, render::MSG_INTERNAL_ERROR))
                    .await
            }
            Err(e) => Err(e),
        }
    }

    async fn dispatch(&self, turn: &Turn<'_>) -> Result<()> {
        let class = EventClass::of(&turn.event.kind);
        let transition = route(turn.ctx.step, class).ok_or_else(|| {
            WizardError::MalformedEvent(format!("{:?} not accepted in step {}", class, turn.ctx.step))
        })?;
        if transition != Transition::Cancel {
            turn.check_anchor()?;
        }

        info!(
            user_id = turn.user_id(),
            step = %turn.ctx.step,
            transition = ?transition,
            "step: transition"
        );

        match transition {
            Transition::ShowMenu => self.show_menu(turn).await,
            Transition::ShowCategoryDetails => self.show_category_details(turn).await,
            Transition::SelectCategory => self.select_category(turn).await,
            Transition::SearchCity => self.search_city(turn).await,
            Transition::SelectCity => self.select_city(turn).await,
            Transition::SelectCurrency => self.select_currency(turn).await,
            Transition::SelectPriceFrom => self.select_price_from(turn).await,
            Transition::SelectPriceTo => self.select_price_to(turn).await,
            Transition::Cancel => self.cancel(turn).await,
        }
    }

    async fn emit(&self, instruction: RenderInstruction) -> Result<()> {
        self.bot.render(&instruction).await.map(|_| ())
    }

    /// Unconditional merge; a stale error here means the store broke its contract.
    async fn commit(&self, user_id: i64, patch: ContextPatch) -> Result<WizardContext> {
        self.states
            .merge(user_id, patch)
            .await
            .map_err(|e| WizardError::InconsistentContext(e.to_string()).into())
    }

    async fn show_menu(&self, turn: &Turn<'_>) -> Result<()> {
        if let Err(e) = self.filters.upsert_user(&turn.user.identity()).await {
            error!(user_id = turn.user_id(), error = %e, "Failed to upsert user, showing menu anyway");
        }
        let text = render::greeting(turn.user.first_name.as_deref());
        self.emit(
            RenderInstruction::send(turn.event.chat.id, text)
                .with_keyboard(render::category_menu_keyboard()),
        )
        .await
    }

    async fn show_category_details(&self, turn: &Turn<'_>) -> Result<()> {
        let ctx = self
            .commit(
                turn.user_id(),
                ContextPatch::advance(WizardStep::AwaitingCategoryDetail),
            )
            .await?;
        self.emit(
            target(&ctx, turn.event, render::MSG_CHOOSE_CATEGORY_DETAIL)
                .with_keyboard(render::category_detail_keyboard()),
        )
        .await
    }

    /// Stores the category and makes the pressed message the anchor of the session.
    async fn select_category(&self, turn: &Turn<'_>) -> Result<()> {
        let choice = payload::parse_category_detail(turn.button_payload()?)?;
        let anchor = turn.event.message_id.map(|message_id| RenderAnchor {
            chat_id: turn.event.chat.id,
            message_id,
        });
        let ctx = self
            .commit(
                turn.user_id(),
                ContextPatch::advance(WizardStep::AwaitingCity)
                    .category(choice.id, choice.name)
                    .anchor(anchor),
            )
            .await?;
        self.emit(target(&ctx, turn.event, render::card(&ctx, render::MSG_ENTER_CITY)))
            .await
    }

    async fn search_city(&self, turn: &Turn<'_>) -> Result<()> {
        let ctx = &turn.ctx;
        let issued_at = ctx.generation;
        let query = match validate_query(turn.text()?) {
            Ok(query) => query,
            Err(e) => {
                info!(user_id = turn.user_id(), error = %e, "step: city query rejected");
                return self
                    .emit(target(ctx, turn.event, render::card(ctx, render::MSG_QUERY_TOO_SHORT)))
                    .await;
            }
        };

        if ctx.render_anchor.is_some() {
            if let Err(e) = self
                .emit(target(ctx, turn.event, render::card(ctx, render::MSG_SEARCHING)))
                .await
            {
                warn!(error = %e, "Failed to show search progress");
            }
        }

        let notice = match self.geocoder.lookup(query).await {
            Ok(found) if !found.is_empty() => {
                return self.offer_candidates(turn, issued_at, found).await;
            }
            Ok(_) => {
                info!(user_id = turn.user_id(), query = %query, "step: no city found");
                render::MSG_CITY_NOT_FOUND
            }
            Err(GeocodeError::InvalidQuery { len }) => {
                info!(user_id = turn.user_id(), len = len, "step: city query rejected by geocoder");
                render::MSG_QUERY_TOO_SHORT
            }
            Err(GeocodeError::UpstreamUnavailable(reason)) => {
                let e = WizardError::UpstreamUnavailable(reason);
                error!(user_id = turn.user_id(), error = %e, "step: city lookup failed");
                render::MSG_UPSTREAM_ERROR
            }
        };

        let current = self.states.get(turn.user_id()).await;
        if current.generation != issued_at {
            info!(
                user_id = turn.user_id(),
                issued_at = issued_at,
                current = current.generation,
                "step: stale lookup outcome discarded"
            );
            return Ok(());
        }
        self.emit(target(ctx, turn.event, render::card(ctx, notice)))
            .await
    }

    async fn offer_candidates(
        &self,
        turn: &Turn<'_>,
        issued_at: u64,
        found: Vec<geocoder::LocationCandidate>,
    ) -> Result<()> {
        let raw_count = found.len();
        let candidates: Vec<_> = dedup_by_place(found)
            .into_iter()
            .take(MAX_CANDIDATES)
            .collect();

        let patch = ContextPatch::advance(WizardStep::AwaitingCitySelection).expect_generation(issued_at);
        let ctx = match self.states.merge(turn.user_id(), patch).await {
            Ok(ctx) => ctx,
            Err(StoreError::Stale { expected, found }) => {
                info!(
                    user_id = turn.user_id(),
                    expected = expected,
                    found = found,
                    "step: stale lookup result discarded"
                );
                return Ok(());
            }
        };

        info!(
            user_id = turn.user_id(),
            raw_count = raw_count,
            offered = candidates.len(),
            "step: city candidates offered"
        );
        self.emit(
            target(&ctx, turn.event, render::card(&ctx, render::MSG_CHOOSE_CITY))
                .with_keyboard(render::candidates_keyboard(&candidates)),
        )
        .await
    }

    async fn select_city(&self, turn: &Turn<'_>) -> Result<()> {
        let choice = payload::parse_choose_city(turn.button_payload()?)?;
        let ctx = self
            .commit(
                turn.user_id(),
                ContextPatch::advance(WizardStep::AwaitingCurrency).city(
                    choice.city_id,
                    choice.city_name,
                    choice.region_id,
                ),
            )
            .await?;
        self.emit(
            target(&ctx, turn.event, render::card(&ctx, render::MSG_CHOOSE_CURRENCY))
                .with_keyboard(render::currency_keyboard()),
        )
        .await
    }

    async fn select_currency(&self, turn: &Turn<'_>) -> Result<()> {
        let currency = payload::parse_currency(turn.button_payload()?)?;
        let ctx = self
            .commit(
                turn.user_id(),
                ContextPatch::advance(WizardStep::AwaitingPriceFrom).currency(currency),
            )
            .await?;
        self.emit(
            target(&ctx, turn.event, render::card(&ctx, render::MSG_CHOOSE_PRICE_FROM))
                .with_keyboard(render::price_from_keyboard()),
        )
        .await
    }

    async fn select_price_from(&self, turn: &Turn<'_>) -> Result<()> {
        let bound = payload::parse_price(turn.button_payload()?, PRICE_FROM)?;
        let ctx = self
            .commit(
                turn.user_id(),
                ContextPatch::advance(WizardStep::AwaitingPriceTo).price_from(bound),
            )
            .await?;
        self.emit(
            target(&ctx, turn.event, render::card(&ctx, render::MSG_CHOOSE_PRICE_TO))
                .with_keyboard(render::price_to_keyboard()),
        )
        .await
    }

    /// Persists the finished filter, then clears the context. A failed insert keeps the step.
    async fn select_price_to(&self, turn: &Turn<'_>) -> Result<()> {
        let bound = payload::parse_price(turn.button_payload()?, PRICE_TO)?;
        let mut done = turn.ctx.clone();
        done.price_to = Some(bound);
        let filter = assemble_filter(&done)?;

        match self.filters.insert_filter(&turn.user.identity(), &filter).await {
            Ok(filter_id) => {
                self.states.clear(turn.user_id()).await;
                info!(
                    user_id = turn.user_id(),
                    filter_id = filter_id,
                    filter_name = %filter.filter_name,
                    "step: filter saved, wizard finished"
                );
                let text = format!("{}\n\n{}", render::MSG_FILTER_SAVED, render::summary(&done));
                self.emit(target(&done, turn.event, text)).await
            }
            Err(e) => {
                error!(user_id = turn.user_id(), error = %e, "step: failed to save filter");
                self.emit(
                    target(&turn.ctx, turn.event, render::card(&turn.ctx, render::MSG_SAVE_FAILED))
                        .with_keyboard(render::price_to_keyboard()),
                )
                .await
            }
        }
    }

    async fn cancel(&self, turn: &Turn<'_>) -> Result<()> {
        self.states.clear(turn.user_id()).await;
        let text = format!("{}\n\n{}", render::MSG_CANCELLED, render::MSG_CHOOSE_CATEGORY);
        self.emit(
            target(&turn.ctx, turn.event, text).with_keyboard(render::category_menu_keyboard()),
        )
        .await
    }
}
