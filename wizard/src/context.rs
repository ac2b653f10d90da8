//! Per-user wizard record and the partial updates applied to it.

use filterbot_core::Currency;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The input the wizard is waiting for. `Idle` is both initial and terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WizardStep {
    #[default]
    Idle,
    AwaitingCategoryDetail,
    AwaitingCity,
    AwaitingCitySelection,
    AwaitingCurrency,
    AwaitingPriceFrom,
    AwaitingPriceTo,
}

impl WizardStep {
    pub const ALL: [WizardStep; 7] = [
        WizardStep::Idle,
        WizardStep::AwaitingCategoryDetail,
        WizardStep::AwaitingCity,
        WizardStep::AwaitingCitySelection,
        WizardStep::AwaitingCurrency,
        WizardStep::AwaitingPriceFrom,
        WizardStep::AwaitingPriceTo,
    ];
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A chosen price bound. `NoBound` is the explicit "none" choice, distinct from a field that
/// was never set (`Option::None` on the context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceBound {
    NoBound,
    Value(u32),
}

impl PriceBound {
    /// Parses a payload value: empty is `NoBound`, otherwise a non-negative integer.
    pub fn parse(value: &str) -> Option<Self> {
        if value.is_empty() {
            return Some(PriceBound::NoBound);
        }
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        value.parse().ok().map(PriceBound::Value)
    }

    /// Value carried in button payloads (empty for `NoBound`).
    pub fn payload_value(&self) -> String {
        match self {
            PriceBound::NoBound => String::new(),
            PriceBound::Value(v) => v.to_string(),
        }
    }

    pub fn amount(&self) -> Option<u32> {
        match self {
            PriceBound::NoBound => None,
            PriceBound::Value(v) => Some(*v),
        }
    }
}

/// The single message progressively edited for one wizard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderAnchor {
    pub chat_id: i64,
    pub message_id: i32,
}

/// Per-user mutable record.
///
/// Consistent with `step`: `AwaitingCurrency` implies category, city and region are set;
/// `AwaitingPriceTo` additionally implies currency and price-from. `generation` increases on every
/// committed mutation (including clear) and never goes back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardContext {
    pub step: WizardStep,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub city_id: Option<i64>,
    pub city_name: Option<String>,
    pub region_id: Option<i64>,
    pub currency: Option<Currency>,
    pub price_from: Option<PriceBound>,
    pub price_to: Option<PriceBound>,
    pub render_anchor: Option<RenderAnchor>,
    pub generation: u64,
}

/// Shallow partial update; unset fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextPatch {
    pub step: Option<WizardStep>,
    pub category: Option<(i64, String)>,
    pub city: Option<(i64, String, i64)>,
    pub currency: Option<Currency>,
    pub price_from: Option<PriceBound>,
    pub price_to: Option<PriceBound>,
    pub render_anchor: Option<RenderAnchor>,
    /// When set, the merge is refused unless the stored generation equals this value.
    pub expected_generation: Option<u64>,
}

impl ContextPatch {
    /// Patch that moves the wizard to `step`.
    pub fn advance(step: WizardStep) -> Self {
        Self {
            step: Some(step),
            ..Self::default()
        }
    }

    pub fn category(mut self, id: i64, name: impl Into<String>) -> Self {
        self.category = Some((id, name.into()));
        self
    }

    pub fn city(mut self, city_id: i64, city_name: impl Into<String>, region_id: i64) -> Self {
        self.city = Some((city_id, city_name.into(), region_id));
        self
    }

    pub fn currency(mut self, currency: Currency) -> Self {
        self.currency = Some(currency);
        self
    }

    pub fn price_from(mut self, bound: PriceBound) -> Self {
        self.price_from = Some(bound);
        self
    }

    pub fn price_to(mut self, bound: PriceBound) -> Self {
        self.price_to = Some(bound);
        self
    }

    pub fn anchor(mut self, anchor: Option<RenderAnchor>) -> Self {
        self.render_anchor = anchor;
        self
    }

    pub fn expect_generation(mut self, generation: u64) -> Self {
        self.expected_generation = Some(generation);
        self
    }

    /// Applies the patch; does not touch `generation`.
    pub fn apply(self, ctx: &mut WizardContext) {
        if let Some(step) = self.step {
            ctx.step = step;
        }
        if let Some((id, name)) = self.category {
            ctx.category_id = Some(id);
            ctx.category_name = Some(name);
        }
        if let Some((city_id, city_name, region_id)) = self.city {
            ctx.city_id = Some(city_id);
            ctx.city_name = Some(city_name);
            ctx.region_id = Some(region_id);
        }
        if let Some(currency) = self.currency {
            ctx.currency = Some(currency);
        }
        if let Some(bound) = self.price_from {
            ctx.price_from = Some(bound);
        }
        if let Some(bound) = self.price_to {
            ctx.price_to = Some(bound);
        }
        if let Some(anchor) = self.render_anchor {
            ctx.render_anchor = Some(anchor);
        }
    }
}
