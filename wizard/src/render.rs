//! User-facing texts, keyboards and the summary card shown on the anchor message.

use crate::context::{PriceBound, WizardContext};
use crate::payload::{self, PRICE_FROM, PRICE_TO};
use filterbot_core::{Button, Currency, Keyboard};
use geocoder::LocationCandidate;

pub const MSG_CHOOSE_CATEGORY: &str = "Оберіть категорію для пошуку:";
pub const MSG_CHOOSE_CATEGORY_DETAIL: &str = "✅ Ви обрали категорію: Нерухомість\nОберіть тип нерухомості:";
pub const MSG_ENTER_CITY: &str = "Введіть назву міста:";
pub const MSG_QUERY_TOO_SHORT: &str = "⚠️ Введіть щонайменше 3 літери для пошуку міста.";
pub const MSG_SEARCHING: &str = "⏳ Шукаю місто...";
pub const MSG_CITY_NOT_FOUND: &str = "❌ Місто не знайдено. Спробуйте ще раз.";
pub const MSG_UPSTREAM_ERROR: &str = "⚠️ Сервіс пошуку міст тимчасово недоступний. Спробуйте ще раз пізніше.";
pub const MSG_CHOOSE_CITY: &str = "✅ Знайдено ось такі населені пункти. Оберіть ваш:";
pub const MSG_CHOOSE_CURRENCY: &str = "💱 Оберіть валюту:";
pub const MSG_CHOOSE_PRICE_FROM: &str = "💰 Оберіть мінімальну ціну:";
pub const MSG_CHOOSE_PRICE_TO: &str = "💰 Оберіть максимальну ціну:";
pub const MSG_FILTER_SAVED: &str = "✅ Фільтр збережено!";
pub const MSG_SAVE_FAILED: &str = "⚠️ Не вдалося зберегти фільтр. Спробуйте ще раз.";
pub const MSG_MALFORMED: &str = "⚠️ Помилка: ця дія зараз недоступна. Продовжіть з останнього повідомлення або надішліть /cancel.";
pub const MSG_INTERNAL_ERROR: &str = "⚠️ Сталася помилка. Надішліть /cancel і почніть спочатку.";
pub const MSG_CANCELLED: &str = "❌ Пошук скасовано.";

/// Label of the explicit "no bound" price choice.
pub const NO_BOUND_LABEL: &str = "немає";

pub const CATEGORY_MENU_LABEL: &str = "🏠 Нерухомість";

/// Category details offered after the real-estate menu button: (id, name).
pub const CATEGORY_DETAILS: [(i64, &str); 2] = [(1758, "Купити будинок"), (1602, "Купити квартиру")];

pub const PRICE_FROM_OPTIONS: [PriceBound; 6] = [
    PriceBound::NoBound,
    PriceBound::Value(10_000),
    PriceBound::Value(20_000),
    PriceBound::Value(30_000),
    PriceBound::Value(50_000),
    PriceBound::Value(100_000),
];

pub const PRICE_TO_OPTIONS: [PriceBound; 7] = [
    PriceBound::NoBound,
    PriceBound::Value(30_000),
    PriceBound::Value(50_000),
    PriceBound::Value(60_000),
    PriceBound::Value(70_000),
    PriceBound::Value(100_000),
    PriceBound::Value(1_000_000),
];

const PRICE_BUTTONS_PER_ROW: usize = 3;

/// Reply to `/start`, addressed by first name when the transport has one.
pub fn greeting(first_name: Option<&str>) -> String {
    match first_name.filter(|n| !n.is_empty()) {
        Some(name) => format!("Привіт, {}!\n\n{}", name, MSG_CHOOSE_CATEGORY),
        None => format!("Привіт!\n\n{}", MSG_CHOOSE_CATEGORY),
    }
}

/// `1000000` → `1 000 000`.
pub fn format_price(value: u32) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(' ');
        }
        out.push(ch);
    }
    out
}

pub fn price_label(bound: PriceBound) -> String {
    match bound {
        PriceBound::NoBound => NO_BOUND_LABEL.to_string(),
        PriceBound::Value(v) => format_price(v),
    }
}

pub fn category_menu_keyboard() -> Keyboard {
    Keyboard::from_buttons(
        vec![Button::new(CATEGORY_MENU_LABEL, payload::CATEGORY_REAL_ESTATE)],
        1,
    )
}

pub fn category_detail_keyboard() -> Keyboard {
    let buttons = CATEGORY_DETAILS
        .iter()
        .map(|(id, name)| Button::new(*name, payload::encode_category_detail(*id, name)))
        .collect();
    Keyboard::from_buttons(buttons, 1)
}

/// One button per candidate, `"<city> (<region>)"`, in the given order.
pub fn candidates_keyboard(candidates: &[LocationCandidate]) -> Keyboard {
    let buttons = candidates
        .iter()
        .map(|c| {
            Button::new(
                format!("{} ({})", c.place_name, c.region_name),
                payload::encode_choose_city(c.place_id, &c.place_name, c.region_id),
            )
        })
        .collect();
    Keyboard::from_buttons(buttons, 1)
}

pub fn currency_keyboard() -> Keyboard {
    let buttons = Currency::ALL
        .iter()
        .map(|c| Button::new(c.code(), payload::encode_currency(*c)))
        .collect();
    Keyboard::from_buttons(buttons, Currency::ALL.len())
}

fn price_keyboard(family: &str, options: &[PriceBound]) -> Keyboard {
    let buttons = options
        .iter()
        .map(|b| Button::new(price_label(*b), payload::encode_price(family, *b)))
        .collect();
    Keyboard::from_buttons(buttons, PRICE_BUTTONS_PER_ROW)
}

pub fn price_from_keyboard() -> Keyboard {
    price_keyboard(PRICE_FROM, &PRICE_FROM_OPTIONS)
}

pub fn price_to_keyboard() -> Keyboard {
    price_keyboard(PRICE_TO, &PRICE_TO_OPTIONS)
}

/// Recap of the fields collected so far, one line per set field.
pub fn summary(ctx: &WizardContext) -> String {
    let mut lines = Vec::new();
    if let (Some(id), Some(name)) = (ctx.category_id, ctx.category_name.as_deref()) {
        lines.push(format!("📌 Категорія: {} (ID: {})", name, id));
    }
    if let (Some(id), Some(name)) = (ctx.city_id, ctx.city_name.as_deref()) {
        let region = ctx
            .region_id
            .map(|r| format!(", регіон ID: {}", r))
            .unwrap_or_default();
        lines.push(format!("🏙 Місто: {} (ID: {}){}", name, id, region));
    }
    if let Some(currency) = ctx.currency {
        lines.push(format!("💱 Валюта: {}", currency));
    }
    if let Some(bound) = ctx.price_from {
        lines.push(format!("💰 Ціна від: {}", price_label(bound)));
    }
    if let Some(bound) = ctx.price_to {
        lines.push(format!("💰 Ціна до: {}", price_label(bound)));
    }
    lines.join("\n")
}

/// Summary followed by a prompt, separated by a blank line when the summary is not empty.
pub fn card(ctx: &WizardContext, prompt: &str) -> String {
    let summary = summary(ctx);
    if summary.is_empty() {
        prompt.to_string()
    } else {
        format!("{}\n\n{}", summary, prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::WizardStep;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(0), "0");
        assert_eq!(format_price(999), "999");
        assert_eq!(format_price(10_000), "10 000");
        assert_eq!(format_price(100_000), "100 000");
        assert_eq!(format_price(1_000_000), "1 000 000");
    }

    #[test]
    fn test_price_keyboards_layout() {
        let from = price_from_keyboard();
        assert_eq!(from.len(), 6);
        assert_eq!(from.rows.len(), 2);
        assert_eq!(from.rows[0][0].label, NO_BOUND_LABEL);
        assert_eq!(from.rows[0][0].payload, "price_from:");

        let to = price_to_keyboard();
        assert_eq!(to.len(), 7);
        assert_eq!(to.rows.len(), 3);
        assert_eq!(to.rows[2][0].payload, "price_to:1000000");
        assert_eq!(to.rows[2][0].label, "1 000 000");
    }

    #[test]
    fn test_currency_keyboard_single_row() {
        let keyboard = currency_keyboard();
        assert_eq!(keyboard.rows.len(), 1);
        let payloads: Vec<&str> = keyboard.buttons().map(|b| b.payload.as_str()).collect();
        assert_eq!(payloads, vec!["currency:UAH", "currency:USD", "currency:EUR"]);
    }

    #[test]
    fn test_candidates_keyboard_labels() {
        let keyboard = candidates_keyboard(&[LocationCandidate::new(268, "Київ", 25, "Київська область")]);
        let button = keyboard.buttons().next().unwrap();
        assert_eq!(button.label, "Київ (Київська область)");
        assert_eq!(button.payload, "choose_city:268:Київ:25");
    }

    #[test]
    fn test_summary_distinguishes_sentinel_from_unset() {
        let mut ctx = WizardContext {
            step: WizardStep::AwaitingPriceTo,
            category_id: Some(1602),
            category_name: Some("Купити квартиру".into()),
            city_id: Some(268),
            city_name: Some("Київ".into()),
            region_id: Some(25),
            currency: Some(Currency::Usd),
            price_from: Some(PriceBound::NoBound),
            ..WizardContext::default()
        };

        let text = summary(&ctx);
        assert!(text.contains("Ціна від: немає"), "{}", text);
        assert!(!text.contains("Ціна до"), "{}", text);

        ctx.price_to = Some(PriceBound::Value(50_000));
        assert!(summary(&ctx).contains("Ціна до: 50 000"));
    }

    #[test]
    fn test_greeting() {
        assert_eq!(greeting(Some("Олена")), "Привіт, Олена!\n\nОберіть категорію для пошуку:");
        assert_eq!(greeting(Some("")), greeting(None));
    }

    #[test]
    fn test_card_without_summary_is_prompt_only() {
        assert_eq!(card(&WizardContext::default(), MSG_ENTER_CITY), MSG_ENTER_CITY);
    }
}
