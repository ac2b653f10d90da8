//! Button payloads: colon-delimited strings whose first part names the handler family.
//!
//! Encoders keep payloads within Telegram's 64-byte `callback_data` limit; parsers return
//! [`WizardError::MalformedEvent`] when a payload has fewer parts than its family needs.

use crate::context::PriceBound;
use filterbot_core::{Currency, WizardError};

pub const CATEGORY_REAL_ESTATE: &str = "category_real_estate";
pub const CATEGORY_DETAIL: &str = "category_detail";
pub const CHOOSE_CITY: &str = "choose_city";
pub const CURRENCY: &str = "currency";
pub const PRICE_FROM: &str = "price_from";
pub const PRICE_TO: &str = "price_to";

/// Telegram rejects callback data longer than this.
pub const MAX_PAYLOAD_BYTES: usize = 64;

/// Family prefix of a payload (everything before the first `:`).
pub fn family(payload: &str) -> &str {
    payload.split(':').next().unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryChoice {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityChoice {
    pub city_id: i64,
    pub city_name: String,
    pub region_id: i64,
}

fn malformed(payload: &str, reason: &str) -> WizardError {
    WizardError::MalformedEvent(format!("{} ({:?})", reason, payload))
}

fn split_family<'a>(
    payload: &'a str,
    expected: &str,
    min_parts: usize,
) -> Result<Vec<&'a str>, WizardError> {
    let parts: Vec<&str> = payload.split(':').collect();
    if parts[0] != expected {
        return Err(malformed(payload, "unexpected payload family"));
    }
    if parts.len() < min_parts {
        return Err(malformed(
            payload,
            &format!("expected {} parts, got {}", min_parts, parts.len()),
        ));
    }
    Ok(parts)
}

fn parse_id(payload: &str, raw: &str) -> Result<i64, WizardError> {
    raw.parse()
        .map_err(|_| malformed(payload, &format!("invalid id {:?}", raw)))
}

/// `category_detail:<id>:<name>`. The name may itself contain `:`.
pub fn parse_category_detail(payload: &str) -> Result<CategoryChoice, WizardError> {
    let parts = split_family(payload, CATEGORY_DETAIL, 3)?;
    let id = parse_id(payload, parts[1])?;
    let name = parts[2..].join(":");
    if name.is_empty() {
        return Err(malformed(payload, "empty category name"));
    }
    Ok(CategoryChoice { id, name })
}

/// `choose_city:<cityId>:<cityName>:<regionId>`. The region id is always the last part.
pub fn parse_choose_city(payload: &str) -> Result<CityChoice, WizardError> {
    let parts = split_family(payload, CHOOSE_CITY, 4)?;
    let last = parts.len() - 1;
    let city_id = parse_id(payload, parts[1])?;
    let region_id = parse_id(payload, parts[last])?;
    let city_name = parts[2..last].join(":");
    if city_name.is_empty() {
        return Err(malformed(payload, "empty city name"));
    }
    Ok(CityChoice {
        city_id,
        city_name,
        region_id,
    })
}

/// `currency:<code>` with code one of `UAH`, `USD`, `EUR`.
pub fn parse_currency(payload: &str) -> Result<Currency, WizardError> {
    let parts = split_family(payload, CURRENCY, 2)?;
    parts[1]
        .parse()
        .map_err(|e: String| malformed(payload, &e))
}

/// `price_from:<value-or-empty>` / `price_to:<value-or-empty>`.
pub fn parse_price(payload: &str, expected_family: &str) -> Result<PriceBound, WizardError> {
    let parts = split_family(payload, expected_family, 2)?;
    if parts.len() > 2 {
        return Err(malformed(payload, "too many parts"));
    }
    PriceBound::parse(parts[1]).ok_or_else(|| malformed(payload, "invalid price value"))
}

pub fn encode_category_detail(id: i64, name: &str) -> String {
    format!("{}:{}:{}", CATEGORY_DETAIL, id, name)
}

/// Shortens the city name (on a char boundary) when the payload would exceed
/// [`MAX_PAYLOAD_BYTES`]; the id is what identifies the place.
pub fn encode_choose_city(city_id: i64, city_name: &str, region_id: i64) -> String {
    let fixed = format!("{}:{}::{}", CHOOSE_CITY, city_id, region_id);
    let budget = MAX_PAYLOAD_BYTES.saturating_sub(fixed.len());
    let mut name_end = city_name.len().min(budget);
    while !city_name.is_char_boundary(name_end) {
        name_end -= 1;
    }
    format!(
        "{}:{}:{}:{}",
        CHOOSE_CITY,
        city_id,
        &city_name[..name_end],
        region_id
    )
}

pub fn encode_currency(currency: Currency) -> String {
    format!("{}:{}", CURRENCY, currency.code())
}

pub fn encode_price(family: &str, bound: PriceBound) -> String {
    format!("{}:{}", family, bound.payload_value())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family() {
        assert_eq!(family("choose_city:1:A:2"), CHOOSE_CITY);
        assert_eq!(family(CATEGORY_REAL_ESTATE), CATEGORY_REAL_ESTATE);
        assert_eq!(family(""), "");
    }

    #[test]
    fn test_parse_category_detail() {
        let choice = parse_category_detail("category_detail:1758:Купити будинок").unwrap();
        assert_eq!(choice.id, 1758);
        assert_eq!(choice.name, "Купити будинок");

        assert!(parse_category_detail("category_detail:1758").is_err());
        assert!(parse_category_detail("category_detail:abc:Name").is_err());
        assert!(parse_category_detail("category_detail:1758:").is_err());
    }

    #[test]
    fn test_parse_choose_city_tolerates_colons_in_name() {
        let choice = parse_choose_city("choose_city:268:Київ:25").unwrap();
        assert_eq!(
            choice,
            CityChoice {
                city_id: 268,
                city_name: "Київ".into(),
                region_id: 25
            }
        );

        let odd = parse_choose_city("choose_city:5:A:B:9").unwrap();
        assert_eq!(odd.city_name, "A:B");
        assert_eq!(odd.region_id, 9);
    }

    #[test]
    fn test_parse_choose_city_too_few_parts_is_malformed() {
        for payload in ["choose_city", "choose_city:268", "choose_city:268:Київ"] {
            assert!(
                matches!(parse_choose_city(payload), Err(WizardError::MalformedEvent(_))),
                "{}",
                payload
            );
        }
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency("currency:USD").unwrap(), Currency::Usd);
        assert!(parse_currency("currency:GBP").is_err());
        assert!(parse_currency("currency").is_err());
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("price_from:", PRICE_FROM).unwrap(), PriceBound::NoBound);
        assert_eq!(
            parse_price("price_to:1000000", PRICE_TO).unwrap(),
            PriceBound::Value(1_000_000)
        );
        assert!(parse_price("price_to", PRICE_TO).is_err());
        assert!(parse_price("price_to:abc", PRICE_TO).is_err());
        assert!(parse_price("price_to:10:20", PRICE_TO).is_err());
        assert!(parse_price("price_from:10", PRICE_TO).is_err());
    }

    #[test]
    fn test_encode_choose_city_parses_back() {
        let payload = encode_choose_city(268, "Київ", 25);
        assert_eq!(payload, "choose_city:268:Київ:25");
        assert_eq!(parse_choose_city(&payload).unwrap().city_name, "Київ");
    }

    #[test]
    fn test_encode_choose_city_respects_byte_limit() {
        let long_name = "Новоград-Волинський-Житомирська-Громада";
        let payload = encode_choose_city(1_234_567, long_name, 12);
        assert!(payload.len() <= MAX_PAYLOAD_BYTES, "{} bytes", payload.len());

        let choice = parse_choose_city(&payload).unwrap();
        assert_eq!(choice.city_id, 1_234_567);
        assert_eq!(choice.region_id, 12);
        assert!(long_name.starts_with(&choice.city_name));
    }

    #[test]
    fn test_encode_price_sentinel() {
        assert_eq!(encode_price(PRICE_FROM, PriceBound::NoBound), "price_from:");
        assert_eq!(encode_price(PRICE_TO, PriceBound::Value(30_000)), "price_to:30000");
    }
}
