//! crates/foreverstory_core/src/pricing.rs
//!
//! Plan, book and shipping prices. All amounts are Euro cents.

use crate::domain::SubscriptionPlan;
use crate::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookFormat {
    HardcoverStandard,
    HardcoverPremium,
    Softcover,
}

impl BookFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookFormat::HardcoverStandard => "HARDCOVER_STANDARD",
            BookFormat::HardcoverPremium => "HARDCOVER_PREMIUM",
            BookFormat::Softcover => "SOFTCOVER",
        }
    }

    pub fn price_cents(&self) -> u64 {
        match self {
            BookFormat::HardcoverStandard => 3900,
            BookFormat::HardcoverPremium => 5900,
            BookFormat::Softcover => 2400,
        }
    }
}

impl std::str::FromStr for BookFormat {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "HARDCOVER_STANDARD" => Ok(BookFormat::HardcoverStandard),
            "HARDCOVER_PREMIUM" => Ok(BookFormat::HardcoverPremium),
            "SOFTCOVER" => Ok(BookFormat::Softcover),
            other => Err(ValidationError::UnknownTag {
                kind: "book format",
                value: other.to_string(),
            }),
        }
    }
}

/// What a plan costs and contains, as presented on the pricing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOffer {
    pub plan: SubscriptionPlan,
    pub name: &'static str,
    pub description: &'static str,
    pub duration_months: u32,
    pub price_cents: u64,
    pub features: &'static [&'static str],
    pub book_format: Option<BookFormat>,
    pub popular: bool,
}

impl PlanOffer {
    pub fn includes_book(&self) -> bool {
        self.book_format.is_some()
    }
}

pub fn plan_offer(plan: SubscriptionPlan) -> PlanOffer {
    match plan {
        SubscriptionPlan::Starter => PlanOffer {
            plan,
            name: "Starter",
            description: "Ideal zum Kennenlernen",
            duration_months: plan.duration_months(),
            price_cents: 4900,
            features: &[
                "12 wöchentliche Fragen",
                "Schriftliche Antworten",
                "Sprachaufnahme",
                "Mit Familie teilen",
            ],
            book_format: None,
            popular: false,
        },
        SubscriptionPlan::Standard => PlanOffer {
            plan,
            name: "Standard",
            description: "Unser beliebtestes Paket",
            duration_months: plan.duration_months(),
            price_cents: 8900,
            features: &[
                "26 wöchentliche Fragen",
                "Schriftliche Antworten",
                "Sprachaufnahme",
                "Fotos hinzufügen",
                "Mit Familie teilen",
                "1 Hardcover-Buch inklusive",
            ],
            book_format: Some(BookFormat::HardcoverStandard),
            popular: true,
        },
        SubscriptionPlan::Premium => PlanOffer {
            plan,
            name: "Premium",
            description: "Die vollständige Lebensgeschichte",
            duration_months: plan.duration_months(),
            price_cents: 14900,
            features: &[
                "52 wöchentliche Fragen",
                "Schriftliche Antworten",
                "Sprachaufnahme",
                "Fotos hinzufügen",
                "Mit Familie teilen",
                "1 Premium-Buch mit Schutzumschlag",
                "Bis zu 5 eigene Fragen",
                "Prioritäts-Support",
            ],
            book_format: Some(BookFormat::HardcoverPremium),
            popular: false,
        },
    }
}

pub const SHIPPING_DE: u64 = 490;
pub const SHIPPING_AT: u64 = 790;
pub const SHIPPING_CH: u64 = 1290;
pub const SHIPPING_EU: u64 = 990;
pub const SHIPPING_WORLD: u64 = 1990;

const EU_COUNTRIES: &[&str] = &[
    "BE", "BG", "CZ", "DK", "EE", "IE", "EL", "ES", "FR", "HR", "IT", "CY", "LV", "LT", "LU",
    "HU", "MT", "NL", "PL", "PT", "RO", "SI", "SK", "FI", "SE",
];

/// Shipping cost for an ISO 3166-1 alpha-2 country code (case-insensitive).
pub fn shipping_cost(country_code: &str) -> u64 {
    let code = country_code.trim().to_ascii_uppercase();
    match code.as_str() {
        "DE" => SHIPPING_DE,
        "AT" => SHIPPING_AT,
        "CH" => SHIPPING_CH,
        other if EU_COUNTRIES.contains(&other) => SHIPPING_EU,
        _ => SHIPPING_WORLD,
    }
}

/// Plan price spread over its duration, rounded to the nearest cent.
pub fn monthly_price(plan: SubscriptionPlan) -> u64 {
    let offer = plan_offer(plan);
    let months = u64::from(offer.duration_months);
    (offer.price_cents * 2 + months) / (months * 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookOrderTotal {
    pub book_price: u64,
    pub shipping_price: u64,
    pub total: u64,
}

pub fn book_order_total(format: BookFormat, quantity: u32, country_code: &str) -> BookOrderTotal {
    let book_price = format.price_cents() * u64::from(quantity);
    let shipping_price = shipping_cost(country_code);
    BookOrderTotal {
        book_price,
        shipping_price,
        total: book_price + shipping_price,
    }
}

/// Formats cents in German notation, e.g. `1.234,56 €` (non-breaking space before the sign).
pub fn format_euro(cents: u64) -> String {
    let euros = (cents / 100).to_string();
    let mut grouped = String::with_capacity(euros.len() + euros.len() / 3);
    for (i, digit) in euros.chars().enumerate() {
        if i > 0 && (euros.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }
    format!("{},{:02}\u{a0}€", grouped, cents % 100)
}

/// Everything the pricing page needs.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub plans: Vec<PlanOffer>,
    pub books: Vec<(BookFormat, u64)>,
    pub shipping_germany: u64,
    pub shipping_austria: u64,
    pub shipping_switzerland: u64,
    pub shipping_eu: u64,
    pub shipping_world: u64,
}

pub fn pricing_config() -> PricingConfig {
    PricingConfig {
        plans: SubscriptionPlan::ALL.iter().map(|plan| plan_offer(*plan)).collect(),
        books: [
            BookFormat::HardcoverStandard,
            BookFormat::HardcoverPremium,
            BookFormat::Softcover,
        ]
        .into_iter()
        .map(|format| (format, format.price_cents()))
        .collect(),
        shipping_germany: SHIPPING_DE,
        shipping_austria: SHIPPING_AT,
        shipping_switzerland: SHIPPING_CH,
        shipping_eu: SHIPPING_EU,
        shipping_world: SHIPPING_WORLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipping_zones() {
        assert_eq!(shipping_cost("de"), 490);
        assert_eq!(shipping_cost("AT"), 790);
        assert_eq!(shipping_cost("CH"), 1290);
        assert_eq!(shipping_cost("fr"), 990);
        assert_eq!(shipping_cost("US"), 1990);
    }

    #[test]
    fn monthly_prices_are_rounded() {
        assert_eq!(monthly_price(SubscriptionPlan::Starter), 1633); // 1633.33
        assert_eq!(monthly_price(SubscriptionPlan::Standard), 1483); // 1483.33
        assert_eq!(monthly_price(SubscriptionPlan::Premium), 1242); // 1241.67
    }

    #[test]
    fn book_order_adds_shipping_once() {
        let total = book_order_total(BookFormat::Softcover, 3, "AT");
        assert_eq!(total.book_price, 7200);
        assert_eq!(total.shipping_price, 790);
        assert_eq!(total.total, 7990);
    }

    #[test]
    fn euro_formatting_uses_german_separators() {
        assert_eq!(format_euro(4900), "49,00\u{a0}€");
        assert_eq!(format_euro(5), "0,05\u{a0}€");
        assert_eq!(format_euro(123456), "1.234,56\u{a0}€");
        assert_eq!(format_euro(100_000_000), "1.000.000,00\u{a0}€");
    }

    #[test]
    fn only_paid_book_plans_include_a_book() {
        assert!(!plan_offer(SubscriptionPlan::Starter).includes_book());
        assert!(plan_offer(SubscriptionPlan::Standard).popular);
        assert_eq!(
            plan_offer(SubscriptionPlan::Premium).book_format,
            Some(BookFormat::HardcoverPremium)
        );
        assert_eq!(pricing_config().plans.len(), 3);
    }
}
