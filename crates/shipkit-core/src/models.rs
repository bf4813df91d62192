use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::adapter::ShippingMethod;

/// An amount in minor units. Parsing and display stay in the currency's
/// two-decimal form; no conversion between currencies happens here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Money {
    pub cents: i64,
    pub currency: String,
}

impl Money {
    #[must_use]
    pub fn new(cents: i64, currency: impl Into<String>) -> Self {
        Self {
            cents,
            currency: currency.into(),
        }
    }

    /// Parses carrier decimal text such as `"123.4"` or `"-7.05"`. More than
    /// two fraction digits, or anything non-numeric, yields `None`.
    #[must_use]
    pub fn from_decimal(raw: &str, currency: impl Into<String>) -> Option<Self> {
        let trimmed = raw.trim();
        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if fraction.len() > 2
            || !whole.bytes().all(|byte| byte.is_ascii_digit())
            || !fraction.bytes().all(|byte| byte.is_ascii_digit())
        {
            return None;
        }
        let whole = if whole.is_empty() {
            0
        } else {
            whole.parse::<i64>().ok()?
        };
        let fraction = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().ok()? * 10,
            _ => fraction.parse::<i64>().ok()?,
        };
        let cents = whole.checked_mul(100)?.checked_add(fraction)?;
        Some(Self::new(if negative { -cents } else { cents }, currency))
    }

    #[must_use]
    pub fn zero(currency: impl Into<String>) -> Self {
        Self::new(0, currency)
    }
}

impl Display for Money {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let absolute = self.cents.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:02} {}",
            absolute / 100,
            absolute % 100,
            self.currency
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rate {
    pub shipping_method: ShippingMethod,
    /// Individual charges by carrier charge code.
    pub amounts: BTreeMap<String, Money>,
    pub total: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negotiated_total: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transit_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<NaiveDate>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub tracking_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_id: Option<String>,
    pub label_format: String,
    /// Base64 label document as returned by the carrier.
    pub label_data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_cost: Option<Money>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timing {
    pub shipping_method: ShippingMethod,
    pub pickup: NaiveDate,
    pub delivery: NaiveDate,
    pub guaranteed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_days: Option<u32>,
    pub properties: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShipmentDocument {
    pub document_type: String,
    pub format: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentConfirmation {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bol_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<ShippingMethod>,
    pub documents: Vec<ShipmentDocument>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_parses_carrier_decimal_text() {
        assert_eq!(Money::from_decimal("123.45", "USD"), Some(Money::new(12_345, "USD")));
        assert_eq!(Money::from_decimal("12.3", "USD"), Some(Money::new(1_230, "USD")));
        assert_eq!(Money::from_decimal("7", "CAD"), Some(Money::new(700, "CAD")));
        assert_eq!(Money::from_decimal("-0.05", "USD"), Some(Money::new(-5, "USD")));
        assert_eq!(Money::from_decimal(".5", "USD"), Some(Money::new(50, "USD")));
    }

    #[test]
    fn money_rejects_malformed_text() {
        for raw in ["", ".", "1.234", "12,00", "abc", "1.2.3", "--1"] {
            assert_eq!(Money::from_decimal(raw, "USD"), None, "{raw:?} must be rejected");
        }
    }

    #[test]
    fn money_displays_two_decimals() {
        assert_eq!(Money::new(12_345, "USD").to_string(), "123.45 USD");
        assert_eq!(Money::new(-5, "USD").to_string(), "-0.05 USD");
    }
}
