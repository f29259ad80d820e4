use super::reader::Reader;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A backend-tracked attempt at a single payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub amount: Option<i64>,
}

impl PaymentIntent {
    pub fn new(id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: Some(status.into()),
            amount: None,
        }
    }

    /// An intent without an identifier cannot be captured or simulated against.
    pub fn has_id(&self) -> bool {
        !self.id.is_empty()
    }
}

/// A business error reported by the backend as `{ "error": { "message": ... } }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a backend call that reached the backend and was understood.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiReply<T> {
    Accepted(T),
    Rejected(ApiError),
}

impl<T> ApiReply<T> {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(ApiError::new(message))
    }
}

/// Success body of the process-payment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedPayment {
    pub reader: Reader,
    pub payment_intent: PaymentIntent,
}

/// The amount exactly as the operator typed it.
///
/// The text is what gets sent to the backend; its numeric value is only
/// used to gate the Process control.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountInput(String);

impl AmountInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sign of the number the text coerces to, or `None` when it is not a number.
    pub fn numeric_sign(&self) -> Option<Ordering> {
        coerced_sign(&self.0)
    }

    pub fn is_positive(&self) -> bool {
        self.numeric_sign() == Some(Ordering::Greater)
    }
}

// Follows the string-to-number rules of the page the amount field comes from:
// blank text is zero, radix prefixes take no sign, `Infinity` is spelled out and
// digit separators are not allowed. Only the sign is needed, so nothing is parsed.
fn coerced_sign(text: &str) -> Option<Ordering> {
    let text = text.trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}');
    if text.is_empty() {
        return Some(Ordering::Equal);
    }

    for (prefix, radix) in [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)] {
        if let Some(digits) = text.strip_prefix(prefix) {
            if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
                return None;
            }
            return Some(if digits.chars().all(|c| c == '0') {
                Ordering::Equal
            } else {
                Ordering::Greater
            });
        }
    }

    let (negative, unsigned) = match text.as_bytes()[0] {
        b'-' => (true, &text[1..]),
        b'+' => (false, &text[1..]),
        _ => (false, text),
    };
    let signed = if negative {
        Ordering::Less
    } else {
        Ordering::Greater
    };
    if unsigned == "Infinity" {
        return Some(signed);
    }

    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };
    if let Some(exponent) = exponent {
        let digits = exponent.strip_prefix(['+', '-']).unwrap_or(exponent);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
    }

    let (integer, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    if integer.is_empty() && fraction.is_empty() {
        return None;
    }
    let mut digits = integer.bytes().chain(fraction.bytes());
    if !digits.clone().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.all(|b| b == b'0') {
        return Some(Ordering::Equal);
    }
    Some(signed)
}

impl From<&str> for AmountInput {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl fmt::Display for AmountInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
