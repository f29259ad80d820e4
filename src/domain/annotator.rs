//! Extraction of payment-intent identifiers from transcript messages.
//!
//! Every message is mapped to an [`AnnotatedMessage`]: the text that should be
//! displayed plus, when the message mentions one, the payment-intent id that
//! the display links to on the payments dashboard.

use serde_json::Value;
use std::sync::LazyLock;

use regex::Regex;

/// Default dashboard the identifier links point at.
pub const DEFAULT_DASHBOARD_BASE: &str = "https://dashboard.stripe.com/test";

// `pi_` then the longest run of non-whitespace that still ends on a word boundary,
// so trailing punctuation stays in the text. Word characters are ASCII only.
static PAYMENT_INTENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pi_\S*(?-u:\b)").expect("valid payment intent pattern"));

/// Display form of one transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedMessage {
    pub text: String,
    pub payment_intent: Option<String>,
}

/// Annotates a single message.
///
/// Only the first identifier is extracted and removed. A message consisting
/// solely of the identifier keeps its original text.
pub fn annotate_message(message: &str) -> AnnotatedMessage {
    let Some(found) = PAYMENT_INTENT_RE.find(message) else {
        return AnnotatedMessage {
            text: message.to_string(),
            payment_intent: None,
        };
    };

    let mut stripped = String::with_capacity(message.len() - found.len());
    stripped.push_str(&message[..found.start()]);
    stripped.push_str(&message[found.end()..]);

    let text = if stripped.is_empty() {
        message.to_string()
    } else {
        stripped
    };

    AnnotatedMessage {
        text,
        payment_intent: Some(found.as_str().to_string()),
    }
}

/// Annotates a transcript, one output per input, in order.
pub fn annotate<S: AsRef<str>>(messages: &[S]) -> Vec<AnnotatedMessage> {
    messages
        .iter()
        .map(|message| annotate_message(message.as_ref()))
        .collect()
}

/// Annotates an untyped JSON transcript.
///
/// Anything other than an array yields nothing. Non-string elements are
/// annotated through their JSON text so positions are preserved.
pub fn annotate_value(messages: &Value) -> Vec<AnnotatedMessage> {
    let Value::Array(items) = messages else {
        return Vec::new();
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(text) => annotate_message(text),
            other => annotate_message(&other.to_string()),
        })
        .collect()
}

/// Builds dashboard links for extracted identifiers. The dashboard is never contacted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLinks {
    base: String,
}

impl Default for DashboardLinks {
    fn default() -> Self {
        Self::new(DEFAULT_DASHBOARD_BASE)
    }
}

impl DashboardLinks {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn payment_url(&self, payment_intent_id: &str) -> String {
        format!("{}/payments/{}", self.base, payment_intent_id)
    }

    pub fn link_for(&self, message: &AnnotatedMessage) -> Option<String> {
        message
            .payment_intent
            .as_deref()
            .map(|id| self.payment_url(id))
    }
}
