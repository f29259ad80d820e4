use serde::{Deserialize, Serialize};

/// The pending action a reader is currently working on, as reported by the backend.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReaderAction {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub process_payment_intent: Option<ProcessPaymentIntentAction>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessPaymentIntentAction {
    pub payment_intent: String,
}

/// A physical or simulated card reader.
///
/// Only the fields the session needs are decoded; everything else the
/// backend sends is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Reader {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub action: Option<ReaderAction>,
}

impl Reader {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        device_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            label: Some(label.into()),
            device_type: Some(device_type.into()),
            action: None,
        }
    }

    /// The human label, or the id when the reader was never labelled.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.id)
    }

    /// Simulated readers carry a device type such as `simulated_wisepos_e`.
    pub fn is_simulated(&self) -> bool {
        self.device_type
            .as_deref()
            .is_some_and(|device_type| device_type.contains("simulated"))
    }

    pub fn action_status(&self) -> Option<&str> {
        self.action.as_ref().and_then(|action| action.status.as_deref())
    }

    /// Text used for the reader-selection option, e.g. `Front Counter (tmr_123)`.
    pub fn option_label(&self) -> String {
        format!("{} ({})", self.label(), self.id)
    }
}
