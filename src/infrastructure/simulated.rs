use crate::domain::payment::{ApiReply, PaymentIntent, ProcessedPayment};
use crate::domain::ports::TerminalBackend;
use crate::domain::reader::{ProcessPaymentIntentAction, Reader, ReaderAction};
use crate::error::{Result, TerminalError};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

pub const SIMULATED_READER_ID: &str = "tmr_simulated_wpe";
pub const COUNTER_READER_ID: &str = "tmr_counter_wpe";

const IN_PROGRESS: &str = "in_progress";
const SUCCEEDED: &str = "succeeded";
const REQUIRES_PAYMENT_METHOD: &str = "requires_payment_method";
const REQUIRES_CAPTURE: &str = "requires_capture";
const CANCELED: &str = "canceled";

#[derive(Default)]
struct Ledger {
    readers: BTreeMap<String, Reader>,
    payment_intents: HashMap<String, PaymentIntent>,
    offline: HashSet<String>,
    next_intent: u32,
    disconnected: bool,
}

impl Ledger {
    fn check_connection(&self) -> Result<()> {
        if self.disconnected {
            return Err(TerminalError::Unavailable(
                "simulated backend is disconnected".to_string(),
            ));
        }
        Ok(())
    }

    fn reader(&self, reader_id: &str) -> std::result::Result<&Reader, String> {
        self.readers
            .get(reader_id)
            .ok_or_else(|| format!("No such reader: '{reader_id}'"))
    }
}

/// An in-memory stand-in for the demo backend.
///
/// Models the reader fleet and the payment-intent lifecycle closely enough to
/// drive a session end to end: process puts an intent on a reader, simulate
/// presents a test card, capture settles it, cancel clears the reader.
/// Readers can be taken offline and the whole backend can be disconnected to
/// exercise both failure channels.
#[derive(Default, Clone)]
pub struct SimulatedTerminalBackend {
    ledger: Arc<RwLock<Ledger>>,
}

impl SimulatedTerminalBackend {
    /// Creates a backend serving the given readers.
    pub fn with_readers(readers: impl IntoIterator<Item = Reader>) -> Self {
        let ledger = Ledger {
            readers: readers
                .into_iter()
                .map(|reader| (reader.id.clone(), reader))
                .collect(),
            ..Default::default()
        };
        Self {
            ledger: Arc::new(RwLock::new(ledger)),
        }
    }

    /// One simulated reader and one physical counter reader.
    pub fn demo_fleet() -> Self {
        Self::with_readers([
            Reader::new(SIMULATED_READER_ID, "Simulated WisePOS E", "simulated_wisepos_e"),
            Reader::new(COUNTER_READER_ID, "Front Counter", "bbpos_wisepos_e"),
        ])
    }

    pub async fn set_offline(&self, reader_id: &str, offline: bool) {
        let mut ledger = self.ledger.write().await;
        if offline {
            ledger.offline.insert(reader_id.to_string());
        } else {
            ledger.offline.remove(reader_id);
        }
    }

    /// Makes every call fail in transport until [`reconnect`](Self::reconnect).
    pub async fn disconnect(&self) {
        self.ledger.write().await.disconnected = true;
    }

    pub async fn reconnect(&self) {
        self.ledger.write().await.disconnected = false;
    }

    pub async fn payment_intent(&self, payment_intent_id: &str) -> Option<PaymentIntent> {
        self.ledger
            .read()
            .await
            .payment_intents
            .get(payment_intent_id)
            .cloned()
    }

    pub async fn reader(&self, reader_id: &str) -> Option<Reader> {
        self.ledger.read().await.readers.get(reader_id).cloned()
    }
}

fn minor_units(amount: &str) -> Option<i64> {
    let amount = amount.trim();
    if amount.contains('_') {
        return None;
    }
    Decimal::from_str(amount)
        .ok()
        .filter(|value| value.fract().is_zero() && *value > Decimal::ZERO)
        .and_then(|value| value.to_i64())
}

#[async_trait]
impl TerminalBackend for SimulatedTerminalBackend {
    async fn list_readers(&self) -> Result<ApiReply<Vec<Reader>>> {
        let ledger = self.ledger.read().await;
        ledger.check_connection()?;
        Ok(ApiReply::Accepted(ledger.readers.values().cloned().collect()))
    }

    async fn process_payment(
        &self,
        amount: &str,
        reader_id: &str,
    ) -> Result<ApiReply<ProcessedPayment>> {
        let mut ledger = self.ledger.write().await;
        ledger.check_connection()?;

        let reader = match ledger.reader(reader_id) {
            Ok(reader) => reader,
            Err(message) => return Ok(ApiReply::rejected(message)),
        };
        if ledger.offline.contains(reader_id) {
            return Ok(ApiReply::rejected("Reader is currently offline"));
        }
        if reader.action_status() == Some(IN_PROGRESS) {
            return Ok(ApiReply::rejected("Reader is currently busy"));
        }
        let Some(minor) = minor_units(amount) else {
            return Ok(ApiReply::rejected(format!(
                "Invalid positive integer: '{amount}'"
            )));
        };

        ledger.next_intent += 1;
        let payment_intent = PaymentIntent {
            id: format!("pi_sim_{:06}", ledger.next_intent),
            status: Some(REQUIRES_PAYMENT_METHOD.to_string()),
            amount: Some(minor),
        };
        ledger
            .payment_intents
            .insert(payment_intent.id.clone(), payment_intent.clone());

        let reader = match ledger.readers.get_mut(reader_id) {
            Some(reader) => reader,
            None => return Ok(ApiReply::rejected(format!("No such reader: '{reader_id}'"))),
        };
        reader.action = Some(ReaderAction {
            status: Some(IN_PROGRESS.to_string()),
            kind: Some("process_payment_intent".to_string()),
            process_payment_intent: Some(ProcessPaymentIntentAction {
                payment_intent: payment_intent.id.clone(),
            }),
        });
        debug!(payment_intent = %payment_intent.id, reader_id, "Simulated process");

        Ok(ApiReply::Accepted(ProcessedPayment {
            reader: reader.clone(),
            payment_intent,
        }))
    }

    async fn simulate_payment(&self, reader_id: &str) -> Result<ApiReply<()>> {
        let mut ledger = self.ledger.write().await;
        ledger.check_connection()?;

        let reader = match ledger.reader(reader_id) {
            Ok(reader) => reader,
            Err(message) => return Ok(ApiReply::rejected(message)),
        };
        if !reader.is_simulated() {
            return Ok(ApiReply::rejected(
                "Only simulated readers can present a payment method",
            ));
        }
        if ledger.offline.contains(reader_id) {
            return Ok(ApiReply::rejected("reader offline"));
        }
        let pending = reader
            .action
            .as_ref()
            .filter(|action| action.status.as_deref() == Some(IN_PROGRESS))
            .and_then(|action| action.process_payment_intent.as_ref())
            .map(|action| action.payment_intent.clone());
        let Some(payment_intent_id) = pending else {
            return Ok(ApiReply::rejected("Reader has no action to complete"));
        };

        if let Some(intent) = ledger.payment_intents.get_mut(&payment_intent_id) {
            intent.status = Some(REQUIRES_CAPTURE.to_string());
        }
        if let Some(action) = ledger
            .readers
            .get_mut(reader_id)
            .and_then(|reader| reader.action.as_mut())
        {
            action.status = Some(SUCCEEDED.to_string());
        }
        debug!(payment_intent = %payment_intent_id, reader_id, "Simulated card tap");

        Ok(ApiReply::Accepted(()))
    }

    async fn capture_payment(&self, payment_intent_id: &str) -> Result<ApiReply<PaymentIntent>> {
        let mut ledger = self.ledger.write().await;
        ledger.check_connection()?;

        let Some(intent) = ledger.payment_intents.get_mut(payment_intent_id) else {
            return Ok(ApiReply::rejected(format!(
                "No such payment_intent: '{payment_intent_id}'"
            )));
        };
        let status = intent.status.as_deref().unwrap_or_default();
        if status != REQUIRES_CAPTURE {
            return Ok(ApiReply::rejected(format!(
                "This PaymentIntent could not be captured because it has a status of {status}."
            )));
        }

        intent.status = Some(SUCCEEDED.to_string());
        Ok(ApiReply::Accepted(intent.clone()))
    }

    async fn cancel_payment(&self, reader_id: Option<&str>) -> Result<ApiReply<Reader>> {
        let mut ledger = self.ledger.write().await;
        ledger.check_connection()?;

        let Ledger {
            readers,
            payment_intents,
            ..
        } = &mut *ledger;
        let Some(reader_id) = reader_id else {
            return Ok(ApiReply::rejected("Missing required param: reader."));
        };
        let Some(reader) = readers.get_mut(reader_id) else {
            return Ok(ApiReply::rejected(format!("No such reader: '{reader_id}'")));
        };

        if let Some(action) = reader.action.take()
            && action.status.as_deref() == Some(IN_PROGRESS)
            && let Some(pending) = action.process_payment_intent
            && let Some(intent) = payment_intents.get_mut(&pending.payment_intent)
        {
            intent.status = Some(CANCELED.to_string());
        }

        Ok(ApiReply::Accepted(reader.clone()))
    }
}
