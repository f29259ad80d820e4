use super::payment::{AmountInput, PaymentIntent};
use super::reader::Reader;

/// Everything a checkout session knows.
///
/// Transitions are plain methods so they can be exercised without any
/// backend; the controller performs the I/O and then applies them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransactionState {
    /// Reader listing used for the selection options. `None` until loaded.
    pub readers: Option<Vec<Reader>>,
    pub reader_id: Option<String>,
    pub amount: Option<AmountInput>,
    pub reader: Option<Reader>,
    pub payment_intent: Option<PaymentIntent>,
    transcript: Vec<String>,
}

impl TransactionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    /// Appends to the transcript. Entries are never removed or reordered.
    pub fn record(&mut self, message: impl Into<String>) {
        self.transcript.push(message.into());
    }

    pub fn select_reader(&mut self, reader_id: impl Into<String>) {
        self.reader_id = Some(reader_id.into());
    }

    pub fn set_amount(&mut self, amount: impl Into<AmountInput>) {
        self.amount = Some(amount.into());
    }

    /// Clears reader, amount and payment intent. The transcript and the
    /// reader selection survive.
    pub fn reset(&mut self) {
        self.payment_intent = None;
        self.amount = None;
        self.reader = None;
    }

    pub fn apply_processed(&mut self, reader: Reader, payment_intent: PaymentIntent) {
        let amount = self
            .amount
            .as_ref()
            .map(AmountInput::as_str)
            .unwrap_or_default();
        let message = format!("Processing payment for {amount} on reader {}", reader.label());

        self.reader = Some(reader);
        self.payment_intent = Some(payment_intent);
        self.record(message);
    }

    pub fn apply_simulated(&mut self, reader_id: &str, payment_intent_id: &str) {
        self.record(format!(
            "Simulating a customer tapping their card on simulated reader {reader_id} \
             for payment {payment_intent_id}"
        ));
    }

    pub fn apply_captured(&mut self, payment_intent: PaymentIntent) {
        let message = format!("Captured payment for {}", payment_intent.id);
        self.payment_intent = Some(payment_intent);
        self.record(message);
        self.reset();
    }

    pub fn apply_cancelled(&mut self, reader: &Reader) {
        self.reader_id = Some(reader.id.clone());
        self.reset();
    }

    /// A positive amount and a selected reader.
    pub fn is_processable(&self) -> bool {
        self.amount.as_ref().is_some_and(AmountInput::is_positive)
            && self.reader_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// A payment intent with an identifier.
    pub fn is_capturable(&self) -> bool {
        self.payment_intent.as_ref().is_some_and(PaymentIntent::has_id)
    }

    /// A simulated current reader and a capturable payment intent.
    pub fn is_simulateable(&self) -> bool {
        self.reader.as_ref().is_some_and(Reader::is_simulated) && self.is_capturable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn simulated_reader() -> Reader {
        Reader::new("r1", "Reader 1", "simulated_wisepos_e")
    }

    #[test]
    fn test_new_state_is_empty() {
        let state = TransactionState::new();
        assert!(state.transcript().is_empty());
        assert!(state.readers.is_none());
        assert!(!state.is_processable());
        assert!(!state.is_capturable());
        assert!(!state.is_simulateable());
    }

    #[test]
    fn test_processable_combinations() {
        let mut state = TransactionState::new();
        state.set_amount("100");
        assert!(!state.is_processable(), "reader missing");

        state.select_reader("r1");
        assert!(state.is_processable());

        state.set_amount("0");
        assert!(!state.is_processable(), "amount zero");

        state.set_amount("-3");
        assert!(!state.is_processable(), "amount negative");

        state.set_amount("abc");
        assert!(!state.is_processable(), "amount not numeric");

        state.amount = None;
        assert!(!state.is_processable(), "amount absent");

        state.set_amount("5");
        state.select_reader("");
        assert!(!state.is_processable(), "empty reader id");
    }

    #[test]
    fn test_capturable_requires_intent_id() {
        let mut state = TransactionState::new();
        state.payment_intent = Some(PaymentIntent::new("", "requires_capture"));
        assert!(!state.is_capturable());

        state.payment_intent = Some(PaymentIntent::new("pi_1", "requires_capture"));
        assert!(state.is_capturable());
    }

    #[test]
    fn test_simulateable_requires_simulated_reader_and_intent() {
        let mut state = TransactionState::new();
        state.reader = Some(simulated_reader());
        assert!(!state.is_simulateable(), "no payment intent");

        state.payment_intent = Some(PaymentIntent::new("pi_1", "requires_payment_method"));
        assert!(state.is_simulateable());

        state.reader = Some(Reader::new("r2", "Counter", "bbpos_wisepos_e"));
        assert!(!state.is_simulateable(), "physical reader");

        state.reader = None;
        assert!(!state.is_simulateable(), "no reader");
    }

    #[test]
    fn test_apply_processed_records_amount_and_label() {
        let mut state = TransactionState::new();
        state.set_amount("100");
        state.select_reader("r1");

        state.apply_processed(
            simulated_reader(),
            PaymentIntent::new("pi_123", "requires_payment_method"),
        );

        assert_eq!(state.transcript(), ["Processing payment for 100 on reader Reader 1"]);
        assert!(state.is_capturable());
        assert_eq!(state.reader.as_ref().map(|r| r.id.as_str()), Some("r1"));
    }

    #[test]
    fn test_apply_captured_resets_but_keeps_transcript() {
        let mut state = TransactionState::new();
        state.record("earlier entry");
        state.set_amount("100");
        state.select_reader("r1");
        state.reader = Some(simulated_reader());
        state.payment_intent = Some(PaymentIntent::new("pi_123", "requires_capture"));

        state.apply_captured(PaymentIntent::new("pi_123", "succeeded"));

        assert_eq!(state.transcript(), ["earlier entry", "Captured payment for pi_123"]);
        assert!(state.reader.is_none());
        assert!(state.amount.is_none());
        assert!(state.payment_intent.is_none());
        assert_eq!(state.reader_id.as_deref(), Some("r1"));
    }

    #[test]
    fn test_apply_cancelled_takes_reader_id_from_response() {
        let mut state = TransactionState::new();
        state.select_reader("r1");
        state.set_amount("10");
        state.payment_intent = Some(PaymentIntent::new("pi_9", "requires_payment_method"));

        state.apply_cancelled(&Reader::new("r7", "Other", "simulated_wisepos_e"));

        assert_eq!(state.reader_id.as_deref(), Some("r7"));
        assert!(state.payment_intent.is_none());
        assert!(state.amount.is_none());
        assert!(state.transcript().is_empty());
    }

    #[test]
    fn test_transcript_keeps_duplicates_in_order() {
        let mut state = TransactionState::new();
        state.record("reader offline");
        state.record("reader offline");
        state.reset();
        assert_eq!(state.transcript(), ["reader offline", "reader offline"]);
    }
}
