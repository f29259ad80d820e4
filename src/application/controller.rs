use crate::domain::annotator::{AnnotatedMessage, annotate};
use crate::domain::payment::ApiReply;
use crate::domain::ports::{OperatorConsoleBox, TerminalBackendBox};
use crate::domain::session::TransactionState;
use crate::error::TerminalError;
use tracing::{debug, instrument};

/// Drives one checkout session from reader discovery to capture or cancel.
///
/// Every handler deals with its own failures: business errors reported by the
/// backend are appended to the transcript, transport failures only reach the
/// operator console. No handler ever returns an error to its caller.
pub struct SessionController {
    backend: TerminalBackendBox,
    console: OperatorConsoleBox,
    state: TransactionState,
}

impl SessionController {
    /// Creates a controller with an empty session.
    ///
    /// # Arguments
    ///
    /// * `backend` - The payments backend to call.
    /// * `console` - Where transport failures and diagnostics are reported.
    pub fn new(backend: TerminalBackendBox, console: OperatorConsoleBox) -> Self {
        Self {
            backend,
            console,
            state: TransactionState::new(),
        }
    }

    pub fn state(&self) -> &TransactionState {
        &self.state
    }

    /// Transcript in display form, recomputed on every call.
    pub fn messages(&self) -> Vec<AnnotatedMessage> {
        annotate(self.state.transcript())
    }

    pub fn is_processable(&self) -> bool {
        self.state.is_processable()
    }

    pub fn is_capturable(&self) -> bool {
        self.state.is_capturable()
    }

    pub fn is_simulateable(&self) -> bool {
        self.state.is_simulateable()
    }

    pub fn select_reader(&mut self, reader_id: impl Into<String>) {
        self.state.select_reader(reader_id);
    }

    pub fn set_amount(&mut self, amount: &str) {
        self.state.set_amount(amount);
    }

    /// Fetches the reader listing. Failures leave the listing unset.
    #[instrument(skip_all)]
    pub async fn load_readers(&mut self) {
        match self.backend.list_readers().await {
            Ok(ApiReply::Accepted(readers)) => {
                debug!(count = readers.len(), "Loaded readers");
                self.state.readers = Some(readers);
            }
            Ok(ApiReply::Rejected(error)) => {
                self.console.warning("Error fetching readers", &error.message);
            }
            Err(e) => self.console.failure("Error fetching readers", &e),
        }
    }

    /// Sends the selected amount to the selected reader.
    #[instrument(skip_all, fields(reader_id = ?self.state.reader_id))]
    pub async fn process_payment(&mut self) {
        let (Some(amount), Some(reader_id)) = (&self.state.amount, &self.state.reader_id) else {
            self.console.failure(
                "Error processing payment",
                &TerminalError::MissingInput("amount and reader"),
            );
            return;
        };

        match self
            .backend
            .process_payment(amount.as_str(), reader_id)
            .await
        {
            Ok(ApiReply::Accepted(processed)) => {
                debug!(payment_intent = %processed.payment_intent.id, "Payment handed to reader");
                self.state
                    .apply_processed(processed.reader, processed.payment_intent);
            }
            Ok(ApiReply::Rejected(error)) => self.state.record(error.message),
            Err(e) => self.console.failure("Error processing payment", &e),
        }
    }

    /// Asks the backend to present a test card on the current simulated reader.
    #[instrument(skip_all)]
    pub async fn simulate_payment(&mut self) {
        let Some(reader) = &self.state.reader else {
            self.console.failure(
                "Error simulating payment",
                &TerminalError::MissingInput("reader"),
            );
            return;
        };
        let reader_id = reader.id.clone();

        match self.backend.simulate_payment(&reader_id).await {
            Ok(ApiReply::Accepted(())) => {
                let payment_intent_id = self
                    .state
                    .payment_intent
                    .as_ref()
                    .map(|intent| intent.id.clone())
                    .unwrap_or_default();
                self.state.apply_simulated(&reader_id, &payment_intent_id);
            }
            Ok(ApiReply::Rejected(error)) => self.state.record(error.message),
            Err(e) => self.console.failure("Error simulating payment", &e),
        }
    }

    /// Captures the current payment intent and, on success, resets the session.
    #[instrument(skip_all)]
    pub async fn capture_payment(&mut self) {
        let Some(payment_intent) = &self.state.payment_intent else {
            self.console.failure(
                "Error capturing payment",
                &TerminalError::MissingInput("payment intent"),
            );
            return;
        };

        match self.backend.capture_payment(&payment_intent.id).await {
            Ok(ApiReply::Accepted(captured)) => self.state.apply_captured(captured),
            Ok(ApiReply::Rejected(error)) => self.state.record(error.message),
            Err(e) => self.console.failure("Error capturing payment", &e),
        }
    }

    /// Cancels whatever the selected reader is doing. Outcomes are reported to
    /// the operator console only.
    #[instrument(skip_all, fields(reader_id = ?self.state.reader_id))]
    pub async fn cancel_action(&mut self) {
        match self.backend.cancel_payment(self.state.reader_id.as_deref()).await {
            Ok(ApiReply::Accepted(reader)) => {
                self.console.notice(&format!(
                    "Canceled reader action on {} ({})",
                    reader.label(),
                    reader.id
                ));
                self.state.apply_cancelled(&reader);
            }
            Ok(ApiReply::Rejected(error)) => self.console.warning("Error", &error.message),
            Err(e) => self.console.failure("Error cancelling action", &e),
        }
    }
}
