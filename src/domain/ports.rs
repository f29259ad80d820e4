use super::payment::{ApiReply, PaymentIntent, ProcessedPayment};
use super::reader::Reader;
use crate::error::{Result, TerminalError};
use async_trait::async_trait;

/// The payments backend the session drives.
///
/// `Err` is reserved for transport and decoding failures; errors the backend
/// reports on purpose come back as [`ApiReply::Rejected`].
#[async_trait]
pub trait TerminalBackend: Send + Sync {
    async fn list_readers(&self) -> Result<ApiReply<Vec<Reader>>>;
    async fn process_payment(
        &self,
        amount: &str,
        reader_id: &str,
    ) -> Result<ApiReply<ProcessedPayment>>;
    async fn simulate_payment(&self, reader_id: &str) -> Result<ApiReply<()>>;
    async fn capture_payment(&self, payment_intent_id: &str) -> Result<ApiReply<PaymentIntent>>;
    /// Cancels the reader's current action. With no reader selected the request
    /// still goes out and the backend decides.
    async fn cancel_payment(&self, reader_id: Option<&str>) -> Result<ApiReply<Reader>>;
}

pub type TerminalBackendBox = Box<dyn TerminalBackend>;

/// Diagnostic channel for the operator. Nothing written here reaches the transcript.
pub trait OperatorConsole: Send + Sync {
    fn failure(&self, context: &str, error: &TerminalError);
    fn warning(&self, context: &str, message: &str);
    fn notice(&self, message: &str);
}

pub type OperatorConsoleBox = Box<dyn OperatorConsole>;
