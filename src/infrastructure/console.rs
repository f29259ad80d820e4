use crate::domain::ports::OperatorConsole;
use crate::error::TerminalError;
use tracing::{error, info, warn};

/// Operator console backed by `tracing`; where the events end up is decided by
/// the installed subscriber (stderr for the CLI).
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingConsole;

impl TracingConsole {
    pub fn new() -> Self {
        Self
    }
}

impl OperatorConsole for TracingConsole {
    fn failure(&self, context: &str, error: &TerminalError) {
        error!(context, %error, "{context}: {error}");
    }

    fn warning(&self, context: &str, message: &str) {
        warn!(context, "{context}: {message}");
    }

    fn notice(&self, message: &str) {
        info!("{message}");
    }
}
