use crate::domain::annotator::{AnnotatedMessage, DashboardLinks, annotate};
use crate::domain::session::TransactionState;
use std::fmt::Write;

/// `> text` followed by `[id](link)` when the message names a payment intent.
pub fn render_message(message: &AnnotatedMessage, links: &DashboardLinks) -> String {
    let mut line = format!("> {}", message.text);
    if let (Some(id), Some(url)) = (&message.payment_intent, links.link_for(message)) {
        let _ = write!(line, "[{id}]({url})");
    }
    line
}

pub fn render_messages(messages: &[AnnotatedMessage], links: &DashboardLinks) -> String {
    messages
        .iter()
        .map(|message| render_message(message, links) + "\n")
        .collect()
}

/// Renders a transcript; an absent transcript renders as nothing.
pub fn render_transcript(transcript: Option<&[String]>, links: &DashboardLinks) -> String {
    match transcript {
        Some(transcript) => render_messages(&annotate(transcript), links),
        None => String::new(),
    }
}

pub fn render_readers(state: &TransactionState) -> String {
    let Some(readers) = &state.readers else {
        return "No readers loaded\n".to_string();
    };

    let mut out = String::from("Select a reader:\n");
    if readers.is_empty() {
        out.push_str("  (none)\n");
    }
    for reader in readers {
        let marker = if state.reader_id.as_deref() == Some(reader.id.as_str()) {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(out, " {marker} {}", reader.option_label());
    }
    out
}

fn flag(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}

pub fn render_status(state: &TransactionState) -> String {
    let intent = state.payment_intent.as_ref();
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Payment Intent ID: {}",
        intent.map(|i| i.id.as_str()).unwrap_or_default()
    );
    let _ = writeln!(
        out,
        "Payment Intent status: {}",
        intent.and_then(|i| i.status.as_deref()).unwrap_or_default()
    );
    let _ = writeln!(
        out,
        "Reader Status: {}",
        state
            .reader
            .as_ref()
            .and_then(|r| r.action_status())
            .unwrap_or_default()
    );
    let _ = writeln!(out, "Reader: {}", state.reader_id.as_deref().unwrap_or_default());
    let _ = writeln!(
        out,
        "Amount: {}",
        state.amount.as_ref().map(|a| a.as_str()).unwrap_or_default()
    );
    let _ = writeln!(
        out,
        "Process: {} | Capture: {} | Simulate: {} | Cancel: enabled",
        flag(state.is_processable()),
        flag(state.is_capturable()),
        flag(state.is_simulateable())
    );
    out
}
