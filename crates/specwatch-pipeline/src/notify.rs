//! Notification composition and transports.
//!
//! Delivery itself is out of scope; [`LogNotifier`] records the message as a
//! structured log event and [`RecordingNotifier`] keeps it in memory.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use serde::Serialize;
use specwatch_core::{DiffReport, ScanIdentity, Summary};
use specwatch_state::DocumentRef;
use thiserror::Error;

#[derive(Error, Debug)]
#[error("notification to {recipient} failed: {reason}")]
pub struct TransportError {
    pub recipient: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

/// A composed message, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Attachment>,
}

/// Build the report notification for `recipient`.
///
/// The body carries the score, severity counts, the change since the last
/// scan when a baseline existed, and the document link.
pub fn compose_notification(
    recipient: &str,
    identity: &ScanIdentity,
    summary: &Summary,
    diff: Option<&DiffReport>,
    document: &DocumentRef,
    pdf: &[u8],
) -> Notification {
    let verdict = if summary.passed { "PASSED" } else { "FAILED" };
    let subject = format!(
        "[SpecWatch] {}/{} {}: {verdict} (score {}/100)",
        identity.owner, identity.subject, identity.version, summary.score
    );

    let mut body = String::new();
    body.push_str(&format!("API quality report for {identity}\n\n"));
    body.push_str(&format!("Result: {verdict}\n"));
    body.push_str(&format!("Quality score: {}/100\n", summary.score));
    body.push_str(&format!(
        "Issues: {} total ({} errors, {} warnings, {} info, {} hints)\n",
        summary.total_issues, summary.errors, summary.warnings, summary.infos, summary.hints
    ));

    match diff {
        Some(d) if !d.is_first_scan => {
            body.push_str(&format!(
                "\nSince the last scan: score {:+} ({} -> {}), {} new, {} resolved, {} unchanged\n",
                d.score_change,
                d.previous_score.unwrap_or(0),
                d.current_score,
                d.new_issues.len(),
                d.resolved_issues.len(),
                d.persisting_issues.len()
            ));
        }
        Some(_) => body.push_str("\nThis is the first scan of this API; future reports will show changes.\n"),
        None => body.push_str("\nNo comparison with the previous scan is available.\n"),
    }

    body.push_str(&format!("\nFull report: {}\n", document.url));
    if let Some(expires) = document.expires_at {
        body.push_str(&format!(
            "The link expires {}.\n",
            expires.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    Notification {
        recipient: recipient.to_string(),
        subject,
        body,
        attachment: Some(Attachment {
            filename: document.key.name().to_string(),
            content_type: "application/pdf".to_string(),
            bytes: pdf.to_vec(),
        }),
    }
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), TransportError>;
}

/// Transport that only logs what it would send.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), TransportError> {
        tracing::info!(
            event = "notification.sent",
            recipient = %notification.recipient,
            subject = %notification.subject,
            attachment_bytes = notification.attachment.as_ref().map_or(0, |a| a.bytes.len()),
        );
        tracing::debug!(body = %notification.body, "notification body");
        Ok(())
    }
}

/// Keeps every notification in memory; can be told to fail.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), TransportError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(TransportError {
                recipient: notification.recipient.clone(),
                reason: "transport unavailable".to_string(),
            });
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}
