//! Scan orchestration.
//!
//! One run per inbound event:
//! 1. resolve the upstream payload (inline, event URL, or configured base URL)
//! 2. normalize
//! 3. load and decode the baseline snapshot, isolating any failure
//! 4. diff, then save the new snapshot (failures logged, never fatal)
//! 5. render and encode the report
//! 6. store the document in the sink
//! 7. notify the recipient, if any

use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use specwatch_core::{
    compare, emit_diff_computed, emit_render_finished, emit_scan_finished, emit_scan_normalized,
    emit_scan_started, emit_snapshot_error, normalize, render_pdf, scan_span, DiffReport, NormalizedScan,
    ReportPayload, ScanIdentity, ScanSnapshot, Summary, METRICS,
};
use specwatch_state::{
    DocumentKey, DocumentRef, DocumentSink, FsDocumentSink, FsSnapshotStore, SnapshotKey,
    SnapshotStore,
};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

use crate::config::PipelineConfig;
use crate::error::{PipelineError, UpstreamError};
use crate::notify::{compose_notification, LogNotifier, Notifier};
use crate::upstream::{extract_violations, report_url, ReportFetcher, UpstreamClient};
use crate::webhook::{parse_event, ScanRequest};

/// Result of a successful scan.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanOutcome {
    pub scan_id: Uuid,
    pub identity: ScanIdentity,
    pub summary: Summary,
    /// `None` when the baseline could not be read or decoded.
    pub diff: Option<DiffReport>,
    pub document: DocumentRef,
    pub pages: usize,
    pub snapshot_saved: bool,
    /// Recipient the report was sent to, if any.
    pub notified: Option<String>,
    pub duration_ms: u64,
}

impl ScanOutcome {
    /// Compact success payload for webhook responses.
    pub fn success_payload(&self) -> Value {
        json!({
            "status": "ok",
            "scanId": self.scan_id,
            "score": self.summary.score,
            "passed": self.summary.passed,
            "totalIssues": self.summary.total_issues,
            "scoreChange": self.diff.as_ref().map(|d| d.score_change),
            "reportUrl": self.document.url,
            "expiresAt": self.document.expires_at,
            "pages": self.pages,
        })
    }
}

/// Scan pipeline wired to its collaborators.
pub struct ScanPipeline {
    config: PipelineConfig,
    fetcher: Arc<dyn ReportFetcher>,
    snapshots: Arc<dyn SnapshotStore>,
    sink: Arc<dyn DocumentSink>,
    notifier: Arc<dyn Notifier>,
}

impl ScanPipeline {
    pub fn new(
        config: PipelineConfig,
        fetcher: Arc<dyn ReportFetcher>,
        snapshots: Arc<dyn SnapshotStore>,
        sink: Arc<dyn DocumentSink>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            config,
            fetcher,
            snapshots,
            sink,
            notifier,
        }
    }

    /// Filesystem-backed pipeline under `config.data_dir`, fetching over
    /// HTTP and logging notifications.
    pub fn from_config(config: PipelineConfig) -> Result<Self, PipelineError> {
        let fetcher = UpstreamClient::new(&config)?;
        let snapshots = FsSnapshotStore::new(&config.data_dir).map_err(|e| {
            PipelineError::Config(format!("snapshot store at {}: {e}", config.data_dir.display()))
        })?;
        let sink = FsDocumentSink::new(&config.data_dir, config.link_ttl).map_err(|e| {
            PipelineError::Config(format!("document sink at {}: {e}", config.data_dir.display()))
        })?;
        info!(data_dir = %config.data_dir.display(), "Pipeline storage ready");

        Ok(Self::new(
            config,
            Arc::new(fetcher),
            Arc::new(snapshots),
            Arc::new(sink),
            Arc::new(LogNotifier),
        ))
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Handle a raw webhook body and answer with a success or failure payload.
    pub async fn handle_event(&self, body: &[u8]) -> Value {
        let request = match parse_event(body) {
            Ok(request) => request,
            Err(e) => {
                warn!(error = %e, "Rejected event");
                return e.failure_payload();
            }
        };
        match self.run(&request).await {
            Ok(outcome) => outcome.success_payload(),
            Err(e) => e.failure_payload(),
        }
    }

    /// Run the full scan for one request.
    pub async fn run(&self, request: &ScanRequest) -> Result<ScanOutcome, PipelineError> {
        let identity = request.identity();
        let span = scan_span(&identity);
        async {
            let start = Instant::now();
            emit_scan_started(&identity);

            let result = self.execute(request, &identity, start).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match &result {
                Ok(_) => METRICS.inc_scans_completed(),
                Err(e) => {
                    METRICS.inc_scans_failed();
                    warn!(stage = %e.stage(), error = %e, "Scan aborted");
                }
            }
            emit_scan_finished(&identity, duration_ms, result.is_ok());
            METRICS.flush();
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        request: &ScanRequest,
        identity: &ScanIdentity,
        start: Instant,
    ) -> Result<ScanOutcome, PipelineError> {
        let scan_id = Uuid::new_v4();
        let key = SnapshotKey::new(identity.owner.as_str(), identity.subject.as_str())
            .map_err(|e| PipelineError::InvalidEvent(e.to_string()))?;

        // Fetch + normalize
        let raw = self.resolve_report(request, identity).await?;
        let scan = normalize(extract_violations(&raw)?)?;
        METRICS.add_issues_normalized(scan.issues.len() as u64);
        emit_scan_normalized(
            scan.summary.total_issues,
            scan.summary.errors,
            scan.summary.warnings,
            scan.summary.score,
        );

        // Baseline: read failures and malformed snapshots both mean "no diff"
        let diff = self.load_baseline(&key).await.map(|previous| compare(&scan, previous.as_ref()));
        if let Some(d) = &diff {
            emit_diff_computed(
                d.is_first_scan,
                d.new_issues.len(),
                d.resolved_issues.len(),
                d.score_change,
            );
        }

        let scanned_at = Utc::now();
        let snapshot_saved = self.save_snapshot(&key, identity, &scan, scanned_at).await;

        // Render
        let render_start = Instant::now();
        let payload = ReportPayload {
            identity,
            summary: &scan.summary,
            issues: &scan.issues,
            diff: diff.as_ref(),
            generated_at: scanned_at,
        };
        let (pdf, pages) = render_pdf(&payload, &self.config.render)?;
        METRICS.add_pages_rendered(pages as u64);
        emit_render_finished(pages, pdf.len(), render_start.elapsed().as_millis() as u64);

        // Store
        let doc_key = DocumentKey::for_snapshot(&key, format!("report-{scan_id}.pdf"))
            .map_err(PipelineError::Sink)?;
        let document = self.sink.put(&doc_key, &pdf).await.map_err(PipelineError::Sink)?;
        info!(url = %document.url, digest = %document.digest.short(), "Report stored");

        // Notify
        let recipient = request
            .recipient
            .clone()
            .or_else(|| self.config.recipient.clone());
        if let Some(recipient) = &recipient {
            let notification =
                compose_notification(recipient, identity, &scan.summary, diff.as_ref(), &document, &pdf);
            if let Err(e) = self.notifier.send(&notification).await {
                warn!(event = "notification.failed", recipient = %recipient, error = %e);
                return Err(e.into());
            }
            METRICS.inc_notifications_sent();
        } else {
            info!("No recipient configured, skipping notification");
        }

        Ok(ScanOutcome {
            scan_id,
            identity: identity.clone(),
            summary: scan.summary,
            diff,
            document,
            pages,
            snapshot_saved,
            notified: recipient,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn resolve_report(
        &self,
        request: &ScanRequest,
        identity: &ScanIdentity,
    ) -> Result<Value, PipelineError> {
        if let Some(report) = &request.report {
            return Ok(report.clone());
        }
        let url = request
            .report_url
            .clone()
            .or_else(|| {
                self.config
                    .upstream_url
                    .as_deref()
                    .and_then(|base| report_url(base, identity))
            })
            .ok_or(UpstreamError::NoSource)?;
        Ok(self.fetcher.fetch(&url).await?)
    }

    /// `Some(None)`: no baseline yet. `None`: the baseline is unusable.
    async fn load_baseline(&self, key: &SnapshotKey) -> Option<Option<ScanSnapshot>> {
        let bytes = match self.snapshots.get(key).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Some(None),
            Err(e) => {
                METRICS.inc_snapshot_failures();
                emit_snapshot_error("load", &e);
                return None;
            }
        };
        match ScanSnapshot::from_slice(&bytes) {
            Ok(snapshot) => Some(Some(snapshot)),
            Err(e) => {
                METRICS.inc_snapshot_failures();
                emit_snapshot_error("decode", &e);
                None
            }
        }
    }

    async fn save_snapshot(
        &self,
        key: &SnapshotKey,
        identity: &ScanIdentity,
        scan: &NormalizedScan,
        scanned_at: DateTime<Utc>,
    ) -> bool {
        let snapshot = ScanSnapshot::new(identity, scan.summary.clone(), scan.issues.clone(), scanned_at);
        let result = match snapshot.to_vec() {
            Ok(bytes) => self.snapshots.put(key, &bytes).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                METRICS.inc_snapshot_failures();
                emit_snapshot_error("save", &e);
                false
            }
        }
    }
}
