//! SpecWatch - API definition quality reports
//!
//! The `specwatch` command drives the scan pipeline and its building blocks.
//!
//! ## Commands
//!
//! - `scan`: Run the full pipeline for one API definition
//! - `event`: Handle a raw webhook event body
//! - `normalize`: Normalize an upstream lint payload and print the summary
//! - `diff`: Compare an upstream payload against a saved snapshot
//! - `render`: Render a PDF report without storing or notifying

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use specwatch_core::{
    compare_value, normalize, render_pdf, DiffReport, NormalizedScan, ReportPayload,
    ScanIdentity, Summary,
};
use specwatch_pipeline::{
    extract_violations, load_render_config, PipelineConfig, ScanOutcome, ScanPipeline,
    ScanRequest,
};

#[derive(Parser)]
#[command(name = "specwatch")]
#[command(author = "SpecWatch Maintainers")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "API definition quality reports", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan one API definition: fetch, normalize, diff, render, store, notify
    Scan {
        /// Owner of the API definition
        #[arg(long)]
        owner: String,

        /// API name
        #[arg(long)]
        subject: String,

        /// API version
        #[arg(long, default_value = "")]
        version: String,

        /// Upstream payload on disk (skips fetching)
        #[arg(long, conflicts_with = "url")]
        report: Option<PathBuf>,

        /// Upstream report URL
        #[arg(long)]
        url: Option<String>,

        /// Notification recipient (overrides SPECWATCH_RECIPIENT)
        #[arg(long)]
        recipient: Option<String>,

        /// Storage root (overrides SPECWATCH_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Compositor configuration (TOML)
        #[arg(long, env = "SPECWATCH_RENDER_CONFIG")]
        render_config: Option<PathBuf>,
    },

    /// Handle a webhook event body (from a file, or stdin with `-`)
    Event {
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Storage root (overrides SPECWATCH_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },

    /// Normalize an upstream payload and print its summary
    Normalize {
        /// Upstream payload (JSON)
        input: PathBuf,

        /// Print the normalized scan as JSON
        #[arg(long)]
        output_json: bool,
    },

    /// Compare an upstream payload against a saved snapshot
    Diff {
        /// Upstream payload (JSON)
        #[arg(long)]
        current: PathBuf,

        /// Snapshot file; omit for a first scan
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Print the diff as JSON
        #[arg(long)]
        output_json: bool,
    },

    /// Render a PDF report to a file
    Render {
        /// Upstream payload (JSON)
        #[arg(long)]
        report: PathBuf,

        /// Snapshot to diff against
        #[arg(long)]
        baseline: Option<PathBuf>,

        /// Output path
        #[arg(short, long, default_value = "report.pdf")]
        output: PathBuf,

        #[arg(long, default_value = "local")]
        owner: String,

        #[arg(long, default_value = "api")]
        subject: String,

        #[arg(long, default_value = "")]
        version: String,

        /// Compositor configuration (TOML)
        #[arg(long, env = "SPECWATCH_RENDER_CONFIG")]
        render_config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    specwatch_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Scan {
            owner,
            subject,
            version,
            report,
            url,
            recipient,
            data_dir,
            render_config,
        } => {
            let mut request = ScanRequest::new(&owner, &subject, &version);
            if let Some(path) = report {
                request = request.with_report(read_json_file(&path)?);
            }
            if let Some(url) = url {
                request = request.with_report_url(&url);
            }
            if let Some(recipient) = recipient {
                request = request.with_recipient(&recipient);
            }
            cmd_scan(&request, data_dir, render_config.as_deref()).await
        }
        Commands::Event { input, data_dir } => cmd_event(&input, data_dir).await,
        Commands::Normalize { input, output_json } => cmd_normalize(&input, output_json),
        Commands::Diff {
            current,
            baseline,
            output_json,
        } => cmd_diff(&current, baseline.as_deref(), output_json),
        Commands::Render {
            report,
            baseline,
            output,
            owner,
            subject,
            version,
            render_config,
        } => cmd_render(
            &report,
            baseline.as_deref(),
            &output,
            &ScanIdentity::new(owner, subject, version),
            render_config.as_deref(),
        ),
    }
}

fn pipeline_config(data_dir: Option<PathBuf>, render_config: Option<&Path>) -> Result<PipelineConfig> {
    let mut config = PipelineConfig::from_env().context("Failed to read configuration")?;
    if let Some(dir) = data_dir {
        config = config.with_data_dir(dir);
    }
    if let Some(path) = render_config {
        config = config.with_render(load_render_config(path)?);
    }
    Ok(config)
}

/// Run the full pipeline for one request
async fn cmd_scan(
    request: &ScanRequest,
    data_dir: Option<PathBuf>,
    render_config: Option<&Path>,
) -> Result<()> {
    let config = pipeline_config(data_dir, render_config)?;
    let pipeline = ScanPipeline::from_config(config).context("Failed to set up pipeline")?;

    let outcome = pipeline
        .run(request)
        .await
        .with_context(|| format!("Scan of {} failed", request.identity()))?;
    print_outcome(&outcome);
    Ok(())
}

/// Handle a webhook body and print the response payload
async fn cmd_event(input: &Path, data_dir: Option<PathBuf>) -> Result<()> {
    let body = if input == Path::new("-") {
        let mut buf = Vec::new();
        std::io::stdin()
            .read_to_end(&mut buf)
            .context("Failed to read event from stdin")?;
        buf
    } else {
        std::fs::read(input).with_context(|| format!("Failed to read event file: {:?}", input))?
    };

    let pipeline = ScanPipeline::from_config(pipeline_config(data_dir, None)?)
        .context("Failed to set up pipeline")?;
    let response = pipeline.handle_event(&body).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if response["status"] != "ok" {
        bail!("scan failed at stage {}", response["stage"]);
    }
    Ok(())
}

fn cmd_normalize(input: &Path, json: bool) -> Result<()> {
    let scan = normalize_file(input)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&scan)?);
        return Ok(());
    }

    print_summary(&scan.summary);
    for issue in &scan.issues {
        println!(
            "  [{}] {} at {}: {}",
            issue.severity,
            issue.code,
            issue.location,
            truncate(&issue.message, 80)
        );
    }
    Ok(())
}

fn cmd_diff(current: &Path, baseline: Option<&Path>, json: bool) -> Result<()> {
    let scan = normalize_file(current)?;
    let diff = diff_against(&scan, baseline)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
    } else {
        println!("{}", render_diff_text(&diff));
    }
    Ok(())
}

fn cmd_render(
    report: &Path,
    baseline: Option<&Path>,
    output: &Path,
    identity: &ScanIdentity,
    render_config: Option<&Path>,
) -> Result<()> {
    let config = match render_config {
        Some(path) => load_render_config(path)?,
        None => Default::default(),
    };
    let scan = normalize_file(report)?;
    let diff = diff_against(&scan, baseline)?;

    let payload = ReportPayload {
        identity,
        summary: &scan.summary,
        issues: &scan.issues,
        diff: Some(&diff),
        generated_at: Utc::now(),
    };
    let (pdf, pages) = render_pdf(&payload, &config).context("Failed to render report")?;
    std::fs::write(output, &pdf).with_context(|| format!("Failed to write {:?}", output))?;

    info!(pages, bytes = pdf.len(), "Report rendered");
    println!("✓ Wrote {} ({} pages, {} bytes)", output.display(), pages, pdf.len());
    Ok(())
}

fn read_json_file(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read JSON file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {:?}", path))
}

fn normalize_file(path: &Path) -> Result<NormalizedScan> {
    let raw = read_json_file(path)?;
    let violations = extract_violations(&raw)?;
    normalize(violations).with_context(|| format!("Failed to normalize {:?}", path))
}

fn diff_against(scan: &NormalizedScan, baseline: Option<&Path>) -> Result<DiffReport> {
    let previous = baseline.map(read_json_file).transpose()?;
    compare_value(scan, previous.as_ref()).context("Baseline snapshot is malformed")
}

fn print_summary(summary: &Summary) {
    let verdict = if summary.passed { "PASSED" } else { "FAILED" };
    println!("{} (score {}/100)", verdict, summary.score);
    println!(
        "  {} issues: {} errors, {} warnings, {} info, {} hints",
        summary.total_issues, summary.errors, summary.warnings, summary.infos, summary.hints
    );
}

fn print_outcome(outcome: &ScanOutcome) {
    println!("✓ Scanned {}", outcome.identity);
    print_summary(&outcome.summary);
    match &outcome.diff {
        Some(diff) => println!("{}", render_diff_text(diff)),
        None => println!("  No comparison with the previous scan"),
    }
    if !outcome.snapshot_saved {
        println!("  ! Snapshot was not saved; the next scan will not be diffed");
    }
    println!("  Report: {}", outcome.document.url);
    if let Some(recipient) = &outcome.notified {
        println!("  Sent to: {}", recipient);
    }
}

fn render_diff_text(diff: &DiffReport) -> String {
    if diff.is_first_scan {
        return "  First scan; nothing to compare".to_string();
    }
    let mut out = format!(
        "  Score {} -> {} ({:+})\n  {} new, {} resolved, {} unchanged",
        diff.previous_score.unwrap_or(0),
        diff.current_score,
        diff.score_change,
        diff.new_issues.len(),
        diff.resolved_issues.len(),
        diff.persisting_issues.len()
    );
    for issue in &diff.new_issues {
        out.push_str(&format!("\n  + [{}] {} at {}", issue.severity, issue.code, issue.location));
    }
    for issue in &diff.resolved_issues {
        out.push_str(&format!("\n  - [{}] {} at {}", issue.severity, issue.code, issue.location));
    }
    out
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_format_flag_is_separate_from_output_format() {
        let cli = Cli::try_parse_from(["specwatch", "--json", "normalize", "r.json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Normalize { output_json: false, .. }
        ));

        let cli = Cli::try_parse_from(["specwatch", "diff", "--current", "r.json", "--output-json"])
            .unwrap();
        assert!(!cli.json);
        assert!(matches!(cli.command, Commands::Diff { output_json: true, .. }));
    }

    #[test]
    fn diff_text_shows_signed_change() {
        let text = render_diff_text(&DiffReport {
            is_first_scan: false,
            previous_score: Some(90),
            current_score: 87,
            score_change: -3,
            new_issues: Vec::new(),
            resolved_issues: Vec::new(),
            persisting_issues: Vec::new(),
            summary_delta: Default::default(),
        });
        assert!(text.contains("Score 90 -> 87 (-3)"));
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééé", 8), "ééééé...");
    }
}
