//! CLI binary for doc2x-ocr.
//!
//! A thin shim over the library crate that maps CLI flags to `Doc2xConfig`
//! and an `InvocationRequest`, then prints the text result.

use anyhow::{Context, Result};
use clap::Parser;
use doc2x_ocr::{
    CancellationToken, CredentialKind, Doc2xConfig, Doc2xOcr, InvocationRequest,
    OcrProgressCallback, ProgressCallback, TextResult, UnknownStatusPolicy, DEFAULT_BASE_URL,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that follows the invocation through its stages.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Doc2X");
        bar.set_message("Resolving credential…");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl OcrProgressCallback for CliProgressCallback {
    fn on_credential_resolved(&self, kind: CredentialKind) {
        self.bar.set_message(format!("{kind} key ready"));
    }

    fn on_document_fetched(&self, bytes: usize) {
        self.bar.println(format!(
            "  {} Downloaded PDF  {}",
            green("✓"),
            dim(&format!("{:.1} KiB", bytes as f64 / 1024.0))
        ));
    }

    fn on_upload_attempt(&self, attempt: u32, max_attempts: u32) {
        self.bar.set_prefix("Uploading");
        self.bar.set_message(format!("attempt {attempt}/{max_attempts}"));
    }

    fn on_rate_limited(&self, attempt: u32, wait: Duration) {
        self.bar.println(format!(
            "  {} Rate limited on attempt {attempt}, waiting {}s",
            yellow("⚠"),
            wait.as_secs()
        ));
    }

    fn on_submitted(&self, uuid: &str) {
        self.bar.println(format!("  {} Submitted job {}", green("✓"), dim(uuid)));
        self.bar.set_prefix("Processing");
        self.bar.set_message("waiting for Doc2X…");
    }

    fn on_poll(&self, poll: u32, status: &str) {
        self.bar.set_message(format!("{status} (poll {poll})"));
    }

    fn on_complete(&self, page_count: usize, markdown_len: usize) {
        self.bar.println(format!(
            "  {} {} pages  {}",
            green("✔"),
            bold(&page_count.to_string()),
            dim(&format!("{markdown_len} chars"))
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # OCR a PDF to stdout
  doc2x https://arxiv.org/pdf/1706.03762

  # With Doc2X's OCR correction, to a file
  doc2x --correction https://example.com/scan.pdf -o scan.md

  # Remaining page quota only
  doc2x --get-limit https://example.com/scan.pdf

  # Give up after 10 minutes
  doc2x --timeout 600 https://example.com/book.pdf -o book.md

ENVIRONMENT VARIABLES:
  DOC2X_API_KEY    Doc2X API key (sk-… keys are used directly, others are refreshed)
  DOC2X_BASE_URL   Override the API host (e.g. a mock server)
  RUST_LOG         Override the log filter
"#;

/// Convert PDF URLs to Markdown using the Doc2X OCR service.
#[derive(Parser, Debug)]
#[command(
    name = "doc2x",
    version,
    about = "Convert PDF URLs to Markdown using the Doc2X OCR service",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTTP/HTTPS URL of the PDF.
    pdf_url: String,

    /// Doc2X API key.
    #[arg(long, env = "DOC2X_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Ask Doc2X to run its OCR correction pass.
    #[arg(long)]
    correction: bool,

    /// Print the remaining page quota and exit.
    #[arg(long)]
    get_limit: bool,

    /// Doc2X API host.
    #[arg(long, env = "DOC2X_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long, env = "DOC2X_OUTPUT")]
    output: Option<PathBuf>,

    /// Per-request Doc2X API timeout in seconds.
    #[arg(long, env = "DOC2X_API_TIMEOUT", default_value_t = 30)]
    api_timeout: u64,

    /// PDF download timeout in seconds.
    #[arg(long, env = "DOC2X_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Overall timeout in seconds (default: none).
    #[arg(long, env = "DOC2X_TIMEOUT")]
    timeout: Option<u64>,

    /// Interval between status polls in milliseconds.
    #[arg(long, env = "DOC2X_POLL_INTERVAL_MS", default_value_t = 1000)]
    poll_interval_ms: u64,

    /// Fail instead of waiting when Doc2X reports an unknown job status.
    #[arg(long)]
    fail_on_unknown_status: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "DOC2X_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOC2X_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOC2X_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner replaces INFO logs; --verbose always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let progress = show_progress.then(CliProgressCallback::new);
    let config = build_config(&cli, progress.clone().map(|p| p as ProgressCallback))?;
    let ocr = Doc2xOcr::new(config).context("Failed to create Doc2X client")?;

    let request = InvocationRequest {
        api_key: cli.api_key.clone(),
        pdf_url: cli.pdf_url.clone(),
        enable_correction: cli.correction,
        quota_only: cli.get_limit,
    };

    // ── Ctrl-C cancels the in-flight invocation ──────────────────────────
    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    let result = ocr.run_with_cancel(request, cancel).await;
    if let Some(ref p) = progress {
        p.finish();
    }
    let result = result.context("Doc2X OCR failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&result).context("Failed to serialise result")?;
        println!("{json}");
        return Ok(());
    }

    match (&result, &cli.output) {
        (TextResult::Markdown(md), Some(path)) => {
            write_atomic(path, md).await?;
            if !cli.quiet {
                eprintln!(
                    "{}  {} chars  →  {}",
                    green("✔"),
                    md.len(),
                    bold(&path.display().to_string())
                );
            }
        }
        _ => {
            let text = result.text();
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .context("Failed to write to stdout")?;
            if !text.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
    }

    Ok(())
}

/// Map CLI args to `Doc2xConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<Doc2xConfig> {
    let mut builder = Doc2xConfig::builder()
        .base_url(&cli.base_url)
        .api_timeout_secs(cli.api_timeout)
        .download_timeout_secs(cli.download_timeout)
        .poll_interval_ms(cli.poll_interval_ms)
        .unknown_status(if cli.fail_on_unknown_status {
            UnknownStatusPolicy::Fail
        } else {
            UnknownStatusPolicy::Wait
        });

    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Write to a sibling temp file, then rename over `path`.
async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, contents)
        .await
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
