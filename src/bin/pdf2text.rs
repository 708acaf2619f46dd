//! CLI binary for pdf2text.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `CleanupConfig`, picks an input file interactively when none is given,
//! and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2text::{
    clean_to_file, inspect, CleanupConfig, CleanupProgressCallback, CleanupSummary,
    LlmStageStatus, PipelineStats, ProgressCallback, Stage,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: prints a line per pipeline stage and renders
/// a live progress bar while pages move through the LLM polish stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by `on_llm_start`
    /// (the only stage slow enough to deserve a bar).
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Cleaning");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    /// Switch to the full progress-bar style once the polish stage begins.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Polishing");
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl CleanupProgressCallback for CliProgressCallback {
    fn on_extraction_complete(&self, page_count: usize, total_chars: usize) {
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Extracted {page_count} pages  ({total_chars} chars)"))
        ));
        self.bar.set_message("cleaning pages");
    }

    fn on_stage_complete(&self, stage: Stage, total_chars: usize) {
        self.bar.println(format!(
            "  {} {:<24} {}",
            green("✓"),
            stage.as_str(),
            dim(&format!("{total_chars} chars"))
        ));
    }

    fn on_llm_start(&self, total_pages: usize) {
        self.activate_bar(total_pages);
    }

    fn on_page_polished(&self, page_num: usize, total: usize, chars: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{chars:>5} chars")),
        ));
        self.bar.inc(1);
    }

    fn on_llm_fallback(&self, reason: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg: String = if reason.chars().count() > 120 {
            format!("{}\u{2026}", reason.chars().take(119).collect::<String>())
        } else {
            reason.to_string()
        };
        self.bar.println(format!(
            "  {} LLM polish fell back to cleaned text: {}",
            red("✗"),
            red(&msg)
        ));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Interactive: pick a PDF from the current directory
  pdf2text

  # Clean a specific file (output defaults to document_cleaned.txt)
  pdf2text document.pdf

  # Explicit output path
  pdf2text document.pdf -o cleaned/api_reference.txt

  # Force the LLM polish stage with a specific model
  pdf2text --llm --model gpt-4.1-mini document.pdf

  # Deterministic cleanup only, even if an API key is set
  pdf2text --no-llm document.pdf

  # Inspect page count / PDF version (no API key needed)
  pdf2text --inspect-only document.pdf

OUTPUT FILES:
  <stem>_cleaned.txt        annotated text, one "=== Page N ===" section per page
  <output>.stats.json       character counts after each pipeline stage

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY          enables the LLM polish stage when set
  ANTHROPIC_API_KEY       alternative provider key (use with --provider)
  PDF2TEXT_MODEL          override model ID
  PDF2TEXT_PROVIDER       override provider (openai, anthropic, ollama, ...)

  Without any API key the polish stage is skipped silently and the output
  is exactly the deterministic cleanup result.
"#;

/// Convert PDF files to cleaned plain text.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2text",
    version,
    about = "Convert PDF files to cleaned plain text, optionally polished by an LLM",
    long_about = "Extract per-page text from a PDF, run deterministic cleanup passes \
(whitespace, page-number artifacts, duplicate lines, boilerplate paragraphs), optionally \
polish the result through an LLM, and write an annotated text file plus a statistics sidecar.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path. Omit to pick interactively from `*.pdf` in the
    /// current directory.
    input: Option<PathBuf>,

    /// Write cleaned text to this file instead of `<stem>_cleaned.txt`.
    #[arg(short, long, env = "PDF2TEXT_OUTPUT")]
    output: Option<PathBuf>,

    /// LLM model ID (e.g. gpt-4.1-nano, gpt-4.1-mini).
    #[arg(long, env = "PDF2TEXT_MODEL")]
    model: Option<String>,

    /// LLM provider: openai, anthropic, ollama, ...
    /// Auto-detected from API key env vars if not set.
    #[arg(long, env = "PDF2TEXT_PROVIDER")]
    provider: Option<String>,

    /// Force-enable the LLM polish stage.
    #[arg(long, conflicts_with = "no_llm")]
    llm: bool,

    /// Disable the LLM polish stage even when an API key is present.
    #[arg(long)]
    no_llm: bool,

    /// Characters per LLM request.
    #[arg(long, env = "PDF2TEXT_CHUNK_SIZE", default_value_t = 4000)]
    chunk_size: usize,

    /// Max LLM output tokens per chunk.
    #[arg(long, env = "PDF2TEXT_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Print page count / PDF version only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Output inspect results as JSON.
    #[arg(long, requires = "inspect_only")]
    json: bool,

    /// Disable progress output.
    #[arg(long, env = "PDF2TEXT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2TEXT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2TEXT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Progress output provides all the feedback that matters; suppress
    // INFO-level library logs unless the user asked for them.
    let show_progress = !cli.quiet && !cli.no_progress;
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

    // ── Resolve input ────────────────────────────────────────────────────
    let input = match cli.input.clone() {
        Some(path) => path,
        None => match pick_pdf_interactively()? {
            Some(path) => path,
            None => return Ok(()), // user quit the picker
        },
    };

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&input).context("Failed to inspect PDF")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise info")?
            );
        } else {
            println!("File:         {}", input.display());
            println!("Pages:        {}", info.page_count);
            println!("PDF Version:  {}", info.pdf_version);
        }
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&input));

    // ── Build config ─────────────────────────────────────────────────────
    let llm_enabled = !cli.no_llm
        && (cli.llm
            || cli.provider.is_some()
            || std::env::var("OPENAI_API_KEY").is_ok_and(|k| !k.is_empty()));

    let progress_cb: Option<(Arc<CliProgressCallback>, ProgressCallback)> = if show_progress {
        let cb = CliProgressCallback::new();
        let dyn_cb: ProgressCallback = cb.clone();
        Some((cb, dyn_cb))
    } else {
        None
    };

    let mut builder = CleanupConfig::builder()
        .llm_cleanup(llm_enabled)
        .chunk_chars(cli.chunk_size)
        .max_tokens(cli.max_tokens);
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some((_, ref dyn_cb)) = progress_cb {
        builder = builder.progress_callback(Arc::clone(dyn_cb));
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the pipeline ─────────────────────────────────────────────────
    let summary = clean_to_file(&input, &output_path, &config)
        .await
        .context("Cleanup failed")?;

    if let Some((ref cb, _)) = progress_cb {
        cb.finish();
    }

    report(&cli, &input, &output_path, &summary);

    // The stats sidecar is advisory; the cleaned text is the deliverable.
    if summary.failed_writes.iter().any(|f| f.path == output_path) {
        anyhow::bail!("failed to write {}", output_path.display());
    }

    Ok(())
}

/// Print the run outcome and the per-stage statistics table.
fn report(cli: &Cli, input: &Path, output_path: &Path, summary: &CleanupSummary) {
    if cli.quiet {
        return;
    }

    if let Some(ref err) = summary.extraction_error {
        eprintln!(
            "{} Extraction failed, output is empty: {}",
            red("✗"),
            err.lines().next().unwrap_or(err.as_str())
        );
    }

    match &summary.llm {
        LlmStageStatus::Completed => {}
        LlmStageStatus::Skipped => {
            eprintln!("{}", dim("LLM polish skipped (disabled or no API key)"));
        }
        LlmStageStatus::FellBack { reason } => {
            eprintln!(
                "{} LLM polish fell back to cleaned text: {}",
                red("✗"),
                reason.lines().next().unwrap_or(reason.as_str())
            );
        }
    }

    eprintln!(
        "{}  {} pages  {}  →  {}",
        green("✔"),
        summary.page_count,
        dim(&input.display().to_string()),
        bold(&output_path.display().to_string()),
    );

    print_stats(&summary.stats);

    for failure in &summary.failed_writes {
        eprintln!(
            "{} Could not write {}: {}",
            red("✗"),
            failure.path.display(),
            failure.detail.lines().next().unwrap_or(failure.detail.as_str())
        );
    }
}

/// Render the stage table, guarding the zero-original-characters case.
fn print_stats(stats: &PipelineStats) {
    eprintln!("{}", bold("Pipeline statistics:"));
    for (stage, chars) in stats.rows() {
        match stats.percent_of_original(chars) {
            Some(pct) => eprintln!(
                "  {:<24} {:>10} chars  {:>6.1}%",
                stage.as_str(),
                chars,
                pct
            ),
            None => eprintln!("  {:<24} {:>10} chars  {:>6}", stage.as_str(), chars, "n/a"),
        }
    }
}

/// `document.pdf` → `document_cleaned.txt`, next to the input.
fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    input.with_file_name(format!("{stem}_cleaned.txt"))
}

/// List `*.pdf` files in the working directory and prompt for a selection.
///
/// Returns `Ok(None)` when the user quits (`q` or EOF). Invalid selections
/// re-prompt rather than abort.
fn pick_pdf_interactively() -> Result<Option<PathBuf>> {
    let mut pdfs: Vec<PathBuf> = std::fs::read_dir(".")
        .context("Failed to read current directory")?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        })
        .collect();
    pdfs.sort();

    if pdfs.is_empty() {
        anyhow::bail!("No PDF files found in the current directory");
    }

    eprintln!("{}", bold("Available PDF files:"));
    for (i, path) in pdfs.iter().enumerate() {
        eprintln!("  {:>2}. {}", i + 1, path.display());
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        eprint!("Select a PDF (1-{}, or q to quit): ", pdfs.len());
        io::stderr().flush().ok();

        let line = match lines.next() {
            Some(line) => line.context("Failed to read selection")?,
            None => return Ok(None), // EOF
        };
        let line = line.trim();

        if line.eq_ignore_ascii_case("q") {
            return Ok(None);
        }

        match line.parse::<usize>() {
            Ok(n) if (1..=pdfs.len()).contains(&n) => return Ok(Some(pdfs[n - 1].clone())),
            _ => eprintln!("{} Invalid selection: {:?}", red("✗"), line),
        }
    }
}
