//! CLI binary for jpg2pdf.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use jpg2pdf::{
    convert_to_file, default_output_filename, format_file_size, inspect, ConversionConfig,
    ConversionProgressCallback, FitMode, Jpg2PdfError, PageSize, ProcessingMode, ProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
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

/// Terminal progress callback: a bar that advances once per processed image.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_conversion_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading images…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Processing");
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_images: usize) {
        self.activate_bar(total_images);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Creating PDF from {total_images} images…"))
        ));
    }

    fn on_image_start(&self, index: usize, _total: usize) {
        self.bar.set_message(format!("image {}", index + 1));
    }

    fn on_image_complete(&self, index: usize, total: usize, jpeg_len: usize) {
        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format_file_size(jpeg_len as u64)),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, _total_images: usize, _pdf_len: usize) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Combine photos into an A4 PDF (converted_images_<timestamp>.pdf)
  jpg2pdf holiday-*.jpg

  # Grayscale, US Letter, 300 DPI
  jpg2pdf --grayscale --page-size letter --dpi 300 scan1.jpg scan2.jpg -o scans.pdf

  # Stretch every image to fill the page
  jpg2pdf --fit into poster.jpg -o poster.pdf

  # Mix local files and URLs
  jpg2pdf cover.jpg https://example.com/page2.jpg -o book.pdf

  # Preview sizes and aspect ratios without building a PDF
  jpg2pdf --inspect-only *.jpg

PAGE SIZES:
  a4       210 × 297 mm (default)
  letter   8.5 × 11 in
  legal    8.5 × 14 in
  a3       297 × 420 mm

TIPS:
  Higher DPI = smaller images on the page (more pixels per inch).
  Grayscale and lower --quality both give smaller files.
"#;

/// Combine JPEG images into a single PDF.
#[derive(Parser, Debug)]
#[command(
    name = "jpg2pdf",
    version,
    about = "Combine JPEG images into a single PDF, optionally in grayscale",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// JPEG files or HTTP/HTTPS URLs, in page order.
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output PDF path. Default: converted_images_<YYYYMMDD-HHMMSS>.pdf
    #[arg(short, long, env = "JPG2PDF_OUTPUT")]
    output: Option<PathBuf>,

    /// Processing mode.
    #[arg(long, env = "JPG2PDF_MODE", value_enum, default_value = "color")]
    mode: ModeArg,

    /// Shorthand for --mode grayscale.
    #[arg(short, long, env = "JPG2PDF_GRAYSCALE")]
    grayscale: bool,

    /// PDF page size.
    #[arg(long, env = "JPG2PDF_PAGE_SIZE", value_enum, default_value = "a4")]
    page_size: PageSizeArg,

    /// Image DPI (72–300).
    #[arg(long, env = "JPG2PDF_DPI", default_value_t = 150,
          value_parser = clap::value_parser!(u32).range(72..=300))]
    dpi: u32,

    /// Scaling: shrink oversized images, or fit every image into the page.
    #[arg(long, env = "JPG2PDF_FIT", value_enum, default_value = "shrink")]
    fit: FitArg,

    /// JPEG quality used when re-encoding images (1–100).
    #[arg(long, env = "JPG2PDF_QUALITY", default_value_t = 75,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// Document title stored in the PDF metadata.
    #[arg(long, env = "JPG2PDF_TITLE")]
    title: Option<String>,

    /// Number of URL inputs downloaded at once.
    #[arg(short, long, env = "JPG2PDF_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "JPG2PDF_DOWNLOAD_TIMEOUT", default_value_t = 60)]
    download_timeout: u64,

    /// Print per-image details only, no PDF.
    #[arg(long)]
    inspect_only: bool,

    /// Print results as JSON.
    #[arg(long, env = "JPG2PDF_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "JPG2PDF_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "JPG2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "JPG2PDF_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum ModeArg {
    Color,
    Grayscale,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum PageSizeArg {
    A4,
    Letter,
    Legal,
    A3,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum FitArg {
    Shrink,
    Into,
}

impl From<ModeArg> for ProcessingMode {
    fn from(v: ModeArg) -> Self {
        match v {
            ModeArg::Color => ProcessingMode::Color,
            ModeArg::Grayscale => ProcessingMode::Grayscale,
        }
    }
}

impl From<PageSizeArg> for PageSize {
    fn from(v: PageSizeArg) -> Self {
        match v {
            PageSizeArg::A4 => PageSize::A4,
            PageSizeArg::Letter => PageSize::Letter,
            PageSizeArg::Legal => PageSize::Legal,
            PageSizeArg::A3 => PageSize::A3,
        }
    }
}

impl From<FitArg> for FitMode {
    fn from(v: FitArg) -> Self {
        match v {
            FitArg::Shrink => FitMode::Shrink,
            FitArg::Into => FitMode::Into,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; -v always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let infos = inspect(&cli.inputs, &config)
            .await
            .context("Failed to inspect images")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&infos).context("Failed to serialise image info")?
            );
        } else {
            for info in &infos {
                println!(
                    "{:>3}. {}  {}×{} ({})  {}  {}",
                    info.index + 1,
                    bold(&info.name),
                    info.width,
                    info.height,
                    info.aspect_ratio,
                    info.size,
                    dim(info.mode.badge()),
                );
            }
            let count = infos.len();
            println!(
                "{} {} {}",
                green("✔"),
                count,
                if count == 1 { "file" } else { "files" }
            );
        }
        return Ok(());
    }

    // ── Run conversion ───────────────────────────────────────────────────
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_output_filename()));

    let stats = match convert_to_file(&cli.inputs, &output_path, &config).await {
        Ok(stats) => stats,
        Err(e @ Jpg2PdfError::NoImages) => {
            eprintln!("{} {}", yellow("⚠"), e);
            return Ok(());
        }
        Err(e) => return Err(e).context("PDF creation failed"),
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialise stats")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  PDF created  →  {}",
            green("✔"),
            bold(&output_path.display().to_string()),
        );
        eprintln!(
            "   Size: {}  •  Pages: {}  •  Format: {}  •  {}  •  {} DPI  {}",
            bold(&format_file_size(stats.pdf_bytes as u64)),
            bold(&stats.page_count.to_string()),
            bold(stats.mode.badge()),
            stats.page_size.label(),
            stats.dpi,
            dim(&format!("{}ms", stats.total_duration_ms)),
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mode = if cli.grayscale {
        ProcessingMode::Grayscale
    } else {
        cli.mode.clone().into()
    };

    let mut builder = ConversionConfig::builder()
        .mode(mode)
        .page_size(cli.page_size.clone().into())
        .dpi(cli.dpi)
        .fit(cli.fit.clone().into())
        .jpeg_quality(cli.quality)
        .concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref title) = cli.title {
        builder = builder.title(title);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
