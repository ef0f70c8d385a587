// src/main.rs
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use glob::glob;
use racehq2slam::{convert_with, inspect, ConvertConfig, OutputFormat};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "racehq2slam")]
#[command(about = "Convert timing-system race results into the results-system import format")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert one export
    Convert {
        input: PathBuf,
        /// Destination; .csv, .parquet or .json unless the config forces a format
        output: PathBuf,
        /// YAML conversion config
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        sheet_name: Option<String>,
    },
    /// Convert every export matching a glob pattern, one after another
    Batch {
        pattern: String,
        #[arg(long)]
        out_dir: PathBuf,
        /// csv, parquet or json (default: config format, else csv)
        #[arg(long)]
        format: Option<OutputFormat>,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show the detected layout and event blocks without converting
    Inspect { input: PathBuf },
}

fn load_config(path: Option<&Path>) -> Result<ConvertConfig> {
    match path {
        Some(p) => ConvertConfig::load(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(ConvertConfig::default()),
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert {
            input,
            output,
            config,
            sheet_name,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(name) = sheet_name {
                cfg.sheet_name = name;
            }
            let summary = convert_with(&input, &output, &cfg)
                .with_context(|| format!("converting {}", input.display()))?;
            println!(
                "{} -> {}: {} records across {} events ({} layout)",
                input.display(),
                summary.output.display(),
                summary.records,
                summary.events,
                summary.layout
            );
        }

        Commands::Batch {
            pattern,
            out_dir,
            format,
            config,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            let format = format.or(cfg.format).unwrap_or(OutputFormat::Csv);
            cfg.format = Some(format);
            let inputs: Vec<PathBuf> = glob(&pattern)
                .with_context(|| format!("Failed to read glob pattern '{}'", pattern))?
                .filter_map(|entry| entry.ok())
                .collect();
            if inputs.is_empty() {
                bail!("no files match '{}'", pattern);
            }
            info!(files = inputs.len(), %format, "batch conversion");

            let mut failed = 0usize;
            for input in &inputs {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "output".to_string());
                let output = out_dir.join(format!("{}.{}", stem, format.extension()));
                match convert_with(input, &output, &cfg) {
                    Ok(summary) => info!(
                        input = %input.display(),
                        output = %output.display(),
                        records = summary.records,
                        "converted"
                    ),
                    Err(e) => {
                        error!(input = %input.display(), "conversion failed: {}", e);
                        failed += 1;
                    }
                }
            }

            println!("converted {}/{} files", inputs.len() - failed, inputs.len());
            if failed > 0 {
                bail!("{} of {} files failed", failed, inputs.len());
            }
        }

        Commands::Inspect { input } => {
            let report =
                inspect(&input).with_context(|| format!("inspecting {}", input.display()))?;
            println!(
                "{}: {} rows, {} layout (marker {})",
                input.display(),
                report.rows,
                report.layout,
                report.layout.marker()
            );
            for block in &report.blocks {
                println!(
                    "  {:<24} header row {:>5}  athletes {:>4}",
                    block.title,
                    block.header_row,
                    block.body_len()
                );
            }
        }
    }

    Ok(())
}
