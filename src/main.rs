mod analysis;
mod app;
mod chart;
mod color;
mod config;
mod data;
mod error;
mod tool;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use config::AnalysisConfig;
use error::AnalysisError;
use tool::Tool;

#[derive(Parser, Debug)]
#[command(
    version = env!("CARGO_PKG_VERSION"),
    about = env!("CARGO_PKG_DESCRIPTION"),
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Prefetch time per kernel offset (`Time` column).
    Kaslr(PlotArgs),

    /// Prefetch time per trial; `*_raw.*` files are plotted as densities.
    Spectre {
        #[command(flatten)]
        args: PlotArgs,
        /// Treat the file as raw samples regardless of its name.
        #[arg(long)]
        raw: bool,
    },

    /// Load / Prefetch / NOP / PrefetchNTA timing per address.
    Prefetch(PlotArgs),

    /// Baseline-corrected TLB timing bars with error bars (`tlb`, `errtlb`).
    Tlb(PlotArgs),
}

#[derive(Args, Debug)]
struct PlotArgs {
    /// Measurement file (.csv, .json or .parquet).
    path: PathBuf,

    /// Accepted for compatibility; charts are only shown on screen.
    output: Option<PathBuf>,

    #[command(flatten)]
    analysis: AnalysisConfig,
}

impl Command {
    fn split(self) -> (Tool, PlotArgs, bool) {
        match self {
            Command::Kaslr(args) => (Tool::Kaslr, args, false),
            Command::Spectre { args, raw } => (Tool::Spectre, args, raw),
            Command::Prefetch(args) => (Tool::Prefetch, args, false),
            Command::Tlb(args) => (Tool::Tlb, args, false),
        }
    }
}

/// The input must exist before anything is loaded.
fn check_input(args: &PlotArgs) -> Result<(), AnalysisError> {
    if !args.path.is_file() {
        return Err(AnalysisError::InputNotFound {
            path: args.path.clone(),
        });
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let (tool, args, force_raw) = cli.command.split();

    check_input(&args)?;
    if let Some(output) = &args.output {
        log::warn!(
            "Output path {} is ignored; the chart is shown interactively",
            output.display()
        );
    }

    let table = data::loader::load_file(&args.path)
        .with_context(|| format!("loading {}", args.path.display()))?;

    let mode = tool.mode(&args.path, force_raw);
    log::info!("{} in {:?} mode", tool.title(), mode);

    let chart = tool::build_chart(tool, mode, &table, &args.path, &args.analysis)?;
    app::show(chart)
}
