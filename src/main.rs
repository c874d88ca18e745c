use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;

use match_lens::aggregate;
use match_lens::export::{self, ExportFormat};
use match_lens::insights::DetailLevel;
use match_lens::report::{self, PlayerStat};
use match_lens::settings::Settings;
use match_lens::synthetic::{self, SyntheticConfig};

#[derive(Parser)]
#[command(name = "match_lens")]
#[command(about = "Team statistics and tactical insights from football match event logs", long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the match summary and insights for an event log
    Analyze {
        file: PathBuf,

        /// Minimal, Medium or Detailed (Russian labels accepted)
        #[arg(long)]
        detail: Option<String>,

        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Also print a player ranking for this stat (goals, passes, pass_accuracy, ...)
        #[arg(long)]
        rank: Option<String>,

        /// Minimum passes for a pass-network edge
        #[arg(long)]
        min_passes: Option<u32>,
    },
    /// Write the full report to .json or .xlsx
    Export {
        file: PathBuf,

        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        detail: Option<String>,
    },
    /// Generate a synthetic event log
    Demo {
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value = "7")]
        seed: u64,

        #[arg(long, default_value = "120")]
        events_per_half: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let mut settings = Settings::from_env();

    match cli.command {
        Commands::Analyze {
            file,
            detail,
            format,
            rank,
            min_passes,
        } => {
            if let Some(raw) = detail {
                settings.detail = DetailLevel::parse(&raw);
            }
            if let Some(n) = min_passes {
                settings.min_passes = n.max(1);
            }
            let stat = rank
                .map(|raw| raw.parse::<PlayerStat>().map_err(anyhow::Error::msg))
                .transpose()?;
            run_analyze(&file, &settings, format, stat)
        }
        Commands::Export { file, out, detail } => {
            if let Some(raw) = detail {
                settings.detail = DetailLevel::parse(&raw);
            }
            run_export(&file, &out, &settings)
        }
        Commands::Demo {
            out,
            seed,
            events_per_half,
        } => run_demo(&out, seed, events_per_half),
    }
}

fn run_analyze(
    file: &Path,
    settings: &Settings,
    format: OutputFormat,
    stat: Option<PlayerStat>,
) -> Result<()> {
    let analysis = aggregate::analyze_path(file)
        .with_context(|| format!("analyze {}", file.display()))?;

    match format {
        OutputFormat::Text => {
            print!("{}", report::render_text(&analysis, settings));
            if let Some(stat) = stat {
                for team in analysis.teams() {
                    println!();
                    println!("{} - top by {}", team.name, stat.label());
                    for (idx, row) in report::top_players(team, stat, settings.top_players)
                        .iter()
                        .enumerate()
                    {
                        println!("  {}. {} {}", idx + 1, row.player, row.value);
                    }
                }
            }
        }
        OutputFormat::Json => {
            let built = export::build_report(&analysis, settings, Some(file));
            let json = serde_json::to_string_pretty(&built).context("serialize report")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn run_export(file: &Path, out: &Path, settings: &Settings) -> Result<()> {
    let analysis = aggregate::analyze_path(file)
        .with_context(|| format!("analyze {}", file.display()))?;
    let built = export::build_report(&analysis, settings, Some(file));

    match ExportFormat::from_path(out)? {
        ExportFormat::Json => {
            export::write_json(&built, out)?;
            println!("Report written: {}", out.display());
        }
        ExportFormat::Xlsx => {
            let summary = export::write_xlsx(&built, out)?;
            println!("Workbook written: {}", out.display());
            println!(
                "Teams: {}  Players: {}  Pass links: {}  Insights: {}",
                summary.teams, summary.players, summary.edges, summary.insights
            );
        }
    }
    Ok(())
}

fn run_demo(out: &Path, seed: u64, events_per_half: usize) -> Result<()> {
    let cfg = SyntheticConfig {
        events_per_half,
        ..SyntheticConfig::default()
    };
    let events = synthetic::generate_match(seed, &cfg);
    let file = File::create(out).with_context(|| format!("create {}", out.display()))?;
    synthetic::write_csv(&events, BufWriter::new(file))
        .with_context(|| format!("write {}", out.display()))?;
    info!("seed {seed}: {} events", events.len());
    println!("Demo match written: {} ({} events)", out.display(), events.len());
    Ok(())
}
