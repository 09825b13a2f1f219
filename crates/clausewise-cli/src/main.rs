//! ClauseWise
//!
//! Finds clauses in PDF and DOCX contracts, scores their risk, and asks a
//! language model for a plain-English summary of each one.

use anyhow::{Context, Result};
use clap::Parser;
use clausewise_cli::cli::{Cli, Commands};
use clausewise_cli::display;
use clausewise_cli::{init_metrics, AppConfig, DocumentScanner, Overrides, Pipeline};
use clausewise_core::{Error, GeminiClient, LanguageModel};
use clausewise_report::{export_rows, list_saved, read_table, RiskSummary};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            path,
            output_dir,
            max_clauses,
            config,
            api_key,
            model,
            metrics,
            verbose,
        } => {
            init_tracing(verbose);
            let metrics_handle = init_metrics()?;

            let config = AppConfig::load(config.as_deref())?.with_overrides(Overrides {
                output_dir,
                max_clauses,
                model,
            });
            info!("Configuration loaded (model: {})", config.llm.model);

            let api_key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or_else(|| Error::config("GEMINI_API_KEY is not set; pass --api-key or set the variable"))?;
            let model: Arc<dyn LanguageModel> =
                Arc::new(GeminiClient::new(config.llm.gemini_config(api_key))?);

            let pipeline = Pipeline::new(&config, model)?;
            let output = pipeline
                .run_and_persist(&path, &config.output_dir)
                .await
                .with_context(|| format!("Failed to analyze {}", path.display()))?;

            println!("Analyzed {} clauses", output.table.len());
            println!("{}", display::render_summary(&RiskSummary::from_table(&output.table)));
            println!("Saved to {}", output.saved_to.display());

            if metrics {
                println!();
                print!("{}", metrics_handle.render());
            }
        }

        Commands::Detect {
            path,
            max_clauses,
            config,
            verbose,
        } => {
            init_tracing(verbose);

            let config = AppConfig::load(config.as_deref())?.with_overrides(Overrides {
                max_clauses,
                ..Default::default()
            });

            let clauses = DocumentScanner::new(&config)?.scan(&path)?;
            print!("{}", display::render_candidates(&clauses, 120));
            println!("{} candidate clauses", clauses.len());
        }

        Commands::List { output_dir, config } => {
            init_tracing(false);

            let config = AppConfig::load(config.as_deref())?.with_overrides(Overrides {
                output_dir,
                ..Default::default()
            });

            let saved = list_saved(&config.output_dir)?;
            if saved.is_empty() {
                println!("No saved analyses in {}", config.output_dir.display());
            } else {
                print!("{}", display::render_saved(&saved));
            }
        }

        Commands::Show {
            path,
            risk,
            width,
            export,
        } => {
            init_tracing(false);

            let table = read_table(&path)?;
            println!("{}", display::render_summary(&RiskSummary::from_table(&table)));
            println!();

            let rows = risk.apply(&table);
            if rows.is_empty() {
                println!("No clauses with {} risk", risk);
            } else {
                print!("{}", display::render_rows(&rows, width));
            }

            if let Some(target) = export {
                let exported = export_rows(&rows, &target)
                    .with_context(|| format!("Failed to export to {}", target.display()))?;
                println!("Exported {} rows to {}", rows.len(), exported.display());
            }
        }
    }

    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("clausewise=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("clausewise=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
