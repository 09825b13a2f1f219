use clap::{Parser, Subcommand};
use clausewise_report::RiskFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clausewise")]
#[command(author, version, about = "Contract clause detection and risk analysis")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze a PDF or DOCX contract and save the results as CSV
    Analyze {
        /// Contract file
        path: PathBuf,

        /// Directory for saved analyses
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Analyze at most this many clauses (0 for no limit)
        #[arg(long)]
        max_clauses: Option<usize>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Gemini API key
        #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        /// Gemini model name
        #[arg(long)]
        model: Option<String>,

        /// Print model call and clause counters after the run
        #[arg(long)]
        metrics: bool,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Show detected clauses without calling the model
    Detect {
        /// Contract file
        path: PathBuf,

        /// Show at most this many clauses (0 for no limit)
        #[arg(long)]
        max_clauses: Option<usize>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// List saved analyses, newest first
    List {
        /// Directory for saved analyses
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print a saved analysis
    Show {
        /// Saved CSV file
        path: PathBuf,

        /// Only rows at this risk level: all, high, medium, low, none
        #[arg(short, long, default_value = "all", value_parser = parse_risk_filter)]
        risk: RiskFilter,

        /// Truncate original text to this many characters
        #[arg(short, long, default_value = "500")]
        width: usize,

        /// Also write the shown rows as CSV to this file, or into this
        /// directory as clause_analysis_<YYYYmmdd>.csv
        #[arg(short, long)]
        export: Option<PathBuf>,
    },
}

fn parse_risk_filter(s: &str) -> Result<RiskFilter, String> {
    s.parse()
}
