use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "order-history")]
#[command(about = "Reconcile edited order lines and rank products by recent purchases")]
pub struct CliConfig {
    /// Path to TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Apply an imported set of lines to a stored order
    Reconcile {
        /// JSON file holding the stored order
        #[arg(long)]
        order: String,

        /// Delimited file with LINE;<product>;<count> rows
        #[arg(long)]
        lines: String,

        /// Print the operations without saving
        #[arg(long)]
        dry_run: bool,
    },

    /// Rank products by quantity bought in relevant orders
    Rank {
        /// JSON file holding an array of orders
        #[arg(long)]
        orders: String,

        /// Evaluation day, defaults to today
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Override ranking.lookback_days from config
        #[arg(long)]
        lookback_days: Option<u32>,

        /// Print totals as JSON
        #[arg(long)]
        json: bool,
    },

    /// Summarize a customer's order history
    Report {
        /// JSON file holding a customer with its orders
        #[arg(long)]
        customer: String,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        match &self.command {
            Command::Reconcile { order, lines, .. } => {
                validate_path("order", order)?;
                validate_path("lines", lines)
            }
            Command::Rank { orders, .. } => validate_path("orders", orders),
            Command::Report { customer } => validate_path("customer", customer),
        }
    }
}
