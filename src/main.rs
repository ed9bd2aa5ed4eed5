use clap::Parser;
use order_history::app::commands;
use order_history::utils::error::{ErrorSeverity, OrderError};
use order_history::utils::{logger, validation::Validate};
use order_history::{CliConfig, Command, Result, TomlConfig};
use std::path::Path;

fn main() {
    let cli = CliConfig::parse();

    // 先載入設定，日誌格式由設定決定
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    if config.json_logging() {
        logger::init_json_logger(cli.verbose, config.logging.level.as_str());
    } else {
        logger::init_cli_logger(cli.verbose, config.logging.level.as_str());
    }

    tracing::info!("Starting order-history CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli, &config) {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(exit_code(&e));
    }
}

fn load_config(cli: &CliConfig) -> Result<TomlConfig> {
    cli.validate()?;
    let config = match &cli.config {
        Some(path) => TomlConfig::from_file(path)?,
        None => TomlConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn run(cli: &CliConfig, config: &TomlConfig) -> Result<()> {
    match &cli.command {
        Command::Reconcile {
            order,
            lines,
            dry_run,
        } => {
            let outcome =
                commands::reconcile_order_file(config, Path::new(order), Path::new(lines), *dry_run)?;
            println!("{}", commands::format_reconcile(&outcome));
        }
        Command::Rank {
            orders,
            today,
            lookback_days,
            json,
        } => {
            let loaded = commands::load_orders(Path::new(orders))?;
            let today = today.unwrap_or_else(|| chrono::Local::now().date_naive());
            let ranked = commands::rank_orders(config, &loaded, today, *lookback_days);
            println!("{}", commands::format_ranking(&ranked, *json)?);
        }
        Command::Report { customer } => {
            let customer = commands::load_customer(Path::new(customer))?;
            let report = commands::customer_report(&customer);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}

fn exit_code(error: &OrderError) -> i32 {
    match error.severity() {
        ErrorSeverity::Medium => 2,  // 可重跑
        ErrorSeverity::High => 1,    // 輸入錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    }
}
