use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over both; `-v` wins over the configured level.
fn filter_directive(verbose: bool, level: &str) -> String {
    if verbose {
        "order_history=debug,info".to_string()
    } else {
        format!("order_history={}", level)
    }
}

fn env_filter(verbose: bool, level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(verbose, level)))
}

pub fn init_cli_logger(verbose: bool, level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

pub fn init_json_logger(verbose: bool, level: &str) {
    tracing_subscriber::registry()
        .with(env_filter(verbose, level))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .json(), // 給日誌收集器用的 JSON 格式
        )
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive_uses_configured_level() {
        assert_eq!(filter_directive(false, "warn"), "order_history=warn");
        assert_eq!(filter_directive(false, "info"), "order_history=info");
        assert_eq!(filter_directive(true, "warn"), "order_history=debug,info");
    }
}
