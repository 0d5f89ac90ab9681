use banvic_analytics::{load_config, run, AppConfig, SidraFetcher};
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Set panic hook to log details about any panic
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config_path = std::env::args().nth(1).unwrap_or_else(|| "config.json".to_string());
    let config = if Path::new(&config_path).exists() {
        match load_config(&config_path) {
            Ok(cfg) => cfg,
            Err(e) => {
                error!("Config load error ({}): {}", config_path, e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        warn!("{} not found, using default configuration", config_path);
        AppConfig::default()
    };

    let fetcher = match SidraFetcher::new(&config.index) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create HTTP client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("Price index source: {}", fetcher.url());

    match run(&config, &fetcher) {
        Ok(output) => {
            if let Some(path) = &output.exported {
                info!("Integrated table saved to {}", path.display());
            }
            for chart in &output.charts {
                info!("Chart: {}", chart.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
