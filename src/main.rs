use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

use r4r::core::config::{CliOverrides, R4rConfig, load_config, resolve};

#[derive(Parser)]
#[command(name = "r4r", about = "Terminal client for the r4r project assistant")]
struct Args {
    /// Backend base URL (overrides config file and R4R_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Typewriter delay per chunk, in milliseconds
    #[arg(long = "delay")]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to r4r.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();

    if let Ok(log_file) = File::create("r4r.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring config file: {}", e);
        R4rConfig::default()
    });
    let config = resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            type_delay_ms: args.delay_ms,
        },
    );

    log::info!("r4r starting up with {:?}", config);

    r4r::tui::run(config)
}
