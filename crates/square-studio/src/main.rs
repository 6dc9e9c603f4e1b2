mod app;

use anyhow::Result;
use square_engine::device::GpuInit;
use square_engine::logging::{init_logging, LoggingConfig};
use square_engine::window::{Runtime, RuntimeConfig};

use crate::app::SquareApp;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "Hello square".to_string(),
        ..RuntimeConfig::default()
    };

    Runtime::run(config, GpuInit::default(), SquareApp::default())
}
