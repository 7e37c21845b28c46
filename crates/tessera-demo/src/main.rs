mod app;
mod config;

use anyhow::Result;
use winit::dpi::LogicalSize;

use tessera_engine::device::GpuInit;
use tessera_engine::logging::{init_logging, LoggingConfig};
use tessera_engine::window::{Runtime, RuntimeConfig};

use crate::app::SpinDemo;
use crate::config::DemoConfig;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = DemoConfig::from_env();
    log::info!(
        "starting: speed {}, atlas {}x{}",
        config.rotation_speed,
        config.atlas_size,
        config.atlas_size
    );

    let runtime = RuntimeConfig {
        title: config.title.clone(),
        initial_size: LogicalSize::new(config.width, config.height),
    };

    Runtime::run(runtime, GpuInit::default(), SpinDemo::new(config))
}
