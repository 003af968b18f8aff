use std::path::PathBuf;

use anyhow::{Context, Result};

use gefe_engine::core::{EngineConfig, FrameDriver};
use gefe_engine::logging::{init_logging, LoggingConfig};
use gefe_engine::window::WinitPlatform;

/// Overrides the shader used by the built-in scenes.
const SHADER_ENV: &str = "GEFE_SHADER";

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = EngineConfig::default();
    if let Some(path) = std::env::var_os(SHADER_ENV) {
        config.scenes.shader_path = PathBuf::from(path);
    }
    log::info!("shader: {}", config.scenes.shader_path.display());

    let mut driver = FrameDriver::new(WinitPlatform::new(), config);
    driver.run().context("gefe terminated with an error")?;

    Ok(())
}
