#[cfg(feature = "gui")]
pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod render;
pub mod storage;
pub use error::{AppError, AppResult};

/// Entrypoint used by the desktop binary.
#[cfg(feature = "gui")]
pub fn run() -> AppResult<()> {
    logging::init();
    tracing::info!("starting yeti-goggles");

    let config = config::load_app_config();
    app::App::new(config).start()?;

    tracing::info!("shutdown complete");
    Ok(())
}
