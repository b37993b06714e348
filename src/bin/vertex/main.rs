// =============================================================================
// VERTEX - draws a colored triangle from a vertex buffer
// =============================================================================
//
// FRAME FLOW:
// 1. Wait for the frame slot's fence
// 2. Acquire a swapchain image
// 3. Record the command buffer for this slot
// 4. Submit, then present
//
// =============================================================================

mod app;
mod config;
mod logging;

use anyhow::Result;
use app::App;
use config::Config;
use logging::LogSink;
use winit::event_loop::EventLoop;

fn main() -> Result<()> {
    // Logger first so config warnings are not lost
    let sink = LogSink::default();
    logging::init(&sink);

    let config = Config::load();
    if config.debug.log_to_file {
        if let Err(e) = sink.attach_file(&config.debug.log_file) {
            log::warn!("{:#}. Logging to stderr only.", e);
        }
    }
    if sink.has_file() {
        log::info!("Copying log output to {}", config.debug.log_file);
    }

    log::info!("Starting vertex sample");
    log::info!(
        "Window: {}x{}, present mode: {}",
        config.window.width,
        config.window.height,
        config.graphics.present_mode
    );

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    Ok(())
}
