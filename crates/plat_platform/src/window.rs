use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Pink Runner".to_string(),
            width: 800,
            height: 600,
            resizable: false,
        }
    }
}

/// Open the game window. The inner size is logical pixels; the renderer
/// scales the fixed-size frame to whatever physical size the surface gets.
pub fn create_window(
    event_loop: &ActiveEventLoop,
    config: &PlatformConfig,
) -> Result<Arc<Window>, String> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(config.resizable)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .map_err(|e| format!("Failed to create window: {e}"))?;
    log::info!(
        "Window created: '{}' {}x{} (scale factor {:.2})",
        config.title,
        config.width,
        config.height,
        window.scale_factor()
    );
    Ok(Arc::new(window))
}
