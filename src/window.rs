use crate::config::WindowConfig;

/// Runtime window control shared with behaviour units and scripts.
///
/// The host owns the actual window; close requests and frame-rate changes
/// made here are picked up by the main loop at the end of the frame.
pub struct WindowCtl {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub should_close: bool,
    pub target_fps: u32,
}

impl WindowCtl {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
            should_close: false,
            target_fps: if config.vsync { 0 } else { config.target_fps },
        }
    }

    pub fn request_close(&mut self) {
        self.should_close = true;
    }

    pub fn set_target_fps(&mut self, fps: u32) {
        self.target_fps = fps;
    }
}
