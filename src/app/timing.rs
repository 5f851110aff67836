use std::time::Instant;
use winit::window::Window;

/// Frame cadence bookkeeping with an fps readout in the window title.
pub struct FrameTiming {
    last_fps_time: Instant,
    frame_count: u32,
    base_title: String,
}

impl FrameTiming {
    pub fn new(base_title: String) -> Self {
        Self {
            last_fps_time: Instant::now(),
            frame_count: 0,
            base_title,
        }
    }

    pub fn update(&mut self, window: Option<&Window>, now: Instant) {
        self.frame_count = self.frame_count.saturating_add(1);
        let elapsed = now.saturating_duration_since(self.last_fps_time);
        if elapsed.as_secs_f32() >= 0.5 {
            let fps = self.frame_count as f32 / elapsed.as_secs_f32();
            if let Some(window) = window {
                window.set_title(&format!("{} - {:.1} fps", self.base_title, fps));
            }
            self.frame_count = 0;
            self.last_fps_time = now;
        }
    }
}
