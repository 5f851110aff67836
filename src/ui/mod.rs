use crate::config::{OverlayConfig, ViewerConfig};

/// Control panel state. Source of truth for the paint colors and the rotate
/// toggle; values flow one way from here into the bound materials.
pub struct UiState {
    body_color: [u8; 3],
    highlight_color: [u8; 3],
    rotate: bool,
    overlay: OverlayConfig,
}

impl UiState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            body_color: config.body_color,
            highlight_color: config.highlight_color,
            rotate: config.rotate,
            overlay: config.overlay.clone(),
        }
    }

    pub fn body_color(&self) -> [u8; 3] {
        self.body_color
    }

    pub fn highlight_color(&self) -> [u8; 3] {
        self.highlight_color
    }

    pub fn rotate(&self) -> bool {
        self.rotate
    }

    /// Build the whole overlay for one frame. While `loading` the scene is not
    /// ready and only the fallback indicator is shown; it stays up
    /// indefinitely if the assets never arrive.
    pub fn draw(&mut self, ctx: &egui::Context, loading: bool) {
        if loading {
            self.draw_loading(ctx);
            return;
        }
        self.draw_controls(ctx);
        self.draw_info(ctx);
    }

    fn draw_controls(&mut self, ctx: &egui::Context) {
        egui::Window::new("Controls")
            .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-12.0, 12.0))
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label("body");
                    color_channels(ui, &mut self.body_color);
                });
                ui.horizontal(|ui| {
                    ui.label("highlight");
                    color_channels(ui, &mut self.highlight_color);
                });
                ui.checkbox(&mut self.rotate, "rotate");
            });
    }

    fn draw_info(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("info_overlay"))
            .anchor(egui::Align2::LEFT_BOTTOM, egui::vec2(16.0, -16.0))
            .show(ctx, |ui| {
                ui.heading(egui::RichText::new(&self.overlay.title).strong());
                ui.label(&self.overlay.byline);
                ui.horizontal(|ui| {
                    for link in &self.overlay.links {
                        ui.hyperlink_to(&link.label, &link.url);
                    }
                });
            });
    }

    fn draw_loading(&self, ctx: &egui::Context) {
        egui::Area::new(egui::Id::new("loading_overlay"))
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.add(egui::Spinner::new());
                    ui.heading("loading...");
                });
            });
    }
}

/// Numeric 0-255 channels plus a combined swatch.
fn color_channels(ui: &mut egui::Ui, rgb: &mut [u8; 3]) {
    for channel in rgb.iter_mut() {
        ui.add(egui::DragValue::new(channel).speed(1.0));
    }
    ui.color_edit_button_srgb(rgb);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ViewerConfig;

    #[test]
    fn state_starts_from_config_defaults() {
        let config = ViewerConfig::default();
        let ui = UiState::new(&config);
        assert_eq!(ui.body_color(), [10, 8, 13]);
        assert_eq!(ui.highlight_color(), [29, 255, 77]);
        assert!(ui.rotate());
    }
}
