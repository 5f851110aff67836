use crate::render::OverlayFrame;
use winit::event::WindowEvent;
use winit::window::Window;

/// Bridge between winit events and the egui context. Produces tessellated
/// primitives once per frame for the renderer's overlay pass.
pub struct EguiHost {
    context: egui::Context,
    winit_state: egui_winit::State,
}

impl EguiHost {
    pub fn new(window: &Window) -> Self {
        let context = egui::Context::default();
        let winit_state = egui_winit::State::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            None,
            None,
            None,
        );
        Self {
            context,
            winit_state,
        }
    }

    /// Returns true when egui consumed the event (pointer over a panel, text
    /// focus, ...) and the camera should not see it.
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.winit_state.on_window_event(window, event).consumed
    }

    pub fn wants_pointer(&self) -> bool {
        self.context.wants_pointer_input()
    }

    pub fn run<F>(&mut self, window: &Window, build_ui: F) -> OverlayFrame
    where
        F: FnMut(&egui::Context),
    {
        let raw_input = self.winit_state.take_egui_input(window);
        let output = self.context.run(raw_input, build_ui);
        self.winit_state
            .handle_platform_output(window, output.platform_output);

        let pixels_per_point = self.context.pixels_per_point();
        let primitives = self.context.tessellate(output.shapes, pixels_per_point);
        OverlayFrame {
            primitives,
            textures_delta: output.textures_delta,
            pixels_per_point,
        }
    }
}
