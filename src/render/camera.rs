use glam::{Mat4, Vec3};

/// Auto-orbit increment, radians per rendered frame. Deliberately not scaled
/// by elapsed time: orbit speed tracks the display refresh rate.
pub const ORBIT_STEP: f32 = 0.001;

const FOV_Y_DEG: f32 = 15.0;
const NEAR_CLIP: f32 = 0.1;
const FAR_CLIP: f32 = 200.0;
const MIN_DISTANCE: f32 = 2.0;
const MIN_PITCH: f32 = -1.45;
const MAX_PITCH: f32 = 1.45;

/// Camera circling the showroom floor. Exclusively owned by the viewer and
/// mutated only on the render thread.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub position: Vec3,
    pub target: Vec3,
}

impl OrbitCamera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Per-frame auto-rotation; does nothing while the toggle is off.
    pub fn tick(&mut self, rotate: bool) {
        if rotate {
            self.spin(ORBIT_STEP);
        }
    }

    /// Rotate the position around the world Y axis:
    /// `x' = x cos θ − z sin θ`, `z' = z cos θ + x sin θ`.
    pub fn spin(&mut self, angle: f32) {
        let (sin, cos) = angle.sin_cos();
        let (x, z) = (self.position.x, self.position.z);
        self.position.x = x * cos - z * sin;
        self.position.z = z * cos + x * sin;
    }

    /// Drag-orbit around the target. Pitch is clamped short of the poles.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        let offset = self.position - self.target;
        let radius = offset.length().max(MIN_DISTANCE);
        let mut yaw = offset.z.atan2(offset.x);
        let mut pitch = (offset.y / radius).clamp(-1.0, 1.0).asin();

        yaw += yaw_delta;
        pitch = (pitch + pitch_delta).clamp(MIN_PITCH, MAX_PITCH);

        let cos_pitch = pitch.cos();
        self.position = self.target
            + Vec3::new(
                radius * cos_pitch * yaw.cos(),
                radius * pitch.sin(),
                radius * cos_pitch * yaw.sin(),
            );
    }

    /// Move along the view ray; positive zooms in. Never crosses the target.
    pub fn zoom(&mut self, amount: f32) {
        let offset = self.position - self.target;
        let distance = offset.length();
        let new_distance = (distance - amount).max(MIN_DISTANCE);
        if distance > 1e-6 {
            self.position = self.target + offset * (new_distance / distance);
        }
    }

    pub fn view_proj(&self, aspect: f32) -> Mat4 {
        let proj = Mat4::perspective_rh(FOV_Y_DEG.to_radians(), aspect, NEAR_CLIP, FAR_CLIP);
        let view = Mat4::look_at_rh(self.position, self.target, Vec3::Y);
        proj * view
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn n_spins_match_closed_form_rotation() {
        let start = Vec3::new(-8.0, 2.0, 16.0);
        let mut camera = OrbitCamera::new(start, Vec3::new(0.0, 1.1, 0.0));
        let n = 500;
        for _ in 0..n {
            camera.spin(ORBIT_STEP);
        }

        // Iterated 2D rotation equals one rotation by n*step, up to fp drift.
        let theta = ORBIT_STEP * n as f32;
        let expected_x = start.x * theta.cos() - start.z * theta.sin();
        let expected_z = start.z * theta.cos() + start.x * theta.sin();
        assert!((camera.position.x - expected_x).abs() < 1e-3);
        assert!((camera.position.z - expected_z).abs() < 1e-3);
        assert_eq!(camera.position.y, start.y);
    }

    #[test]
    fn spin_preserves_distance_to_axis() {
        let mut camera = OrbitCamera::new(Vec3::new(34.0, 14.0, -38.0), Vec3::ZERO);
        let axis_distance =
            |p: Vec3| -> f32 { (p.x * p.x + p.z * p.z).sqrt() };
        let before = axis_distance(camera.position);
        for _ in 0..1000 {
            camera.spin(ORBIT_STEP);
        }
        assert!((axis_distance(camera.position) - before).abs() < 1e-2);
    }

    #[test]
    fn zero_spin_leaves_position_unchanged() {
        let start = Vec3::new(-8.0, 2.0, 16.0);
        let mut camera = OrbitCamera::new(start, Vec3::ZERO);
        camera.spin(0.0);
        assert_eq!(camera.position, start);
    }

    #[test]
    fn rotation_off_keeps_position_bit_stable() {
        let start = Vec3::new(34.0, 14.0, -38.0);
        let mut camera = OrbitCamera::new(start, Vec3::new(0.0, 1.1, 0.0));
        for _ in 0..10_000 {
            camera.tick(false);
        }
        // Bit-identical, not merely close.
        assert_eq!(camera.position.to_array(), start.to_array());

        camera.tick(true);
        assert_ne!(camera.position.to_array(), start.to_array());
    }

    #[test]
    fn orbit_keeps_radius_and_clamps_pitch() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 2.0, 10.0), Vec3::new(0.0, 1.1, 0.0));
        let radius = (camera.position - camera.target).length();

        camera.orbit(0.4, 10.0); // absurd pitch input
        let offset = camera.position - camera.target;
        assert!((offset.length() - radius).abs() < 1e-4);
        let pitch = (offset.y / offset.length()).asin();
        assert!(pitch <= MAX_PITCH + 1e-4);
    }

    #[test]
    fn zoom_never_crosses_the_target() {
        let mut camera = OrbitCamera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        camera.zoom(100.0);
        let distance = (camera.position - camera.target).length();
        assert!((distance - MIN_DISTANCE).abs() < 1e-4);
    }

    #[test]
    fn view_proj_is_finite() {
        let camera = OrbitCamera::new(Vec3::new(34.0, 14.0, -38.0), Vec3::new(0.0, 1.1, 0.0));
        let matrix = camera.view_proj(16.0 / 9.0);
        assert!(matrix.to_cols_array().iter().all(|v| v.is_finite()));
    }
}
