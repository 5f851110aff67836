pub mod materials;

use glam::{Mat4, Vec3};

/// Viewport width at which the wide camera framing kicks in.
pub const BREAKPOINT_WIDE_PX: u32 = 768;

/// Distance fog toward black.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FogSettings {
    pub near: f32,
    pub far: f32,
}

/// Camera start position and fog pair selected by viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    pub camera_position: Vec3,
    pub fog: FogSettings,
}

impl Framing {
    /// Pure width-bucket mapping. Evaluated once at mount; resizes within a
    /// session keep the framing chosen at startup.
    pub fn for_width(width_px: u32) -> Self {
        if width_px < BREAKPOINT_WIDE_PX {
            Self {
                camera_position: Vec3::new(34.0, 14.0, -38.0),
                fog: FogSettings {
                    near: 45.0,
                    far: 65.0,
                },
            }
        } else {
            Self {
                camera_position: Vec3::new(-8.0, 2.0, 16.0),
                fog: FogSettings {
                    near: 20.0,
                    far: 40.0,
                },
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SpotLight {
    pub position: Vec3,
    pub intensity: f32,
}

/// Scene composition: everything the renderer needs besides the model itself.
/// Built once when the viewer mounts, dropped at shutdown.
pub struct ViewerScene {
    pub framing: Framing,
    pub camera_target: Vec3,
    pub lights: [SpotLight; 4],
    pub light_color: [f32; 3],
    pub vehicle_transform: Mat4,
}

/// Ground grid: 60x60 cells, slightly above y=0 to sit under the car.
pub const GRID_EXTENT: f32 = 30.0;
pub const GRID_DIVISIONS: u32 = 60;
pub const GRID_HEIGHT: f32 = 0.1;

impl ViewerScene {
    pub fn new(viewport_width_px: u32) -> Self {
        let intensity = 0.3;
        Self {
            framing: Framing::for_width(viewport_width_px),
            camera_target: Vec3::new(0.0, 1.1, 0.0),
            lights: [
                SpotLight {
                    position: Vec3::new(0.0, 5.0, 5.0),
                    intensity,
                },
                SpotLight {
                    position: Vec3::new(0.0, 15.0, -5.0),
                    intensity,
                },
                SpotLight {
                    position: Vec3::new(-10.0, 10.0, 0.0),
                    intensity,
                },
                SpotLight {
                    position: Vec3::new(10.0, 10.0, 0.0),
                    intensity,
                },
            ],
            // #DCDFF0
            light_color: [0.863, 0.875, 0.941],
            vehicle_transform: Mat4::from_translation(Vec3::new(-1.0, 0.1, 2.5))
                * Mat4::from_rotation_x(-std::f32::consts::FRAC_PI_2)
                * Mat4::from_scale(Vec3::splat(0.02)),
        }
    }

    /// World-space line-list endpoints for the ground grid.
    pub fn grid_lines(&self) -> Vec<[f32; 3]> {
        let step = (GRID_EXTENT * 2.0) / GRID_DIVISIONS as f32;
        let mut lines = Vec::with_capacity(((GRID_DIVISIONS + 1) * 4) as usize);
        for i in 0..=GRID_DIVISIONS {
            let offset = -GRID_EXTENT + i as f32 * step;
            lines.push([offset, GRID_HEIGHT, -GRID_EXTENT]);
            lines.push([offset, GRID_HEIGHT, GRID_EXTENT]);
            lines.push([-GRID_EXTENT, GRID_HEIGHT, offset]);
            lines.push([GRID_EXTENT, GRID_HEIGHT, offset]);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn narrow_viewport_selects_base_framing() {
        let framing = Framing::for_width(BREAKPOINT_WIDE_PX - 1);
        assert_eq!(framing.camera_position, Vec3::new(34.0, 14.0, -38.0));
        assert_eq!(
            framing.fog,
            FogSettings {
                near: 45.0,
                far: 65.0
            }
        );
    }

    #[test]
    fn wide_viewport_selects_alternate_framing_at_boundary() {
        let framing = Framing::for_width(BREAKPOINT_WIDE_PX);
        assert_eq!(framing.camera_position, Vec3::new(-8.0, 2.0, 16.0));
        assert_eq!(
            framing.fog,
            FogSettings {
                near: 20.0,
                far: 40.0
            }
        );
    }

    #[test]
    fn grid_covers_both_axes() {
        let scene = ViewerScene::new(1280);
        let lines = scene.grid_lines();
        assert_eq!(lines.len(), ((GRID_DIVISIONS + 1) * 4) as usize);
        assert!(lines.iter().all(|p| p[1] == GRID_HEIGHT));
    }
}
