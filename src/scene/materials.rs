//! One-shot lookup of the three well-known material slots on the vehicle,
//! plus the color pushes that react to the control panel.

use crate::assets::{VehicleMaterial, VehicleModel};

pub const BODY_MATERIAL: &str = "Polar_White";
pub const WINDOW_MATERIAL: &str = "WindowsTint";
pub const TRIM_MATERIAL: &str = "Color_M02";

/// Indices into the model's material table, resolved once after load.
/// A model missing one of the names just leaves that slot `None`; every
/// later update against it is a no-op.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialBindings {
    body: Option<usize>,
    window_tint: Option<usize>,
    rim: Option<usize>,
}

impl MaterialBindings {
    /// Walk the mesh hierarchy once, scanning each primitive's material slot
    /// for the three well-known names. First match per name wins, and the
    /// initial appearance setup runs exactly once per slot:
    /// the body gets the environment map, reflectivity 0.4, shininess 5 and
    /// dithering; the window tint is forced fully opaque.
    pub fn bind(model: &mut VehicleModel) -> Self {
        let mut bindings = Self::default();
        for primitive in &model.primitives {
            let Some(index) = primitive.material else {
                continue;
            };
            let Some(material) = model.materials.get_mut(index) else {
                continue;
            };
            match material.name.as_str() {
                BODY_MATERIAL if bindings.body.is_none() => {
                    material.use_env_map = true;
                    material.reflectivity = 0.4;
                    material.shininess = 5.0;
                    material.dithering = true;
                    bindings.body = Some(index);
                }
                WINDOW_MATERIAL if bindings.window_tint.is_none() => {
                    material.opacity = 1.0;
                    bindings.window_tint = Some(index);
                }
                TRIM_MATERIAL if bindings.rim.is_none() => {
                    bindings.rim = Some(index);
                }
                _ => {}
            }
        }
        for (name, slot) in [
            (BODY_MATERIAL, bindings.body),
            (WINDOW_MATERIAL, bindings.window_tint),
            (TRIM_MATERIAL, bindings.rim),
        ] {
            if slot.is_none() {
                log::warn!("Model has no material named '{}', skipping", name);
            }
        }
        bindings
    }

    pub fn apply_body_color(&self, materials: &mut [VehicleMaterial], rgb: [u8; 3]) {
        if let Some(material) = self.body.and_then(|i| materials.get_mut(i)) {
            material.color = channels_to_unit(rgb);
        }
    }

    pub fn apply_rim_color(&self, materials: &mut [VehicleMaterial], rgb: [u8; 3]) {
        if let Some(material) = self.rim.and_then(|i| materials.get_mut(i)) {
            material.color = channels_to_unit(rgb);
        }
    }
}

/// 0-255 control channels to the renderer's 0-1 range.
fn channels_to_unit(rgb: [u8; 3]) -> [f32; 3] {
    [
        rgb[0] as f32 / 255.0,
        rgb[1] as f32 / 255.0,
        rgb[2] as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{VehiclePrimitive, VehicleModel};

    fn material(name: &str) -> VehicleMaterial {
        VehicleMaterial {
            name: name.to_string(),
            color: [1.0, 1.0, 1.0],
            opacity: 0.5,
            reflectivity: 0.0,
            shininess: 30.0,
            dithering: false,
            use_env_map: false,
        }
    }

    fn primitive(material: usize) -> VehiclePrimitive {
        VehiclePrimitive {
            positions: vec![[0.0; 3]; 3],
            normals: vec![[0.0, 1.0, 0.0]; 3],
            indices: vec![0, 1, 2],
            material: Some(material),
        }
    }

    fn full_model() -> VehicleModel {
        VehicleModel {
            materials: vec![
                material(BODY_MATERIAL),
                material(WINDOW_MATERIAL),
                material(TRIM_MATERIAL),
            ],
            primitives: vec![primitive(0), primitive(1), primitive(2)],
        }
    }

    #[test]
    fn bind_resolves_all_three_slots_and_sets_body_appearance() {
        let mut model = full_model();
        let bindings = MaterialBindings::bind(&mut model);

        assert_eq!(bindings.body, Some(0));
        assert_eq!(bindings.window_tint, Some(1));
        assert_eq!(bindings.rim, Some(2));

        let body = &model.materials[0];
        assert!(body.use_env_map);
        assert!(body.dithering);
        assert_eq!(body.reflectivity, 0.4);
        assert_eq!(body.shininess, 5.0);

        assert_eq!(model.materials[1].opacity, 1.0);
    }

    #[test]
    fn repeated_slots_bind_only_once() {
        let mut model = full_model();
        // Body paint referenced by two meshes.
        model.primitives.push(primitive(0));
        model.materials[0].reflectivity = 0.9;

        let bindings = MaterialBindings::bind(&mut model);
        assert_eq!(bindings.body, Some(0));
        // Second visit must not re-run the setup pass.
        assert_eq!(model.materials[0].reflectivity, 0.4);
    }

    #[test]
    fn missing_trim_is_silently_skipped() {
        let mut model = VehicleModel {
            materials: vec![material(BODY_MATERIAL), material(WINDOW_MATERIAL)],
            primitives: vec![primitive(0), primitive(1)],
        };
        let bindings = MaterialBindings::bind(&mut model);
        assert!(bindings.rim.is_none());

        // Updates against the absent slot are no-ops.
        let before = model.materials.clone();
        bindings.apply_rim_color(&mut model.materials, [200, 100, 50]);
        assert_eq!(model.materials, before);
    }

    #[test]
    fn color_channels_normalize_componentwise() {
        let mut model = full_model();
        let bindings = MaterialBindings::bind(&mut model);

        for rgb in [[0u8, 0, 0], [255, 255, 255], [10, 8, 13], [29, 255, 77]] {
            bindings.apply_body_color(&mut model.materials, rgb);
            bindings.apply_rim_color(&mut model.materials, rgb);
            let expected = [
                rgb[0] as f32 / 255.0,
                rgb[1] as f32 / 255.0,
                rgb[2] as f32 / 255.0,
            ];
            let body = model.materials[bindings.body.unwrap()].color;
            let rim = model.materials[bindings.rim.unwrap()].color;
            for i in 0..3 {
                assert!((body[i] - expected[i]).abs() < 1e-6);
                assert!((rim[i] - expected[i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn unreferenced_materials_never_bind() {
        // Trim exists in the table but no mesh uses it.
        let mut model = VehicleModel {
            materials: vec![
                material(BODY_MATERIAL),
                material(WINDOW_MATERIAL),
                material(TRIM_MATERIAL),
            ],
            primitives: vec![primitive(0), primitive(1)],
        };
        let bindings = MaterialBindings::bind(&mut model);
        assert!(bindings.rim.is_none());
    }
}
