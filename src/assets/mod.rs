use std::path::{Path, PathBuf};

/// Cube-map face file names, in the layer order the GPU expects
/// (+X, -X, +Y, -Y, +Z, -Z).
pub const CUBE_FACES: [&str; 6] = [
    "front.jpg",
    "back.jpg",
    "up.jpg",
    "down.jpg",
    "left.jpg",
    "right.jpg",
];

/// Surface appearance of one named material slot. Parsed once from the model
/// file; the viewer mutates color/opacity and the reflection knobs afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleMaterial {
    pub name: String,
    pub color: [f32; 3],
    pub opacity: f32,
    pub reflectivity: f32,
    pub shininess: f32,
    pub dithering: bool,
    pub use_env_map: bool,
}

/// One drawable chunk of the mesh hierarchy, with vertices baked into the
/// model's own space and an index into the material table.
#[derive(Debug, Clone)]
pub struct VehiclePrimitive {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct VehicleModel {
    pub primitives: Vec<VehiclePrimitive>,
    pub materials: Vec<VehicleMaterial>,
}

/// Six decoded RGBA faces of uniform square size.
#[derive(Debug)]
pub struct CubeMap {
    pub size: u32,
    pub faces: [Vec<u8>; 6],
}

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read model at {path}: {source}")]
    ModelRead {
        path: String,
        #[source]
        source: gltf::Error,
    },
    #[error("model at {path} has no renderable geometry")]
    EmptyModel { path: String },
    #[error("failed to decode cube-map face {path}: {source}")]
    FaceDecode {
        path: String,
        #[source]
        source: image::ImageError,
    },
    #[error("cube-map face {path} is {width}x{height}, expected {expected}x{expected}")]
    FaceDimensions {
        path: String,
        width: u32,
        height: u32,
        expected: u32,
    },
}

/// Parse a glTF/GLB file into CPU-side meshes plus a material table.
///
/// Node transforms are baked into vertex data so every primitive lives in the
/// model's root space; the scene-level vehicle transform is applied per frame
/// by the renderer.
pub fn load_vehicle(path: &Path) -> Result<VehicleModel, AssetError> {
    let (document, buffers, _images) =
        gltf::import(path).map_err(|source| AssetError::ModelRead {
            path: path.display().to_string(),
            source,
        })?;

    let materials: Vec<VehicleMaterial> = document
        .materials()
        .map(|material| {
            let base = material.pbr_metallic_roughness().base_color_factor();
            VehicleMaterial {
                name: material.name().unwrap_or("").to_string(),
                color: [base[0], base[1], base[2]],
                opacity: base[3],
                reflectivity: 0.0,
                shininess: 30.0,
                dithering: false,
                use_env_map: false,
            }
        })
        .collect();

    let mut primitives = Vec::new();
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            collect_node(&node, glam::Mat4::IDENTITY, &buffers, &mut primitives);
        }
    }

    if primitives.is_empty() {
        return Err(AssetError::EmptyModel {
            path: path.display().to_string(),
        });
    }

    log::info!(
        "Loaded model '{}': {} primitives, {} materials",
        path.display(),
        primitives.len(),
        materials.len()
    );
    Ok(VehicleModel {
        primitives,
        materials,
    })
}

fn collect_node(
    node: &gltf::Node,
    parent: glam::Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<VehiclePrimitive>,
) {
    let transform = parent * glam::Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| &d.0[..]));
            let Some(position_iter) = reader.read_positions() else {
                continue;
            };
            let normal_matrix = glam::Mat3::from_mat4(transform).inverse().transpose();
            let positions: Vec<[f32; 3]> = position_iter
                .map(|p| transform.transform_point3(glam::Vec3::from(p)).to_array())
                .collect();
            let indices: Vec<u32> = match reader.read_indices() {
                Some(indices) => indices.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };
            let normals: Vec<[f32; 3]> = match reader.read_normals() {
                Some(normal_iter) => normal_iter
                    .map(|n| {
                        (normal_matrix * glam::Vec3::from(n))
                            .normalize_or_zero()
                            .to_array()
                    })
                    .collect(),
                None => compute_smooth_normals(&positions, &indices),
            };
            out.push(VehiclePrimitive {
                positions,
                normals,
                indices,
                material: primitive.material().index(),
            });
        }
    }
    for child in node.children() {
        collect_node(&child, transform, buffers, out);
    }
}

/// Area-weighted vertex normals for primitives shipped without them.
fn compute_smooth_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![glam::Vec3::ZERO; positions.len()];
    for triangle in indices.chunks_exact(3) {
        let [i0, i1, i2] = [triangle[0] as usize, triangle[1] as usize, triangle[2] as usize];
        let p0 = glam::Vec3::from(positions[i0]);
        let p1 = glam::Vec3::from(positions[i1]);
        let p2 = glam::Vec3::from(positions[i2]);
        let face = (p1 - p0).cross(p2 - p0);
        accum[i0] += face;
        accum[i1] += face;
        accum[i2] += face;
    }
    accum
        .into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

/// Decode the six fixed-name face images under `dir`.
pub fn load_environment(dir: &Path) -> Result<CubeMap, AssetError> {
    let mut faces: [Vec<u8>; 6] = Default::default();
    let mut size = 0u32;
    for (slot, face) in CUBE_FACES.iter().enumerate() {
        let face_path: PathBuf = dir.join(face);
        let decoded = image::open(&face_path)
            .map_err(|source| AssetError::FaceDecode {
                path: face_path.display().to_string(),
                source,
            })?
            .to_rgba8();
        let (width, height) = decoded.dimensions();
        if slot == 0 {
            size = width;
        }
        if width != size || height != size {
            return Err(AssetError::FaceDimensions {
                path: face_path.display().to_string(),
                width,
                height,
                expected: size,
            });
        }
        faces[slot] = decoded.into_raw();
    }
    log::info!("Loaded environment '{}' ({}px faces)", dir.display(), size);
    Ok(CubeMap { size, faces })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_face_order_matches_gpu_layers() {
        // +X, -X, +Y, -Y, +Z, -Z
        assert_eq!(
            CUBE_FACES,
            ["front.jpg", "back.jpg", "up.jpg", "down.jpg", "left.jpg", "right.jpg"]
        );
    }

    #[test]
    fn missing_model_is_a_read_error() {
        let err = load_vehicle(Path::new("no/such/model.glb")).unwrap_err();
        assert!(matches!(err, AssetError::ModelRead { .. }));
    }

    #[test]
    fn missing_environment_is_a_decode_error() {
        let err = load_environment(Path::new("no/such/dir")).unwrap_err();
        assert!(matches!(err, AssetError::FaceDecode { .. }));
    }

    #[test]
    fn smooth_normals_point_away_from_winding() {
        // One CCW triangle in the XY plane faces +Z.
        let positions = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let indices = vec![0, 1, 2];
        let normals = compute_smooth_normals(&positions, &indices);
        for n in normals {
            assert!((n[2] - 1.0).abs() < 1e-6, "normal {:?} should be +Z", n);
        }
    }

    #[test]
    fn mismatched_face_dimensions_are_rejected() {
        let dir = std::env::temp_dir().join(format!("showroom_env_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        for (i, face) in CUBE_FACES.iter().enumerate() {
            let side = if i == 3 { 2 } else { 4 };
            let img = image::RgbImage::new(side, side);
            img.save(dir.join(face)).unwrap();
        }

        let err = load_environment(&dir).unwrap_err();
        assert!(matches!(err, AssetError::FaceDimensions { .. }));

        let _ = std::fs::remove_dir_all(dir);
    }
}
