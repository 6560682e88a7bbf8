//! OBJ geometry parsing
//!
//! Parses the face-indexed OBJ subset (`v`, `vt`, `vn`, `usemtl`, `f`) into a
//! deduplicated interleaved vertex buffer plus a 32-bit index buffer. Faces
//! with more than three vertices are fan-triangulated around the first vertex;
//! this assumes convex planar polygons.

use std::collections::HashMap;
use std::path::Path;

use log::debug;

use crate::gfx::scene::vertex::Vertex;

use super::error::AssetError;
use super::mtl::{self, parse_f32, Material};

/// CPU-side mesh produced by the parser.
///
/// Built once per geometry file, consumed to create GPU buffers, and
/// immutable thereafter.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub has_texcoords: bool,
    /// The material in effect when parsing finished, if any.
    pub material: Option<Material>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Index triple identifying a unique output vertex.
///
/// Texcoord and normal slots are `None` when the face reference omitted them.
/// Dedup is exact-key: identical triples reuse the same output index, with no
/// geometric tolerance involved.
type VertexKey = (usize, Option<usize>, Option<usize>);

/// Loads an OBJ file, parsing a same-stem `.mtl` companion first if present.
///
/// A missing MTL file silently yields an empty material set; a missing OBJ
/// file is [`AssetError::FileNotFound`].
pub fn load_obj(path: impl AsRef<Path>) -> Result<MeshData, AssetError> {
    let path = path.as_ref();
    let source =
        std::fs::read_to_string(path).map_err(|source| AssetError::from_io(path, source))?;

    let mtl_path = path.with_extension("mtl");
    let materials = if mtl_path.exists() {
        mtl::load_mtl(&mtl_path)?
    } else {
        HashMap::new()
    };

    let mut positions: Vec<[f32; 3]> = Vec::new();
    let mut texcoords: Vec<[f32; 2]> = Vec::new();
    let mut normals: Vec<[f32; 3]> = Vec::new();

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut vertex_cache: HashMap<VertexKey, u32> = HashMap::new();

    let mut current_material: Option<Material> = None;
    let mut has_texcoords = false;

    for (line_no, raw) in source.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut tokens = line.split_whitespace();
        let Some(directive) = tokens.next() else {
            continue;
        };
        let rest: Vec<&str> = tokens.collect();

        match directive {
            "v" => positions.push(parse_vec3(path, line_no, &rest)?),
            "vt" => {
                has_texcoords = true;
                if rest.len() >= 2 {
                    texcoords.push([
                        parse_f32(path, line_no, rest[0])?,
                        parse_f32(path, line_no, rest[1])?,
                    ]);
                }
            }
            "vn" => normals.push(parse_vec3(path, line_no, &rest)?),
            "usemtl" => {
                let name = rest
                    .first()
                    .ok_or_else(|| AssetError::parse(path, line_no, "usemtl without a name"))?;
                current_material = materials.get(*name).cloned();
                if current_material.is_none() {
                    debug!("usemtl '{}' does not match any parsed material", name);
                }
            }
            "f" => {
                let mut face: Vec<u32> = Vec::with_capacity(rest.len());
                for vertex_ref in &rest {
                    let key = parse_face_ref(path, line_no, vertex_ref, positions.len())?;
                    let index = match vertex_cache.get(&key) {
                        Some(&index) => index,
                        None => {
                            let vertex =
                                build_vertex(key, &positions, &texcoords, &normals, &current_material);
                            let index = vertices.len() as u32;
                            vertices.push(vertex);
                            vertex_cache.insert(key, index);
                            index
                        }
                    };
                    face.push(index);
                }

                if face.len() == 3 {
                    indices.extend_from_slice(&face);
                } else if face.len() > 3 {
                    // Fan around the first vertex: (0, i+1, i).
                    for i in 1..face.len() - 1 {
                        indices.extend_from_slice(&[face[0], face[i + 1], face[i]]);
                    }
                } else {
                    return Err(AssetError::parse(
                        path,
                        line_no,
                        format!("face with {} vertices (need at least 3)", face.len()),
                    ));
                }
            }
            // o, g, s, mtllib and friends carry no geometry.
            _ => {}
        }
    }

    Ok(MeshData {
        vertices,
        indices,
        has_texcoords,
        material: current_material,
    })
}

/// Parses a `pos[/tex][/norm]` face reference into a 0-based index triple.
///
/// Indices are 1-based in source; negative (relative) indexing is not
/// supported. The position index is bounds-checked here, while texcoord and
/// normal indices fall back to defaults later if out of range.
fn parse_face_ref(
    path: &Path,
    line: usize,
    vertex_ref: &str,
    position_count: usize,
) -> Result<VertexKey, AssetError> {
    let mut segments = vertex_ref.split('/');

    let pos_token = segments.next().unwrap_or("");
    let pos_index = parse_index(path, line, pos_token)?
        .ok_or_else(|| AssetError::parse(path, line, "face reference without a position index"))?;
    if pos_index >= position_count {
        return Err(AssetError::Index {
            path: path.to_path_buf(),
            line,
            index: pos_index + 1,
            count: position_count,
        });
    }

    let tex_index = match segments.next() {
        Some(token) => parse_index(path, line, token)?,
        None => None,
    };
    let norm_index = match segments.next() {
        Some(token) => parse_index(path, line, token)?,
        None => None,
    };

    Ok((pos_index, tex_index, norm_index))
}

/// Parses one 1-based index segment; an empty segment means "absent".
fn parse_index(path: &Path, line: usize, token: &str) -> Result<Option<usize>, AssetError> {
    if token.is_empty() {
        return Ok(None);
    }
    let value = token
        .parse::<i64>()
        .map_err(|_| AssetError::parse(path, line, format!("invalid index '{token}'")))?;
    if value < 1 {
        return Err(AssetError::parse(
            path,
            line,
            format!("index '{value}' out of range (relative indexing is not supported)"),
        ));
    }
    Ok(Some((value - 1) as usize))
}

fn build_vertex(
    key: VertexKey,
    positions: &[[f32; 3]],
    texcoords: &[[f32; 2]],
    normals: &[[f32; 3]],
    material: &Option<Material>,
) -> Vertex {
    let (pos_index, tex_index, norm_index) = key;

    let color = material
        .as_ref()
        .map(|m| m.diffuse)
        .unwrap_or([1.0, 1.0, 1.0]);
    let normal = norm_index
        .and_then(|i| normals.get(i).copied())
        .unwrap_or([0.0, 0.0, 1.0]);
    let tex_coords = tex_index
        .and_then(|i| texcoords.get(i).copied())
        .unwrap_or([0.0, 0.0]);

    Vertex {
        position: positions[pos_index],
        color,
        normal,
        tex_coords,
    }
}

fn parse_vec3(path: &Path, line: usize, tokens: &[&str]) -> Result<[f32; 3], AssetError> {
    if tokens.len() < 3 {
        return Err(AssetError::parse(path, line, "expected 3 components"));
    }
    Ok([
        parse_f32(path, line, tokens[0])?,
        parse_f32(path, line, tokens[1])?,
        parse_f32(path, line, tokens[2])?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn quad_face_becomes_a_two_triangle_fan() {
        // Unit square in the z=0 plane, no texcoords or normals.
        let path = write_temp(
            "neeps_obj_quad.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        );
        let mesh = load_obj(&path).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.indices, vec![0, 2, 1, 0, 3, 2]);
        assert!(!mesh.has_texcoords);
        for vertex in &mesh.vertices {
            assert_eq!(vertex.normal, [0.0, 0.0, 1.0]);
            assert_eq!(vertex.tex_coords, [0.0, 0.0]);
            assert_eq!(vertex.color, [1.0, 1.0, 1.0]);
        }
    }

    #[test]
    fn polygon_fan_emits_k_minus_2_triangles() {
        let path = write_temp(
            "neeps_obj_pentagon.obj",
            "v 0 0 0\nv 1 0 0\nv 1.5 1 0\nv 0.5 1.6 0\nv -0.5 1 0\nf 1 2 3 4 5\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.triangle_count(), 3);
        // Every triangle is anchored at the face's first vertex.
        for triangle in mesh.indices.chunks(3) {
            assert_eq!(triangle[0], 0);
        }
    }

    #[test]
    fn identical_index_triples_share_one_vertex() {
        // Two triangles sharing an edge: 6 references, 4 distinct triples.
        let path = write_temp(
            "neeps_obj_dedup.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn differing_texcoord_indices_split_vertices() {
        // The same position referenced with two different texcoords must
        // produce two output vertices: dedup is by exact triple, not position.
        let path = write_temp(
            "neeps_obj_split.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nvt 0 0\nvt 1 0\nvt 1 1\nf 1/1 2/2 3/3\nf 1/2 2/2 3/3\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert!(mesh.has_texcoords);
    }

    #[test]
    fn missing_texcoord_and_normal_segments_get_defaults() {
        let path = write_temp(
            "neeps_obj_defaults.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nvn 0 1 0\nf 1//1 2// 3\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertices[0].normal, [0.0, 1.0, 0.0]);
        // Empty normal segment and absent segment both default.
        assert_eq!(mesh.vertices[1].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(mesh.vertices[0].tex_coords, [0.0, 0.0]);
    }

    #[test]
    fn companion_mtl_colors_vertices() {
        let dir = std::env::temp_dir();
        let mut mtl = std::fs::File::create(dir.join("neeps_obj_colored.mtl")).unwrap();
        mtl.write_all(b"newmtl red\nKd 1.0 0.0 0.0\n").unwrap();
        let path = write_temp(
            "neeps_obj_colored.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nusemtl red\nf 1 2 3\n",
        );

        let mesh = load_obj(&path).unwrap();
        assert_eq!(mesh.vertices[0].color, [1.0, 0.0, 0.0]);
        assert_eq!(mesh.material.as_ref().unwrap().name, "red");
    }

    #[test]
    fn unknown_usemtl_leaves_material_unset() {
        let path = write_temp(
            "neeps_obj_nomtl.obj",
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nusemtl ghost\nf 1 2 3\n",
        );
        let mesh = load_obj(&path).unwrap();
        assert!(mesh.material.is_none());
        assert_eq!(mesh.vertices[0].color, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let err = load_obj(std::env::temp_dir().join("neeps_obj_does_not_exist.obj")).unwrap_err();
        assert!(matches!(err, AssetError::FileNotFound { .. }));
    }

    #[test]
    fn malformed_float_is_a_parse_error() {
        let path = write_temp("neeps_obj_badfloat.obj", "v 0 zero 0\n");
        let err = load_obj(&path).unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 1, .. }));
    }

    #[test]
    fn out_of_range_position_index_is_an_index_error() {
        let path = write_temp("neeps_obj_badindex.obj", "v 0 0 0\nf 1 2 3\n");
        let err = load_obj(&path).unwrap_err();
        assert!(matches!(
            err,
            AssetError::Index {
                line: 2,
                index: 2,
                count: 1,
                ..
            }
        ));
    }

    #[test]
    fn negative_index_is_rejected() {
        let path = write_temp("neeps_obj_negative.obj", "v 0 0 0\nv 1 0 0\nv 1 1 0\nf -1 -2 -3\n");
        let err = load_obj(&path).unwrap_err();
        assert!(matches!(err, AssetError::Parse { .. }));
    }
}
