//! MTL material file parsing
//!
//! Line-oriented, whitespace-tokenized parser for the small MTL subset the
//! viewer understands: `newmtl`, `Ka`, `Kd`, `Ks`, `Ns` and `map_Kd`.
//! Texture paths are resolved relative to the material file's directory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::error::AssetError;

/// Phong material properties attached to a mesh.
///
/// Parsed from an MTL file, or constructed with renderer defaults when the
/// geometry carries no material at all. Multiple faces under the same
/// `usemtl` directive share one instance; materials are owned by the mesh
/// that references them, never shared across meshes.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    /// Diffuse texture path, resolved relative to the MTL file.
    pub diffuse_texture: Option<PathBuf>,
}

impl Material {
    /// Creates a material with MTL parse-time defaults.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ambient: [0.2, 0.2, 0.2],
            diffuse: [0.8, 0.8, 0.8],
            specular: [1.0, 1.0, 1.0],
            shininess: 100.0,
            diffuse_texture: None,
        }
    }
}

impl Default for Material {
    /// The renderer's fallback material for untextured, unnamed meshes.
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            ambient: [0.2, 0.2, 0.2],
            diffuse: [0.8, 0.8, 0.8],
            specular: [1.0, 1.0, 1.0],
            shininess: 32.0,
            diffuse_texture: None,
        }
    }
}

/// Parses an MTL file into a name-keyed material set.
///
/// Property lines before any `newmtl` are ignored, as are directives outside
/// the supported subset. Callers should check for the file's existence first;
/// a missing MTL file is not an error condition.
pub fn load_mtl(path: &Path) -> Result<HashMap<String, Material>, AssetError> {
    let source =
        std::fs::read_to_string(path).map_err(|source| AssetError::from_io(path, source))?;

    let mtl_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let mut materials = HashMap::new();
    let mut current: Option<Material> = None;

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

        if directive == "newmtl" {
            let name = rest
                .first()
                .ok_or_else(|| AssetError::parse(path, line_no, "newmtl without a name"))?;
            if let Some(finished) = current.replace(Material::new(name)) {
                materials.insert(finished.name.clone(), finished);
            }
            continue;
        }

        let Some(material) = current.as_mut() else {
            continue;
        };

        match directive {
            "Ka" => material.ambient = parse_color(path, line_no, &rest)?,
            "Kd" => material.diffuse = parse_color(path, line_no, &rest)?,
            "Ks" => material.specular = parse_color(path, line_no, &rest)?,
            "Ns" => {
                let token = rest
                    .first()
                    .ok_or_else(|| AssetError::parse(path, line_no, "Ns without a value"))?;
                material.shininess = parse_f32(path, line_no, token)?;
            }
            "map_Kd" => {
                // Texture file names may contain spaces.
                let relative = rest.join(" ");
                if !relative.is_empty() {
                    material.diffuse_texture = Some(mtl_dir.join(relative));
                }
            }
            _ => {}
        }
    }

    if let Some(finished) = current {
        materials.insert(finished.name.clone(), finished);
    }

    Ok(materials)
}

pub(crate) fn parse_f32(path: &Path, line: usize, token: &str) -> Result<f32, AssetError> {
    token
        .parse::<f32>()
        .map_err(|_| AssetError::parse(path, line, format!("invalid number '{token}'")))
}

fn parse_color(path: &Path, line: usize, tokens: &[&str]) -> Result<[f32; 3], AssetError> {
    if tokens.len() < 3 {
        return Err(AssetError::parse(path, line, "expected 3 color components"));
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

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn parses_materials_with_defaults() {
        let path = write_temp(
            "neeps_mtl_defaults.mtl",
            "# comment\n\nnewmtl stone\nKd 0.5 0.4 0.3\n\nnewmtl bare\n",
        );
        let materials = load_mtl(&path).unwrap();

        let stone = &materials["stone"];
        assert_eq!(stone.diffuse, [0.5, 0.4, 0.3]);
        assert_eq!(stone.ambient, [0.2, 0.2, 0.2]);
        assert_eq!(stone.shininess, 100.0);

        let bare = &materials["bare"];
        assert_eq!(bare.diffuse, [0.8, 0.8, 0.8]);
        assert!(bare.diffuse_texture.is_none());
    }

    #[test]
    fn properties_apply_to_current_material_only() {
        let path = write_temp(
            "neeps_mtl_current.mtl",
            "Kd 1.0 0.0 0.0\nnewmtl a\nNs 12\nnewmtl b\nNs 64\n",
        );
        let materials = load_mtl(&path).unwrap();
        assert_eq!(materials["a"].shininess, 12.0);
        assert_eq!(materials["b"].shininess, 64.0);
        // The leading Kd had no material to attach to.
        assert_eq!(materials["a"].diffuse, [0.8, 0.8, 0.8]);
    }

    #[test]
    fn texture_path_resolves_relative_to_mtl_dir() {
        let path = write_temp(
            "neeps_mtl_texpath.mtl",
            "newmtl tex\nmap_Kd textures/wood grain.png\n",
        );
        let materials = load_mtl(&path).unwrap();
        let expected = std::env::temp_dir().join("textures/wood grain.png");
        assert_eq!(materials["tex"].diffuse_texture.as_deref(), Some(expected.as_path()));
    }

    #[test]
    fn malformed_number_is_a_parse_error() {
        let path = write_temp("neeps_mtl_badnum.mtl", "newmtl bad\nNs shiny\n");
        let err = load_mtl(&path).unwrap_err();
        assert!(matches!(err, AssetError::Parse { line: 2, .. }));
    }
}
