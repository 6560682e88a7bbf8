//! # Asset Loading
//!
//! Text-based geometry and material loading for the Neeps viewer.
//!
//! The pipeline parses an indexed-face OBJ subset (plus a companion MTL file
//! when one sits next to the geometry file) into a deduplicated, interleaved
//! vertex/index buffer pair ready for GPU upload.

pub mod error;
pub mod mtl;
pub mod obj;

pub use error::AssetError;
pub use mtl::Material;
pub use obj::{load_obj, MeshData};
