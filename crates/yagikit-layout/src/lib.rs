//! # YagiKit Layout
//!
//! Places every element of every band along the boom, drives the housing
//! builders once per element and collects the results:
//!
//! - **Layout**: reference position, element positions, boom radius lookup
//! - **Scene**: named, colored solids for preview plus the exportable parts
//! - **Mesh**: welded triangle meshes with open-edge and volume reports
//! - **Export**: one STL file per housing, `<label>-<variant>.stl`

pub mod export;
pub mod layout;
pub mod mesh;
pub mod scene;

pub use export::{export_housings, write_preview, MeshReport};
pub use layout::{AntennaLayout, BandDistances};
pub use mesh::TriangleMesh;
pub use scene::{ExportPart, Scene, SceneEntry};
pub use yagikit_settings::FailurePolicy;
