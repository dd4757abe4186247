//! # YagiKit Designer
//!
//! Parametric geometry for the parts that hold a Yagi antenna together.
//!
//! ## Core Components
//!
//! - **Profiles**: Closed outlines of lines and arcs with offsetting,
//!   filleting, mirroring and tessellation
//! - **Tangents**: Tangent angles to circles and tangent points on outlines
//! - **Terminals**: Screw terminal cross-sections, teardrops and bodies
//! - **Sleeves**: Tapered C-shaped clamps around the boom
//! - **Housings**: Element housings, wire holders and terminal holders
//! - **Kernel**: Thin adapter over the csgrs solid modeling kernel
//!
//! ## Architecture
//!
//! ```text
//! Profile (2D lines and arcs)
//!   ├── Tangent helpers
//!   └── Terminal / Sleeve / Housing builders
//!         └── Kernel (extrude, loft, Booleans on csgrs meshes)
//! ```
//!
//! All builders are pure: the same parameters always produce the same mesh.

pub mod font_manager;
pub mod housing;
pub mod kernel;
pub mod profile;
pub mod sleeve;
pub mod tangent;
pub mod terminal;

pub use housing::{
    drop_outline, profile_xy, profile_yz, HousingBuilder, HousingParams, SleeveParams,
    TerminalMount, WireMount, ARC_OVERLAP,
};
pub use kernel::{Region, Solid};
pub use profile::{Edge, Profile};
pub use sleeve::{c_slot_profile, make_c_sleeve, make_c_sleeve_slice};
pub use tangent::{edge_tangent_point, tangent_angle, tangent_point};
pub use terminal::{TerminalBuilder, TerminalFace, TEARDROP_ROTATION};
