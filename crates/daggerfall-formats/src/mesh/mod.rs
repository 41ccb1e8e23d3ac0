//! ARCH3D mesh records
//!
//! `ARCH3D.BSA` is a number-directory BSA; each record is one 3D object
//! keyed by its object id.
//!
//! # Record Layout
//!
//! - 64-byte header: version tag, point/plane counts, radius, section offsets
//! - Point list: `point_count` × (i32 x, i32 y, i32 z)
//! - Normal list: `plane_count` × (i32 x, i32 y, i32 z)
//! - Plane list: `plane_count` planes, each an 8-byte header followed by
//!   `point_count` × (i32 point offset, i16 u, i16 v)
//!
//! Plane point offsets are byte offsets into the point list; `v2.5` records
//! count them in 4-byte units, later versions in 12-byte units.
//!
//! Planes are grouped into sub-meshes by texture in order of first use.
//! Texture references point into `TEXTURE.nnn` banks and are not resolved
//! here.

mod error;
mod file;
mod header;
mod record;

pub use error::{MeshError, Result};
pub use file::{Arch3dFile, FILE_NAME};
pub use header::{
    Arch3dHeader, HEADER_SIZE, MeshVersion, PLANE_HEADER_SIZE, PLANE_POINT_SIZE, PlaneHeader,
    PlanePoint, TextureRef, VECTOR_SIZE,
};
pub use record::{Face, Mesh, SubMesh, Vertex};
