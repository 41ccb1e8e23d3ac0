//! `ARCH3D.BSA` access by record index or object id

use crate::BsaRecord;
use crate::bsa::{BsaArchive, DirectoryType, LoadStrategy, UsageMode};
use crate::mesh::error::{MeshError, Result};
use crate::mesh::record::Mesh;
use std::path::Path;
use tracing::{debug, warn};

/// Conventional file name of the mesh archive
pub const FILE_NAME: &str = "ARCH3D.BSA";

/// Mesh archive reader
#[derive(Debug)]
pub struct Arch3dFile {
    archive: BsaArchive,
}

impl Arch3dFile {
    /// Wrap an opened archive
    pub fn new(archive: BsaArchive) -> Self {
        if archive.directory_type() != DirectoryType::Number {
            warn!(
                "ARCH3D archive uses a {:?} directory; object ids will not resolve",
                archive.directory_type()
            );
        }
        Self { archive }
    }

    /// Open `ARCH3D.BSA` from disk
    pub fn open<P: AsRef<Path>>(path: P, usage: UsageMode, strategy: LoadStrategy) -> Result<Self> {
        Ok(Self::new(BsaArchive::open(path, usage, strategy)?))
    }

    /// Underlying archive
    pub fn archive(&self) -> &BsaArchive {
        &self.archive
    }

    /// Number of meshes
    pub fn mesh_count(&self) -> usize {
        self.archive.record_count()
    }

    /// Object id of record `index`
    pub fn object_id(&self, index: usize) -> Result<u32> {
        let name = self.archive.record_name(index)?;
        self.archive
            .record_id(index)?
            .ok_or(MeshError::InvalidObjectId(name))
    }

    /// Record index of `object_id`
    pub fn index_of(&self, object_id: u32) -> Option<usize> {
        self.archive.index_of_id(object_id)
    }

    /// Decode mesh record `index`
    pub fn mesh(&self, index: usize) -> Result<Mesh> {
        let mesh = Mesh::decode(&self.archive, index)?;
        debug!(
            "Decoded mesh {} (record {}): {} sub-meshes, {} vertices",
            mesh.object_id,
            index,
            mesh.sub_meshes.len(),
            mesh.total_vertices
        );
        Ok(mesh)
    }

    /// Decode the mesh with `object_id`, or `None` if no record has that id
    pub fn mesh_by_id(&self, object_id: u32) -> Result<Option<Mesh>> {
        self.index_of(object_id).map(|i| self.mesh(i)).transpose()
    }
}
