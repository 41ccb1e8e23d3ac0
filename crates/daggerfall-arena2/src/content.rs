//! Access to the archives in a content root.
//!
//! [`Arena2`] holds no open archives. Each accessor resolves the file
//! name inside the root (ignoring case, since installs copied from CD or
//! other platforms vary) and opens it with the configured usage mode and
//! loading strategy. The returned reader owns the archive; dropping it
//! releases the buffer, map or handle.

use crate::config::Arena2Config;
use crate::error::{Arena2Error, Result};
use crate::validation::{ValidationResult, validate};
use daggerfall_formats::blocks::{self, BlocksFile};
use daggerfall_formats::bsa::BsaArchive;
use daggerfall_formats::maps::{self, MapsFile};
use daggerfall_formats::mesh::{self, Arch3dFile};
use daggerfall_formats::sound::{self, SoundFile};
use daggerfall_formats::texture::{TextureFile, texture_file_name};
use std::path::{Path, PathBuf};
use tracing::debug;

/// A configured ARENA2 content root
#[derive(Debug, Clone)]
pub struct Arena2 {
    config: Arena2Config,
}

impl Arena2 {
    /// Use `config` for every archive opened through this root
    pub fn new(config: Arena2Config) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &Arena2Config {
        &self.config
    }

    /// Content root directory
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Run the inventory checks against the root
    pub fn validate(&self) -> ValidationResult {
        validate(self.root())
    }

    /// Path of the file called `name` in the root, ignoring ASCII case
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let root = self.root();
        if !root.is_dir() {
            return Err(Arena2Error::RootNotFound(root.to_path_buf()));
        }

        let exact = root.join(name);
        if exact.is_file() {
            return Ok(exact);
        }

        for entry in std::fs::read_dir(root)? {
            let entry = entry?;
            if entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.eq_ignore_ascii_case(name))
                && entry.file_type()?.is_file()
            {
                debug!("Resolved {} to {}", name, entry.path().display());
                return Ok(entry.path());
            }
        }

        Err(Arena2Error::FileNotFound {
            name: name.to_string(),
            root: root.to_path_buf(),
        })
    }

    /// Open any BSA in the root by file name
    pub fn archive(&self, name: &str) -> Result<BsaArchive> {
        let path = self.resolve(name)?;
        Ok(BsaArchive::open(
            path,
            self.config.usage,
            self.config.strategy,
        )?)
    }

    /// Open `ARCH3D.BSA`
    pub fn meshes(&self) -> Result<Arch3dFile> {
        Ok(Arch3dFile::new(self.archive(mesh::FILE_NAME)?))
    }

    /// Open `MAPS.BSA`
    pub fn maps(&self) -> Result<MapsFile> {
        Ok(MapsFile::new(self.archive(maps::FILE_NAME)?))
    }

    /// Open `DAGGER.SND`
    pub fn sounds(&self) -> Result<SoundFile> {
        Ok(SoundFile::new(self.archive(sound::FILE_NAME)?))
    }

    /// Open `BLOCKS.BSA`
    pub fn blocks(&self) -> Result<BlocksFile> {
        Ok(BlocksFile::new(self.archive(blocks::FILE_NAME)?))
    }

    /// Open texture bank `archive` (`TEXTURE.nnn`)
    pub fn texture(&self, archive: u16) -> Result<TextureFile> {
        let path = self.resolve(&texture_file_name(archive))?;
        Ok(TextureFile::open(path)?)
    }
}
