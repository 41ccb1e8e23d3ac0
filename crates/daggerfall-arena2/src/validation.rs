//! Content root inventory checks.
//!
//! Validation is shallow: it counts files whose names match each required
//! pattern and compares the count with a minimum. File contents are never
//! opened. Results are plain values; validation itself cannot fail.

use regex::Regex;
use serde::Serialize;
use std::path::Path;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

/// One inventory check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Check {
    /// `TEXTURE.nnn` image banks
    Textures,
    /// `ARCH3D.BSA`
    Models,
    /// `BLOCKS.BSA`
    Blocks,
    /// `MAPS.BSA`
    Maps,
    /// `DAGGER.SND`
    Sounds,
    /// `WOODS.WLD`
    World,
}

impl Check {
    /// Every check, in reporting order
    pub const ALL: [Self; 6] = [
        Self::Textures,
        Self::Models,
        Self::Blocks,
        Self::Maps,
        Self::Sounds,
        Self::World,
    ];

    /// File name pattern, matched case-insensitively against whole names
    pub const fn pattern(self) -> &'static str {
        match self {
            Self::Textures => r"^TEXTURE\.\d{3}$",
            Self::Models => r"^ARCH3D\.BSA$",
            Self::Blocks => r"^BLOCKS\.BSA$",
            Self::Maps => r"^MAPS\.BSA$",
            Self::Sounds => r"^DAGGER\.SND$",
            Self::World => r"^WOODS\.WLD$",
        }
    }

    /// Minimum number of matching files
    pub const fn minimum(self) -> usize {
        match self {
            Self::Textures => 472,
            Self::Models | Self::Blocks | Self::Maps | Self::Sounds | Self::World => 1,
        }
    }

    /// Whether `file_name` satisfies this check's pattern
    pub fn matches(self, file_name: &str) -> bool {
        PATTERNS[self as usize].is_match(file_name)
    }
}

impl std::fmt::Display for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Textures => "textures",
            Self::Models => "models",
            Self::Blocks => "blocks",
            Self::Maps => "maps",
            Self::Sounds => "sounds",
            Self::World => "world",
        };
        f.write_str(name)
    }
}

#[allow(clippy::expect_used)]
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    Check::ALL
        .iter()
        .map(|check| {
            Regex::new(&format!("(?i){}", check.pattern())).expect("check patterns are valid")
        })
        .collect()
});

/// Outcome of validating a content root
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// The content root exists and is a directory
    pub path_exists: bool,
    /// At least 472 texture banks
    pub textures_valid: bool,
    /// `ARCH3D.BSA` present
    pub models_valid: bool,
    /// `BLOCKS.BSA` present
    pub blocks_valid: bool,
    /// `MAPS.BSA` present
    pub maps_valid: bool,
    /// `DAGGER.SND` present
    pub sounds_valid: bool,
    /// `WOODS.WLD` present
    pub world_valid: bool,
    /// Number of texture banks found
    pub texture_count: usize,
    /// `path_exists` and every check passed
    pub appears_valid: bool,
}

impl ValidationResult {
    fn missing_root() -> Self {
        Self {
            path_exists: false,
            textures_valid: false,
            models_valid: false,
            blocks_valid: false,
            maps_valid: false,
            sounds_valid: false,
            world_valid: false,
            texture_count: 0,
            appears_valid: false,
        }
    }

    /// Whether `check` passed
    pub const fn passed(&self, check: Check) -> bool {
        match check {
            Check::Textures => self.textures_valid,
            Check::Models => self.models_valid,
            Check::Blocks => self.blocks_valid,
            Check::Maps => self.maps_valid,
            Check::Sounds => self.sounds_valid,
            Check::World => self.world_valid,
        }
    }

    /// Checks that did not pass, in reporting order
    pub fn failed_checks(&self) -> Vec<Check> {
        Check::ALL
            .into_iter()
            .filter(|&check| !self.passed(check))
            .collect()
    }
}

/// Count the files directly inside `root` whose names match `check`
pub fn count_matches(root: &Path, check: Check) -> usize {
    let entries = match std::fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot list {}: {}", root.display(), e);
            return 0;
        }
    };

    entries
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|name| check.matches(name))
        })
        .count()
}

/// Validate the ARENA2 directory at `root`
pub fn validate<P: AsRef<Path>>(root: P) -> ValidationResult {
    let root = root.as_ref();
    if !root.is_dir() {
        info!("ARENA2 directory {} does not exist", root.display());
        return ValidationResult::missing_root();
    }

    let mut counts = [0usize; Check::ALL.len()];
    for check in Check::ALL {
        let count = count_matches(root, check);
        debug!(
            "Check {}: {} files match {} (need {})",
            check,
            count,
            check.pattern(),
            check.minimum()
        );
        counts[check as usize] = count;
    }
    let ok = |check: Check| counts[check as usize] >= check.minimum();

    let mut result = ValidationResult {
        path_exists: true,
        textures_valid: ok(Check::Textures),
        models_valid: ok(Check::Models),
        blocks_valid: ok(Check::Blocks),
        maps_valid: ok(Check::Maps),
        sounds_valid: ok(Check::Sounds),
        world_valid: ok(Check::World),
        texture_count: counts[Check::Textures as usize],
        appears_valid: false,
    };
    result.appears_valid = result.failed_checks().is_empty();

    if result.appears_valid {
        info!("ARENA2 directory {} appears valid", root.display());
    } else {
        warn!(
            "ARENA2 directory {} failed checks: {:?}",
            root.display(),
            result.failed_checks()
        );
    }
    result
}
