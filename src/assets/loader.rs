use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::assets::PreparedImage;
use crate::assets::decode::decode_image;
use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// Source of decoded frames.
///
/// Implementations must be thread-safe: [`FrameSequence::load_with`] fans requests out over a
/// rayon pool.
///
/// [`FrameSequence::load_with`]: crate::frames::sequence::FrameSequence::load_with
pub trait AssetLoader: Send + Sync {
    /// Fetch and decode one frame.
    fn load(&self, path: &str) -> ScrollyteResult<PreparedImage>;
}

/// Normalize a page asset path into a root-relative path.
///
/// Page paths are URL-like (`/giant-frames/Sequence 01_100.webp`), so a single leading `/` is
/// accepted and stripped. The result uses `/` separators, drops `.` segments and rejects parent
/// traversals (`..`).
pub fn normalize_asset_path(source: &str) -> ScrollyteResult<String> {
    let s = source.replace('\\', "/");
    let s = s.trim_start_matches('/');
    if s.is_empty() {
        return Err(ScrollyteError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ScrollyteError::validation(
                "asset paths must not contain '..'",
            ));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ScrollyteError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

/// Loads frames from a directory on disk.
#[derive(Clone, Debug)]
pub struct FsLoader {
    root: PathBuf,
}

impl FsLoader {
    /// Serve assets relative to `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory assets are resolved against.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl AssetLoader for FsLoader {
    fn load(&self, path: &str) -> ScrollyteResult<PreparedImage> {
        let norm = normalize_asset_path(path)?;
        let p = self.root.join(Path::new(&norm));
        let bytes = std::fs::read(&p).map_err(|e| {
            ScrollyteError::asset(format!("failed to read frame '{}': {e}", p.display()))
        })?;
        decode_image(&bytes)
            .map_err(|e| ScrollyteError::asset(format!("failed to decode '{}': {e}", p.display())))
    }
}

/// In-memory loader keyed by normalized path; paths not present fail to load.
#[derive(Clone, Debug, Default)]
pub struct MemoryLoader {
    images: HashMap<String, PreparedImage>,
}

impl MemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an already decoded image under `path`.
    pub fn insert(&mut self, path: &str, image: PreparedImage) -> ScrollyteResult<()> {
        self.images.insert(normalize_asset_path(path)?, image);
        Ok(())
    }

    /// Number of registered images.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

impl AssetLoader for MemoryLoader {
    fn load(&self, path: &str) -> ScrollyteResult<PreparedImage> {
        let norm = normalize_asset_path(path)?;
        self.images
            .get(&norm)
            .cloned()
            .ok_or_else(|| ScrollyteError::asset(format!("no in-memory frame for '{norm}'")))
    }
}

/// Stand-in frames for pages rendered without their assets: every path yields a solid frame
/// whose color is derived from the path, so consecutive frames stay distinguishable.
#[derive(Clone, Copy, Debug)]
pub struct PlaceholderLoader {
    pub width: u32,
    pub height: u32,
}

impl PlaceholderLoader {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl AssetLoader for PlaceholderLoader {
    fn load(&self, path: &str) -> ScrollyteResult<PreparedImage> {
        use std::hash::{Hash, Hasher};

        let norm = normalize_asset_path(path)?;
        let mut h = std::collections::hash_map::DefaultHasher::new();
        norm.hash(&mut h);
        let [r, g, b, ..] = h.finish().to_le_bytes();
        Ok(PreparedImage::solid(self.width, self.height, [r, g, b, 255]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/loader.rs"]
mod tests;
