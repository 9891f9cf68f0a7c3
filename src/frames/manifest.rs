use crate::foundation::error::{ScrollyteError, ScrollyteResult};

/// How a 1-based source frame index maps to a file name.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameNaming {
    /// `prefix + zero-padded(index) + suffix`, e.g. `01.webp`.
    Padded {
        /// Minimum digit count.
        width: usize,
        /// Text before the number.
        #[serde(default)]
        prefix: String,
        /// Text after the number, usually the extension.
        suffix: String,
    },
    /// `prefix + (index + offset) + suffix`, e.g. `Sequence 01_100.webp` for index 1, offset 99.
    Offset {
        /// Text before the number.
        #[serde(default)]
        prefix: String,
        /// Added to the 1-based index.
        offset: i64,
        /// Text after the number.
        suffix: String,
    },
    /// Explicit file list; entry `k - 1` names source frame `k`.
    Listed {
        /// File names in source order.
        files: Vec<String>,
    },
}

impl FrameNaming {
    /// File name for 1-based source frame `index`.
    pub fn file_name(&self, index: u32) -> ScrollyteResult<String> {
        if index == 0 {
            return Err(ScrollyteError::validation("frame indices are 1-based"));
        }
        match self {
            Self::Padded {
                width,
                prefix,
                suffix,
            } => Ok(format!("{prefix}{index:0width$}{suffix}", width = *width)),
            Self::Offset {
                prefix,
                offset,
                suffix,
            } => Ok(format!("{prefix}{}{suffix}", i64::from(index) + offset)),
            Self::Listed { files } => files
                .get(index as usize - 1)
                .cloned()
                .ok_or_else(|| {
                    ScrollyteError::validation(format!("no listed file for frame {index}"))
                }),
        }
    }
}

/// Asset manifest for one frame sequence.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameManifest {
    /// Directory (URL-like) prefix joined with each file name.
    pub base_path: String,
    /// File naming scheme.
    pub naming: FrameNaming,
    /// Number of frames in the source sequence.
    pub total_frames: u32,
    /// Number of frames to sample and load.
    pub sampled_count: u32,
}

impl FrameManifest {
    /// Check the manifest shape.
    pub fn validate(&self) -> ScrollyteResult<()> {
        if self.sampled_count == 0 {
            return Err(ScrollyteError::validation("sampled_count must be >= 1"));
        }
        if self.total_frames < self.sampled_count {
            return Err(ScrollyteError::validation(
                "total_frames must be >= sampled_count",
            ));
        }
        if let FrameNaming::Listed { files } = &self.naming
            && files.len() < self.total_frames as usize
        {
            return Err(ScrollyteError::validation(format!(
                "listed naming has {} files for {} frames",
                files.len(),
                self.total_frames
            )));
        }
        Ok(())
    }

    /// 1-based source indices of the sampled frames.
    pub fn sample_indices(&self) -> Vec<u32> {
        sample_indices(self.total_frames, self.sampled_count)
    }

    /// Full asset path of every sampled frame, in playback order.
    pub fn sampled_paths(&self) -> ScrollyteResult<Vec<String>> {
        self.validate()?;
        let base = self.base_path.trim_end_matches('/');
        self.sample_indices()
            .into_iter()
            .map(|i| {
                let name = self.naming.file_name(i)?;
                Ok(if base.is_empty() {
                    name
                } else {
                    format!("{base}/{name}")
                })
            })
            .collect()
    }

    /// The full-bleed hero sequence: 88 frames `Sequence 01_100.webp ..= Sequence 01_187.webp`,
    /// played 1:1.
    pub fn hero() -> Self {
        Self {
            base_path: "/giant-frames".to_owned(),
            naming: FrameNaming::Offset {
                prefix: "Sequence 01_".to_owned(),
                offset: 99,
                suffix: ".webp".to_owned(),
            },
            total_frames: 88,
            sampled_count: 88,
        }
    }

    /// A creature sprite sequence, sampled down to `sampled_count` frames.
    pub fn creature(creature: Creature, sampled_count: u32) -> Self {
        let dir = "/How we can help characters";
        match creature {
            Creature::Pufferfish => Self {
                base_path: format!("{dir}/Puffer"),
                naming: padded_webp(),
                total_frames: 38,
                sampled_count,
            },
            Creature::Chameleon => Self {
                base_path: format!("{dir}/Cameleon"),
                naming: FrameNaming::Offset {
                    prefix: "Comp ".to_owned(),
                    offset: 299,
                    suffix: ".webp".to_owned(),
                },
                total_frames: 64,
                sampled_count,
            },
            Creature::AiFish => Self {
                base_path: format!("{dir}/AI brain"),
                naming: padded_webp(),
                total_frames: 38,
                sampled_count,
            },
            Creature::Octopus => Self {
                base_path: format!("{dir}/Octopuse"),
                naming: FrameNaming::Listed {
                    files: (0..64)
                        .map(|i| format!("The_octopus_moves_1080p_20260130{}.webp", 133_400 + i))
                        .collect(),
                },
                total_frames: 64,
                sampled_count,
            },
        }
    }
}

fn padded_webp() -> FrameNaming {
    FrameNaming::Padded {
        width: 2,
        prefix: String::new(),
        suffix: ".webp".to_owned(),
    }
}

/// Creature sprite sequences shipped with the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Creature {
    /// 38-frame pufferfish.
    Pufferfish,
    /// 64-frame chameleon.
    Chameleon,
    /// 38-frame AI brain fish.
    AiFish,
    /// 64-frame octopus with timestamped file names.
    Octopus,
}

/// Evenly spaced 1-based indices over `[1, total_frames]`.
///
/// `step = (total - 1) / (sampled - 1)` and `index(i) = round(1 + i * step)`; the first index is
/// always 1 and the last is always `total_frames`. A single sample yields `[1]`; zero samples or
/// zero frames yield nothing.
pub fn sample_indices(total_frames: u32, sampled_count: u32) -> Vec<u32> {
    if sampled_count == 0 || total_frames == 0 {
        return Vec::new();
    }
    if sampled_count == 1 {
        return vec![1];
    }
    let step = f64::from(total_frames - 1) / f64::from(sampled_count - 1);
    (0..sampled_count)
        .map(|i| {
            let idx = (1.0 + f64::from(i) * step).round() as u32;
            idx.clamp(1, total_frames)
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/frames/manifest.rs"]
mod tests;
