use crate::{
    foundation::core::{ElementId, Viewport},
    frames::manifest::{Creature, FrameManifest},
    frames::player::PlayerConfig,
    morph::phases::MorphConfig,
    scene::presets::RegionPreset,
    scroll::region::RegionSpec,
    scroll::smoothing::SmoothingConfig,
};

/// JSON page description: host layout plus the scroll-bound sections on it.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PageDef {
    pub viewport: Viewport,
    /// Natural (unpinned) element boxes.
    pub elements: Vec<ElementDef>,
    /// Overrides the natural document height (defaults to the lowest element bottom).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_height: Option<f64>,
    #[serde(default)]
    pub smoothing: SmoothingConfig,
    #[serde(default)]
    pub sections: Vec<SectionDef>,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ElementDef {
    pub id: ElementId,
    pub top: f64,
    pub height: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ElementId>,
}

/// A region and what it drives.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SectionDef {
    pub name: String,
    /// Explicit region; takes precedence over `preset`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<RegionPreset>,
    /// Trigger element for `preset`; defaults to the section name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger: Option<ElementId>,
    #[serde(default)]
    pub consumer: ConsumerDef,
}

/// Visual driven by a section's progress.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsumerDef {
    /// Region only (text reveals, overlays drawn by the host).
    #[default]
    None,
    Frames {
        frames: FrameSource,
        #[serde(default)]
        player: PlayerConfig,
    },
    Morph {
        #[serde(default)]
        morph: MorphConfig,
    },
}

fn default_creature_samples() -> u32 {
    24
}

/// Where a frame sequence's manifest comes from.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FrameSource {
    Hero,
    Creature {
        creature: Creature,
        #[serde(default = "default_creature_samples")]
        samples: u32,
    },
    Manifest(FrameManifest),
}

impl FrameSource {
    pub fn manifest(&self) -> FrameManifest {
        match self {
            Self::Hero => FrameManifest::hero(),
            Self::Creature { creature, samples } => FrameManifest::creature(*creature, *samples),
            Self::Manifest(m) => m.clone(),
        }
    }
}
