//! Scrollyte drives scroll-synchronized page animation.
//!
//! Pinned page regions turn a smoothed scroll position into progress values, which in turn play
//! pre-rendered frame sequences and procedural shape morphs:
//!
//! - Describe the page as a [`Page`] (or register regions on a [`Stage`] directly)
//! - Feed raw input through [`Stage::input`] and advance with [`Stage::tick`]
//! - Consumers ([`FramePlayer`], [`MorphSection`]) draw onto their own [`Surface`]
#![forbid(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod foundation;
pub mod frames;
pub mod morph;
pub mod render;
pub mod scene;
pub mod scroll;
pub mod stage;

pub use crate::animation::ease::Ease;
pub use crate::animation::progress::ProgressHandle;
pub use crate::assets::PreparedImage;
pub use crate::assets::loader::{AssetLoader, FsLoader, MemoryLoader, PlaceholderLoader};
pub use crate::foundation::core::{ElementId, Point, Rect, Rgba8Premul, Viewport};
pub use crate::foundation::error::{ScrollyteError, ScrollyteResult};
pub use crate::foundation::events::Subscription;
pub use crate::frames::manifest::FrameManifest;
pub use crate::frames::player::{FramePlayer, PlayerConfig, ScaleFit};
pub use crate::frames::sequence::{FrameSequence, LoadTicket};
pub use crate::morph::phases::{MorphConfig, MorphTimeline};
pub use crate::morph::points::{PointSet, ShapeKind};
pub use crate::morph::section::MorphSection;
pub use crate::render::cpu::CpuSurface;
pub use crate::render::{FrameRGBA, Surface};
pub use crate::scene::{Page, StaticLayout};
pub use crate::scroll::region::{LayoutSource, RegionHandle, RegionId, RegionSpec};
pub use crate::scroll::scheduler::Scheduler;
pub use crate::scroll::smoothing::{ElementTree, ScrollInput, SmoothScroll, SmoothingConfig};
pub use crate::stage::{Consumer, Stage, TickReport};
