//! JSON page descriptions and their assembly into a [`crate::stage::Stage`].

pub mod model;
pub mod page;
pub mod presets;

pub use model::{ConsumerDef, ElementDef, FrameSource, PageDef, SectionDef};
pub use page::{BuiltPage, BuiltSection, Page, StaticLayout};
pub use presets::RegionPreset;
