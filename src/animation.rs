pub mod ease;
pub mod lerp;
pub mod progress;
pub mod timeline;
