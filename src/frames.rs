pub mod manifest;
pub mod player;
pub mod sequence;
