pub mod phases;
pub mod points;
pub mod section;
