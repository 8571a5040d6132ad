pub mod geometry;
pub mod menu;
pub mod rotation;
