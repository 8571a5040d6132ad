pub mod field;
pub mod generator;
