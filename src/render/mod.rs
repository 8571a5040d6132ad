pub mod backend;
pub mod cpu;
pub mod svg;
pub mod svg_raster;
