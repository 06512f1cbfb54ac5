pub mod grid;
pub mod material_pattern_sampler;
pub mod primitive_layout_generator;
pub mod primitive_object;
pub mod texture_catalog;
