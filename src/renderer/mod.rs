//! WebGPU rendering module
//!
//! Voxels and debris are instanced unit cubes; the ASCII frames go on a
//! textured billboard.

pub mod instances;
pub mod scene_pipeline;
pub mod shapes;
pub mod vertex;

pub use instances::build_instances;
pub use scene_pipeline::SceneRenderState;
