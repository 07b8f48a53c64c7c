//! WebGPU rendering module
//!
//! `draw` builds the frame on the CPU; `pipeline` uploads and draws it.

pub mod draw;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use draw::{DrawList, Label, build_scene};
pub use pipeline::{RenderError, RenderState};
pub use vertex::Vertex;
