pub mod canvas;
pub mod frame_pipeline;
pub mod gpu_context;
pub mod texture;
pub mod vertex;

pub use canvas::Canvas;
pub use frame_pipeline::{FramePipeline, FrameRenderer};
pub use gpu_context::GpuContext;
pub use texture::FrameTexture;
pub use vertex::FrameVertex;
