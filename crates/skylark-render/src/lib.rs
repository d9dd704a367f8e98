//! wgpu globe viewer: GPU context, reverse-Z depth, an unlit per-draw pipeline,
//! procedural meshes, and [`GlobeRenderer`], the windowed [`skylark_view::Viewer`].

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod globe;
pub mod gpu;
pub mod mesh;
pub mod pass;
pub mod pipeline;
pub mod surface;

pub use buffer::{BufferAllocator, MeshBuffer, VertexPositionColor};
pub use camera::GlobeCamera;
pub use depth::DepthBuffer;
pub use globe::{GlobeRenderer, GlobeSettings};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use mesh::{MeshData, aircraft_mesh, globe_mesh, marker_mesh};
pub use pass::{FrameEncoder, RenderPassBuilder, SPACE_BLUE};
pub use pipeline::{DrawSlot, DrawUniform, UNLIT_SHADER_SOURCE, UnlitPipeline, draw_unlit};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};

/// Headless device for GPU tests. `None` when no adapter is available (CI).
#[cfg(test)]
pub(crate) fn create_test_device() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                force_fallback_adapter: false,
                compatible_surface: None,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}
