//! [`GlobeRenderer`]: the windowed viewer.
//!
//! Draws the WGS84 globe, a procedural model per entity with a model, and a
//! screen-sized octahedron per entity with a point. The HUD and the loading
//! indicator go to the window title. Labels are not rasterized; they are
//! logged when the entity is created.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{DQuat, DVec3};
use skylark_geo::{Ellipsoid, Geodetic, HeadingPitchRoll, heading_pitch_roll_quaternion};
use skylark_view::{
    CameraView, EntityId, EntitySpec, EntityStore, HudText, Viewer, ViewerError,
};
use winit::window::Window;

use crate::buffer::{BufferAllocator, MeshBuffer};
use crate::camera::GlobeCamera;
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
use crate::mesh::{aircraft_mesh, globe_mesh, marker_mesh};
use crate::pass::{FrameEncoder, RenderPassBuilder, SPACE_BLUE};
use crate::pipeline::{DrawSlot, DrawUniform, UnlitPipeline, draw_unlit};
use crate::surface::{SurfaceResizeEvent, SurfaceWrapper};

const LOADING_SUFFIX: &str = " - loading...";
const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct GlobeSettings {
    pub title: String,
    pub vsync: bool,
    pub fov_y_deg: f32,
    pub near_m: f32,
    pub far_m: f32,
    pub globe_subdivisions: u32,
}

impl Default for GlobeSettings {
    fn default() -> Self {
        Self {
            title: "Skylark".to_string(),
            vsync: true,
            fov_y_deg: 60.0,
            near_m: 1.0,
            far_m: 1.0e8,
            globe_subdivisions: 5,
        }
    }
}

/// Uniform slots for the parts of one entity that are drawn.
struct EntityDraws {
    model: Option<DrawSlot>,
    point: Option<DrawSlot>,
}

pub struct GlobeRenderer {
    window: Arc<Window>,
    gpu: RenderContext,
    surface: SurfaceWrapper,
    depth: DepthBuffer,
    pipeline: UnlitPipeline,
    ellipsoid: Ellipsoid,
    camera: GlobeCamera,
    globe_mesh: MeshBuffer,
    globe_slot: DrawSlot,
    aircraft_mesh: MeshBuffer,
    marker_mesh: MeshBuffer,
    entities: EntityStore,
    draws: HashMap<EntityId, EntityDraws>,
    title: String,
    ready: bool,
}

impl GlobeRenderer {
    /// Initialize the GPU for `window` and build the static scene.
    pub fn new(window: Arc<Window>, settings: &GlobeSettings) -> Result<Self, RenderContextError> {
        let inner = window.inner_size();
        let surface = SurfaceWrapper::new(inner.width, inner.height, window.scale_factor());
        let gpu = init_render_context_blocking(window.clone(), settings.vsync)?;

        let size = surface.physical_size();
        let depth = DepthBuffer::new(&gpu.device, size.width, size.height);
        let pipeline = UnlitPipeline::new(&gpu.device, gpu.surface_format);

        let allocator = BufferAllocator::new(&gpu.device);
        let globe = globe_mesh(settings.globe_subdivisions);
        log::info!(
            "Globe mesh: {} triangles (subdivision {})",
            globe.triangle_count(),
            settings.globe_subdivisions
        );
        let globe_mesh = globe.upload(&allocator, "globe");
        let aircraft_mesh = aircraft_mesh().upload(&allocator, "aircraft");
        let marker_mesh = marker_mesh().upload(&allocator, "marker");
        let globe_slot = DrawSlot::new(&gpu.device, &pipeline, "globe-uniform");

        let camera = GlobeCamera {
            fov_y: settings.fov_y_deg.to_radians(),
            aspect_ratio: surface.aspect_ratio(),
            near: settings.near_m,
            far: settings.far_m,
            ..GlobeCamera::default()
        };

        window.set_title(&format!("{}{LOADING_SUFFIX}", settings.title));

        Ok(Self {
            window,
            gpu,
            surface,
            depth,
            pipeline,
            ellipsoid: Ellipsoid::WGS84,
            camera,
            globe_mesh,
            globe_slot,
            aircraft_mesh,
            marker_mesh,
            entities: EntityStore::new(),
            draws: HashMap::new(),
            title: settings.title.clone(),
            ready: false,
        })
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }

    /// Track a window resize.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<SurfaceResizeEvent> {
        let event = self.surface.handle_resize(width, height)?;
        self.apply_resize(event);
        Some(event)
    }

    /// Track a DPI change. The physical size is read back from the window.
    pub fn rescale(&mut self, scale_factor: f64) -> Option<SurfaceResizeEvent> {
        let inner = self.window.inner_size();
        let event = self
            .surface
            .handle_scale_factor_changed(scale_factor, inner.width, inner.height)?;
        self.apply_resize(event);
        Some(event)
    }

    /// Reconfigure at the current size, used after [`SurfaceError::Lost`].
    pub fn reconfigure(&mut self) {
        let size = self.surface.physical_size();
        self.gpu.resize(size.width, size.height);
    }

    fn apply_resize(&mut self, event: SurfaceResizeEvent) {
        let (w, h) = (event.physical.width, event.physical.height);
        self.gpu.resize(w, h);
        self.depth.resize(&self.gpu.device, w, h);
        self.camera.set_aspect_ratio(w as f32, h as f32);
        log::info!(
            "Surface resized to {w}x{h} (scale {:.2})",
            event.scale_factor
        );
    }

    /// Draw one frame. Nothing is drawn until the window has had a non-zero
    /// size.
    pub fn render(&mut self) -> Result<(), SurfaceError> {
        if !self.surface.is_configured() {
            return Ok(());
        }
        self.write_uniforms();

        let surface_texture = self.gpu.get_current_texture()?;
        let mut frame = FrameEncoder::new(
            &self.gpu.device,
            Arc::new(self.gpu.queue.clone()),
            surface_texture,
        );
        let builder = RenderPassBuilder::new()
            .clear_color(SPACE_BLUE)
            .depth(self.depth.view.clone(), DepthBuffer::CLEAR_VALUE)
            .label("globe-pass");
        {
            let mut pass = frame.begin_render_pass(&builder);
            draw_unlit(&mut pass, &self.pipeline, &self.globe_slot, &self.globe_mesh);
            for entity in self.entities.iter() {
                let Some(draws) = self.draws.get(&entity.id) else {
                    continue;
                };
                if let Some(slot) = &draws.model {
                    draw_unlit(&mut pass, &self.pipeline, slot, &self.aircraft_mesh);
                }
                if let Some(slot) = &draws.point {
                    draw_unlit(&mut pass, &self.pipeline, slot, &self.marker_mesh);
                }
            }
        }
        frame.submit();
        Ok(())
    }

    fn write_uniforms(&self) {
        let queue = &self.gpu.queue;
        let globe_scale = DVec3::new(
            self.ellipsoid.semi_major_m,
            self.ellipsoid.semi_major_m,
            self.ellipsoid.semi_minor_m(),
        );
        let globe_mvp = self
            .camera
            .model_view_projection(DVec3::ZERO, DQuat::IDENTITY, globe_scale);
        self.globe_slot.write(queue, &DrawUniform::new(globe_mvp, WHITE));

        let viewport_height = self.surface.physical_size().height;
        for entity in self.entities.iter() {
            let Some(draws) = self.draws.get(&entity.id) else {
                continue;
            };
            let position = entity.position();
            let ecef = self.ellipsoid.to_ecef(position);

            if let (Some(slot), Some(model)) = (&draws.model, &entity.spec.model) {
                let rotation = entity.orientation().unwrap_or_else(|| {
                    heading_pitch_roll_quaternion(
                        &self.ellipsoid,
                        position,
                        HeadingPitchRoll::default(),
                    )
                });
                let mvp = self.camera.model_view_projection(
                    ecef,
                    rotation,
                    DVec3::splat(model.scale as f64),
                );
                slot.write(queue, &DrawUniform::new(mvp, WHITE));
            }

            if let (Some(slot), Some(point)) = (&draws.point, &entity.spec.point) {
                let distance = (ecef - self.camera.position).length();
                // Octahedron radius is one, so half the pixel size.
                let radius_m = self.camera.meters_per_pixel(distance, viewport_height)
                    * point.pixel_size as f64
                    / 2.0;
                let mvp =
                    self.camera
                        .model_view_projection(ecef, DQuat::IDENTITY, DVec3::splat(radius_m));
                slot.write(queue, &DrawUniform::new(mvp, point.color.0));
            }
        }
    }

    fn update_title(&self, hud: Option<&HudText>) {
        let mut title = self.title.clone();
        if !self.ready {
            title.push_str(LOADING_SUFFIX);
        }
        if let Some(hud) = hud {
            title.push_str(" | ");
            title.push_str(&hud.line());
        }
        self.window.set_title(&title);
    }
}

impl Viewer for GlobeRenderer {
    fn add_entity(&mut self, spec: EntitySpec) -> EntityId {
        let device = &self.gpu.device;
        let model = spec
            .model
            .map(|_| DrawSlot::new(device, &self.pipeline, &format!("{}-model", spec.name)));
        let point = spec
            .point
            .map(|_| DrawSlot::new(device, &self.pipeline, &format!("{}-point", spec.name)));

        if let Some(label) = &spec.label {
            log::info!(
                "Entity '{}' labelled \"{}\" at {}",
                spec.name,
                label.text,
                spec.position
            );
        }

        let id = self.entities.insert(spec);
        self.draws.insert(id, EntityDraws { model, point });
        id
    }

    fn set_entity_pose(
        &mut self,
        id: EntityId,
        position: Geodetic,
        orientation: Option<DQuat>,
    ) -> Result<(), ViewerError> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(ViewerError::UnknownEntity(id))?;
        entity.spec.position = position;
        if orientation.is_some() {
            entity.spec.orientation = orientation;
        }
        Ok(())
    }

    fn set_camera_view(&mut self, view: &CameraView) {
        self.camera.set_view(&self.ellipsoid, view);
    }

    fn set_hud(&mut self, hud: &HudText) -> Result<(), ViewerError> {
        self.update_title(Some(hud));
        Ok(())
    }

    fn show_ready(&mut self) {
        self.ready = true;
        self.update_title(None);
        log::info!("Globe viewer ready ({} entities)", self.entities.len());
    }
}
