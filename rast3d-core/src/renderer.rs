//! Per-triangle geometry pipeline
//!
//! Every triangle goes through: object transform (placed objects only), view
//! transform, frustum cull, perspective projection, screen cull and viewport
//! mapping. Survivors are handed to a [`TriangleSink`] in index order.
//!
//! Culling is whole-triangle only. A triangle is dropped when all three
//! vertices fail a test; one that straddles a plane is projected unclipped.
use tracing::{debug, trace, warn};

use crate::camera::Camera;
use crate::geometry::{Mesh, Vertex};
use crate::math::{ColorRGB, Matrix4, Vector2};
use crate::projection::{CameraSnapshot, PointNdc, Viewport};
use crate::transform::Renderable;

/// A vertex in screen pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenVertex {
    pub position: Vector2,
    pub color: ColorRGB,
}

/// Three screen vertices forming one filled triangle
pub type ScreenTriangle = [ScreenVertex; 3];

/// Consumer of surviving triangles, e.g. a 2D rasterizer
pub trait TriangleSink {
    /// Called once per surviving triangle, in mesh index order
    fn draw_triangle(&mut self, triangle: &ScreenTriangle);
}

impl TriangleSink for Vec<ScreenTriangle> {
    fn draw_triangle(&mut self, triangle: &ScreenTriangle) {
        self.push(*triangle);
    }
}

/// Result of pushing one triangle through the pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TriangleOutcome {
    FrustumCulled,
    ScreenCulled,
    Emitted(ScreenTriangle),
}

/// Counters for one render call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles: usize,
    pub frustum_culled: usize,
    pub screen_culled: usize,
    /// Triangles with an out-of-range vertex index
    pub skipped: usize,
    pub emitted: usize,
}

/// Drives meshes through the pipeline for one viewport
#[derive(Debug, Clone)]
pub struct Renderer {
    viewport: Viewport,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Render a mesh whose vertices are already in world space
    pub fn render_mesh<S: TriangleSink + ?Sized>(
        &self,
        mesh: &Mesh,
        camera: &Camera,
        sink: &mut S,
    ) -> RenderStats {
        let snapshot = camera.snapshot(self.viewport);
        self.render_with(mesh, None, &snapshot, sink)
    }

    /// Render a placed object: its transform is applied before the view
    pub fn render_object<S: TriangleSink + ?Sized>(
        &self,
        renderable: &Renderable<'_>,
        camera: &Camera,
        sink: &mut S,
    ) -> RenderStats {
        let snapshot = camera.snapshot(self.viewport);
        let model = renderable.transform.transform_matrix();
        self.render_with(renderable.mesh, Some(&model), &snapshot, sink)
    }

    fn render_with<S: TriangleSink + ?Sized>(
        &self,
        mesh: &Mesh,
        model: Option<&Matrix4>,
        snapshot: &CameraSnapshot,
        sink: &mut S,
    ) -> RenderStats {
        let mut stats = RenderStats {
            triangles: mesh.triangle_count(),
            ..RenderStats::default()
        };

        for i in 0..stats.triangles {
            let Some(triangle) = mesh.triangle(i) else {
                warn!(triangle = i, "skipping triangle with out-of-range vertex index");
                stats.skipped += 1;
                continue;
            };

            match self.process_triangle(snapshot, model, &triangle) {
                TriangleOutcome::FrustumCulled => {
                    trace!(triangle = i, "outside depth range");
                    stats.frustum_culled += 1;
                }
                TriangleOutcome::ScreenCulled => {
                    trace!(triangle = i, "off screen");
                    stats.screen_culled += 1;
                }
                TriangleOutcome::Emitted(screen) => {
                    sink.draw_triangle(&screen);
                    stats.emitted += 1;
                }
            }
        }

        debug!(
            triangles = stats.triangles,
            emitted = stats.emitted,
            frustum_culled = stats.frustum_culled,
            screen_culled = stats.screen_culled,
            skipped = stats.skipped,
            "rendered mesh"
        );
        stats
    }

    /// Run one triangle through every stage after vertex fetch
    pub fn process_triangle(
        &self,
        snapshot: &CameraSnapshot,
        model: Option<&Matrix4>,
        triangle: &[Vertex; 3],
    ) -> TriangleOutcome {
        let camera_space = triangle.map(|v| {
            let world = match model {
                Some(m) => m.transform_point(v.position),
                None => v.position,
            };
            snapshot.to_camera_space(world)
        });

        if !camera_space.iter().any(|p| snapshot.in_frustum(*p)) {
            return TriangleOutcome::FrustumCulled;
        }

        let ndc: [PointNdc; 3] =
            std::array::from_fn(|k| snapshot.project(camera_space[k], triangle[k].color));

        if !ndc.iter().any(PointNdc::in_screen) {
            return TriangleOutcome::ScreenCulled;
        }

        TriangleOutcome::Emitted(ndc.map(|p| ScreenVertex {
            position: self.viewport.to_screen(p.position),
            color: p.color,
        }))
    }
}
