/// Scene content and the view parameters the input handlers adjust
use mygl_core::{GlContext, GlResult, MatrixMode};
use nalgebra::{Point3, Vector3};

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub normal: Vector3<f64>,
}

/// A triangle face defined by three vertices
#[derive(Debug, Clone)]
pub struct Triangle {
    pub vertices: [Vertex; 3],
}

/// Triangle soup drawn by the renderer
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    /// Axis-aligned cube centred on the origin, two triangles per face.
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let axes = [
            Vector3::x(),
            -Vector3::x(),
            Vector3::y(),
            -Vector3::y(),
            Vector3::z(),
            -Vector3::z(),
        ];

        let mut triangles = Vec::with_capacity(12);
        for normal in axes {
            // u x v == normal keeps every face wound counter-clockwise
            let u = Vector3::new(normal.y, normal.z, normal.x);
            let v = normal.cross(&u);
            let center = Point3::from(normal * half);
            let corner = |a: f64, b: f64| Vertex {
                position: center + u * (a * half) + v * (b * half),
                normal,
            };
            let quad = [corner(-1.0, -1.0), corner(1.0, -1.0), corner(1.0, 1.0), corner(-1.0, 1.0)];
            triangles.push(Triangle {
                vertices: [quad[0], quad[1], quad[2]],
            });
            triangles.push(Triangle {
                vertices: [quad[0], quad[2], quad[3]],
            });
        }

        Self { triangles }
    }
}

/// Viewer-controlled rotation (degrees) and camera offsets
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    pub angle_x: f64,
    pub angle_y: f64,
    pub distance_x: f64,
    pub distance_y: f64,
    pub distance_z: f64,
}

impl ViewState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Rebuilds the model-view top from scratch for this view. Leaves `ctx`
    /// in model-view mode.
    pub fn apply_model_view(&self, ctx: &mut GlContext) -> GlResult<()> {
        ctx.set_mode(MatrixMode::ModelView);
        ctx.load_identity();
        ctx.translate(-self.distance_x, self.distance_y, -self.distance_z);
        ctx.rotate(self.angle_x, 1.0, 0.0, 0.0)?;
        ctx.rotate(self.angle_y, 0.0, 1.0, 0.0)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            angle_x: 30.0,
            angle_y: 20.0,
            distance_x: 0.0,
            distance_y: 0.0,
            distance_z: 5.0,
        }
    }
}
