use bytemuck_derive::{Pod, Zeroable};

use crate::{
    config::Config,
    gl::{BufferTarget, GraphicsApi},
    shader::ShaderProgram,
    Draw,
};

pub const VERTEX_SHADER: &str = include_str!("quad.vert");
pub const FRAGMENT_SHADER: &str = include_str!("quad.frag");
const POSITION_SLOT: u32 = 0;

/// Orange quad on a flat background.
#[derive(Debug)]
pub struct Quad<G: GraphicsApi> {
    program: ShaderProgram<G>,
    geometry: GeometryBuffer<G>,
    clear_color: [f32; 4],
}
impl<G: GraphicsApi> Quad<G> {
    pub fn new(gl: &G, config: &Config) -> anyhow::Result<Self> {
        let program = ShaderProgram::new(gl, VERTEX_SHADER, FRAGMENT_SHADER)?;
        let program = if config.strict_shaders {
            program.strict()?
        } else {
            program
        };
        let geometry = GeometryBuffer::new(gl, &rectangle())?;
        Ok(Self {
            program,
            geometry,
            clear_color: config.clear_color,
        })
    }

    pub fn program(&self) -> &ShaderProgram<G> {
        &self.program
    }
    pub fn geometry(&self) -> &GeometryBuffer<G> {
        &self.geometry
    }

    pub fn delete(self, gl: &G) {
        self.program.delete(gl);
        self.geometry.delete(gl);
    }
}
impl<G: GraphicsApi> Draw<G> for Quad<G> {
    fn draw(&self, gl: &G) {
        gl.clear_color(self.clear_color);
        self.program.bind(gl);
        self.geometry.bind(gl);
        self.geometry.draw(gl);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct VertexAttributes {
    pub position: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<VertexAttributes>,
    pub indices: Vec<u32>,
}

/// Unit quad centered at the origin.
pub fn rectangle() -> Mesh {
    let vertices = vec![
        VertexAttributes {
            position: [0.5, 0.5, 0.],
        },
        VertexAttributes {
            position: [0.5, -0.5, 0.],
        },
        VertexAttributes {
            position: [-0.5, -0.5, 0.],
        },
        VertexAttributes {
            position: [-0.5, 0.5, 0.],
        },
    ];
    let vertex_pos = QuadVertexPos {
        top_right: 0,
        bottom_right: 1,
        bottom_left: 2,
        top_left: 3,
    };
    let indices = quad_indices(vertex_pos).into();
    Mesh { vertices, indices }
}

#[derive(Debug, Clone, Copy)]
struct QuadVertexPos {
    pub top_right: u32,
    pub bottom_right: u32,
    pub bottom_left: u32,
    pub top_left: u32,
}
/// Two triangles sharing the top-left/bottom-right diagonal.
fn quad_indices(vertex_pos: QuadVertexPos) -> [u32; 6] {
    [
        vertex_pos.top_right,
        vertex_pos.bottom_right,
        vertex_pos.top_left, //
        vertex_pos.bottom_right,
        vertex_pos.bottom_left,
        vertex_pos.top_left,
    ]
}

/// Vertex array plus its vertex and index buffers. Uploaded once, never written again.
#[derive(Debug)]
pub struct GeometryBuffer<G: GraphicsApi> {
    vertex_array: G::VertexArray,
    vertex_buffer: G::Buffer,
    index_buffer: G::Buffer,
    vertex_count: usize,
    index_count: usize,
}
impl<G: GraphicsApi> GeometryBuffer<G> {
    pub fn new(gl: &G, mesh: &Mesh) -> anyhow::Result<Self> {
        let vertex_array = gl.create_vertex_array().map_err(anyhow::Error::msg)?;
        gl.bind_vertex_array(Some(vertex_array));

        let vertex_buffer = gl.create_buffer().map_err(anyhow::Error::msg)?;
        gl.bind_buffer(BufferTarget::Array, Some(vertex_buffer));
        gl.buffer_data_static(BufferTarget::Array, bytemuck::cast_slice(&mesh.vertices));
        let stride = core::mem::size_of::<VertexAttributes>() as i32;
        gl.vertex_attrib_f32(POSITION_SLOT, 3, stride, 0);

        // recorded into the vertex array, so it stays bound
        let index_buffer = gl.create_buffer().map_err(anyhow::Error::msg)?;
        gl.bind_buffer(BufferTarget::ElementArray, Some(index_buffer));
        gl.buffer_data_static(BufferTarget::ElementArray, bytemuck::cast_slice(&mesh.indices));

        tracing::debug!(
            vertices = mesh.vertices.len(),
            indices = mesh.indices.len(),
            "geometry uploaded"
        );
        Ok(Self {
            vertex_array,
            vertex_buffer,
            index_buffer,
            vertex_count: mesh.vertices.len(),
            index_count: mesh.indices.len(),
        })
    }

    pub fn bind(&self, gl: &G) {
        gl.bind_vertex_array(Some(self.vertex_array));
    }

    pub fn draw(&self, gl: &G) {
        gl.draw_triangles(self.index_count as i32);
    }

    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Positions as flat `x, y, z` triples, read back from the vertex buffer.
    pub fn read_vertices(&self, gl: &G) -> Vec<f32> {
        let mut vertices = vec![0f32; self.vertex_count * 3];
        gl.bind_buffer(BufferTarget::Array, Some(self.vertex_buffer));
        gl.read_buffer(BufferTarget::Array, bytemuck::cast_slice_mut(&mut vertices));
        vertices
    }

    pub fn read_indices(&self, gl: &G) -> Vec<u32> {
        let mut indices = vec![0u32; self.index_count];
        self.bind(gl);
        gl.read_buffer(BufferTarget::ElementArray, bytemuck::cast_slice_mut(&mut indices));
        indices
    }

    pub fn delete(self, gl: &G) {
        gl.delete_vertex_array(self.vertex_array);
        gl.delete_buffer(self.vertex_buffer);
        gl.delete_buffer(self.index_buffer);
    }
}
