pub mod config;
pub mod context;
pub mod frame;
pub mod gl;
pub mod input;
pub mod quad;
pub mod shader;
pub mod wnd;

use gl::GraphicsApi;

/// Something that renders into the currently bound framebuffer.
pub trait Draw<G: GraphicsApi>: core::fmt::Debug {
    fn draw(&self, gl: &G);
}

/// Swaps the back buffer to the screen.
pub trait Present {
    fn present(&self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WndSize {
    pub width: u32,
    pub height: u32,
}
impl WndSize {
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
impl From<winit::dpi::PhysicalSize<u32>> for WndSize {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self {
            width: size.width,
            height: size.height,
        }
    }
}
