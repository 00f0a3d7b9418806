pub const WINDOW_WIDTH: u32 = 800;
pub const WINDOW_HEIGHT: u32 = 600;
pub const WINDOW_TITLE: &str = "Learn OpenGL :: Quad";

#[derive(Debug, Clone)]
pub struct Config {
    pub window: WindowConfig,
    pub gl_version: GlVersion,
    pub clear_color: [f32; 4],
    /// Treat shader compile and link failures as fatal instead of logging them.
    pub strict_shaders: bool,
}
impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            gl_version: GlVersion { major: 3, minor: 3 },
            clear_color: [0.2, 0.3, 0.3, 1.0],
            strict_shaders: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}
impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: WINDOW_TITLE.to_string(),
            width: WINDOW_WIDTH,
            height: WINDOW_HEIGHT,
        }
    }
}

/// Requested core-profile context version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct GlVersion {
    pub major: u8,
    pub minor: u8,
}
impl GlVersion {
    pub fn satisfied_by(&self, major: u32, minor: u32) -> bool {
        (major, minor) >= (u32::from(self.major), u32::from(self.minor))
    }
}
