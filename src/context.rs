use std::{ffi::CStr, num::NonZeroU32};

use anyhow::Context;
use glutin::{
    config::{ConfigTemplateBuilder, GlConfig},
    context::{
        ContextApi, ContextAttributesBuilder, GlProfile, NotCurrentGlContext,
        PossiblyCurrentContext, Version,
    },
    display::{GetGlDisplay, GlDisplay},
    surface::{GlSurface, Surface, WindowSurface},
};
use glutin_winit::{DisplayBuilder, GlWindow as _};
use raw_window_handle::HasWindowHandle;
use winit::{dpi::LogicalSize, event_loop::ActiveEventLoop, window::Window};

use crate::{config::Config, Present, WndSize};

/// Window, GL surface and the core-profile context current on this thread.
///
/// Field order is drop order: the surface and context go before the window.
#[derive(Debug)]
pub struct GlContext {
    gl: glow::Context,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}
impl GlContext {
    pub fn new(event_loop: &ActiveEventLoop, config: &Config) -> anyhow::Result<Self> {
        let attributes = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));
        let template = ConfigTemplateBuilder::new();
        let display_builder = DisplayBuilder::new().with_window_attributes(Some(attributes));
        let (window, gl_config) = display_builder
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|best, c| {
                        if c.num_samples() > best.num_samples() {
                            c
                        } else {
                            best
                        }
                    })
                    .expect("glutin offers at least one config")
            })
            .map_err(|e| anyhow::anyhow!("{e}"))
            .context("no usable gl config")?;
        let window = window.context("window creation failed")?;

        let raw_window_handle = window
            .window_handle()
            .context("window handle unavailable")?
            .as_raw();
        let version = config.gl_version;
        let context_attributes = ContextAttributesBuilder::new()
            .with_context_api(ContextApi::OpenGl(Some(Version::new(
                version.major,
                version.minor,
            ))))
            .with_profile(GlProfile::Core)
            .build(Some(raw_window_handle));
        let display = gl_config.display();
        // SAFETY: the raw window handle belongs to `window`, which outlives the context.
        let context = unsafe { display.create_context(&gl_config, &context_attributes) }
            .context("gl context creation failed")?;

        let surface_attributes = window
            .build_surface_attributes(Default::default())
            .context("window handle unavailable")?;
        // SAFETY: as above, the surface is dropped before `window`.
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes) }
            .context("gl surface creation failed")?;
        let context = context
            .make_current(&surface)
            .context("failed to make gl context current")?;

        // SAFETY: the context was made current on this thread just above.
        let gl = unsafe {
            glow::Context::from_loader_function_cstr(|s: &CStr| display.get_proc_address(s))
        };
        let loaded = glow::HasContext::version(&gl);
        tracing::info!(
            major = loaded.major,
            minor = loaded.minor,
            vendor = %loaded.vendor_info,
            "gl loaded"
        );
        if !version.satisfied_by(loaded.major, loaded.minor) {
            anyhow::bail!(
                "gl {}.{} is below the requested {}.{}",
                loaded.major,
                loaded.minor,
                version.major,
                version.minor
            );
        }

        Ok(Self {
            gl,
            surface,
            context,
            window,
        })
    }

    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn size(&self) -> WndSize {
        self.window.inner_size().into()
    }

    /// Resizes the surface; the caller still owns the viewport.
    pub fn resize(&self, size: WndSize) {
        let (Some(width), Some(height)) = (NonZeroU32::new(size.width), NonZeroU32::new(size.height))
        else {
            return;
        };
        self.surface.resize(&self.context, width, height);
    }
}
impl Present for GlContext {
    fn present(&self) -> anyhow::Result<()> {
        self.surface
            .swap_buffers(&self.context)
            .context("swap buffers")?;
        Ok(())
    }
}
