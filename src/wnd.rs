use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow},
    window::WindowId,
};

use crate::{
    config::Config, context::GlContext, frame::FrameLoop, input::InputState, quad::Quad,
};

/// Drives one window: creates the context on resume, renders on every redraw.
pub struct Wnd {
    config: Config,
    view: Option<View>,
    frame: FrameLoop,
    input: InputState,
    error: Option<anyhow::Error>,
}
impl Wnd {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            view: None,
            frame: FrameLoop::new(),
            input: InputState::new(),
            error: None,
        }
    }

    /// The fatal error that stopped the event loop, if any.
    pub fn into_result(self) -> anyhow::Result<()> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, e: anyhow::Error) {
        tracing::error!("{e:#}");
        self.error = Some(e);
        self.frame.request_close();
        self.frame.terminate();
        event_loop.exit();
    }
}

struct View {
    context: GlContext,
    quad: Quad<glow::Context>,
}
impl View {
    fn new(event_loop: &ActiveEventLoop, config: &Config) -> anyhow::Result<Self> {
        let context = GlContext::new(event_loop, config)?;
        let quad = Quad::new(context.gl(), config)?;
        Ok(Self { context, quad })
    }
}

impl ApplicationHandler for Wnd {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        tracing::info!("resumed");
        if self.view.is_some() {
            return;
        }
        event_loop.set_control_flow(ControlFlow::Poll);
        match View::new(event_loop, &self.config) {
            Ok(view) => {
                let size = view.context.size();
                self.frame.resize(view.context.gl(), size);
                self.view = Some(view);
            }
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(view) = &self.view else {
            return;
        };
        match event {
            WindowEvent::CloseRequested => {
                self.frame.request_close();
            }
            WindowEvent::Resized(size) => {
                let size = size.into();
                view.context.resize(size);
                if self.frame.resize(view.context.gl(), size) {
                    tracing::debug!(width = size.width, height = size.height, "resized");
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.update_key(&event);
            }
            WindowEvent::Focused(false) => {
                self.input.release_all();
            }
            WindowEvent::RedrawRequested => {
                self.frame
                    .tick(view.context.gl(), &self.input, &view.quad, &view.context);
            }
            _ => (),
        }
        if self.frame.terminate() {
            event_loop.exit();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(view) = &self.view {
            view.context.window().request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        tracing::info!("exiting");
        if let Some(view) = self.view.take() {
            view.quad.delete(view.context.gl());
        }
    }
}
