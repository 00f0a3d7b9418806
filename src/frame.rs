use winit::keyboard::KeyCode;

use crate::{gl::GraphicsApi, input::InputState, Draw, Present, WndSize};

const CLOSE_KEY: KeyCode = KeyCode::Escape;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Running,
    ClosingRequested,
    Terminated,
}

/// Render loop state machine.
///
/// `Running -> ClosingRequested -> Terminated`; no transition leads back.
#[derive(Debug, Clone)]
pub struct FrameLoop {
    state: LoopState,
    viewport: Option<WndSize>,
}
impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Running,
            viewport: None,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }
    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }
    pub fn close_requested(&self) -> bool {
        self.state == LoopState::ClosingRequested
    }
    pub fn viewport(&self) -> Option<WndSize> {
        self.viewport
    }

    pub fn request_close(&mut self) {
        if self.state == LoopState::Running {
            tracing::info!("close requested");
            self.state = LoopState::ClosingRequested;
        }
    }

    /// Returns `true` on the transition out of `ClosingRequested`.
    pub fn terminate(&mut self) -> bool {
        if self.state != LoopState::ClosingRequested {
            return false;
        }
        self.state = LoopState::Terminated;
        true
    }

    pub fn process_input(&mut self, input: &InputState) {
        if input.is_key_pressed(CLOSE_KEY) {
            self.request_close();
        }
    }

    /// Points the viewport at the whole framebuffer. Zero-sized windows are ignored.
    pub fn resize<G: GraphicsApi>(&mut self, gl: &G, size: WndSize) -> bool {
        if size.is_empty() {
            return false;
        }
        gl.viewport(0, 0, size.width as i32, size.height as i32);
        self.viewport = Some(size);
        true
    }

    /// One iteration: input, clear and draw, present.
    pub fn tick<G, D, P>(&mut self, gl: &G, input: &InputState, scene: &D, surface: &P)
    where
        G: GraphicsApi,
        D: Draw<G> + ?Sized,
        P: Present + ?Sized,
    {
        if !self.is_running() {
            return;
        }
        self.process_input(input);
        scene.draw(gl);
        if let Err(e) = surface.present() {
            tracing::error!("failed to present frame: {e:#}");
        }
    }
}
impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use winit::event::ElementState;

    use crate::{
        config::Config,
        gl::recording::{Call, RecordingGl},
        quad::Quad,
    };

    use super::*;

    fn setup() -> (RecordingGl, Quad<RecordingGl>) {
        let gl = RecordingGl::new();
        let quad = Quad::new(&gl, &Config::default()).unwrap();
        gl.clear_calls();
        (gl, quad)
    }

    #[test]
    fn test_tick_order() {
        let (gl, quad) = setup();
        let mut frame = FrameLoop::new();
        frame.tick(&gl, &InputState::new(), &quad, &gl);
        let calls = gl.calls();
        assert!(matches!(calls[0], Call::Clear(_)));
        assert!(matches!(calls[1], Call::UseProgram(Some(_))));
        assert!(matches!(calls[2], Call::BindVertexArray(Some(_))));
        assert_eq!(calls[3], Call::DrawTriangles(6));
        assert_eq!(calls[4], Call::Present);
        assert!(frame.is_running());
    }

    #[test]
    fn test_escape_requests_close_same_tick() {
        let (gl, quad) = setup();
        let mut frame = FrameLoop::new();
        let mut input = InputState::new();
        input.set_key(KeyCode::Escape, ElementState::Pressed);
        frame.tick(&gl, &input, &quad, &gl);
        assert!(frame.close_requested());
        // the frame that observed the key is still drawn
        assert_eq!(gl.calls().last(), Some(&Call::Present));
    }

    #[test]
    fn test_close_is_monotonic() {
        let mut frame = FrameLoop::new();
        let mut input = InputState::new();
        input.set_key(KeyCode::Escape, ElementState::Pressed);
        frame.process_input(&input);
        frame.process_input(&input);
        assert_eq!(frame.state(), LoopState::ClosingRequested);
        input.set_key(KeyCode::Escape, ElementState::Released);
        frame.process_input(&input);
        frame.request_close();
        assert_eq!(frame.state(), LoopState::ClosingRequested);

        assert!(frame.terminate());
        assert!(!frame.terminate());
        frame.request_close();
        assert_eq!(frame.state(), LoopState::Terminated);
    }

    #[test]
    fn test_terminate_requires_close_request() {
        let mut frame = FrameLoop::new();
        assert!(!frame.terminate());
        assert_eq!(frame.state(), LoopState::Running);
    }

    #[test]
    fn test_no_draw_after_close() {
        let (gl, quad) = setup();
        let mut frame = FrameLoop::new();
        frame.request_close();
        frame.tick(&gl, &InputState::new(), &quad, &gl);
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_resize_before_next_draw() {
        let (gl, quad) = setup();
        let mut frame = FrameLoop::new();
        let input = InputState::new();
        frame.tick(&gl, &input, &quad, &gl);
        let size = WndSize {
            width: 1024,
            height: 768,
        };
        assert!(frame.resize(&gl, size));
        frame.tick(&gl, &input, &quad, &gl);

        let calls = gl.calls();
        let viewport = calls
            .iter()
            .position(|c| *c == Call::Viewport(0, 0, 1024, 768))
            .unwrap();
        let second_clear = calls
            .iter()
            .enumerate()
            .filter(|(_, c)| matches!(c, Call::Clear(_)))
            .nth(1)
            .map(|(i, _)| i)
            .unwrap();
        assert!(viewport < second_clear);
        assert_eq!(frame.viewport(), Some(size));
    }

    #[test]
    fn test_zero_resize_ignored() {
        let gl = RecordingGl::new();
        let mut frame = FrameLoop::new();
        let size = WndSize {
            width: 0,
            height: 600,
        };
        assert!(!frame.resize(&gl, size));
        assert!(gl.calls().is_empty());
        assert_eq!(frame.viewport(), None);
    }

    #[test]
    fn test_present_failure_keeps_running() {
        let (gl, quad) = setup();
        gl.fail_present();
        let mut frame = FrameLoop::new();
        frame.tick(&gl, &InputState::new(), &quad, &gl);
        assert!(frame.is_running());
        assert_eq!(gl.calls().last(), Some(&Call::DrawTriangles(6)));
    }
}
