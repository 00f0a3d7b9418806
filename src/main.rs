use hello_quad::{config::Config, wnd::Wnd};
use winit::event_loop::EventLoop;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();
    let event_loop = EventLoop::builder().build()?;
    let mut app = Wnd::new(Config::default());
    event_loop.run_app(&mut app)?;
    app.into_result()
}
