pub mod app;
pub mod camera;
pub mod error;
pub mod frame;
pub mod input;
pub mod mesh;
pub mod renderer;
pub mod scene;
pub mod settings;
pub mod state;

use std::process::ExitCode;

use app::App;
use settings::DemoSettings;
use winit::event_loop::EventLoop;

fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

pub fn run() -> ExitCode {
    init_logging();

    log::info!("Starting shadow mapping demo");

    let settings = DemoSettings::load();
    let event_loop = match EventLoop::new() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            log::error!("{}", error::InitError::from(err));
            return ExitCode::FAILURE;
        }
    };

    let mut app = App::new(settings);
    if let Err(err) = event_loop.run_app(&mut app) {
        log::error!("Application error: {}", err);
        return ExitCode::FAILURE;
    }

    log::info!("Application shutdown complete");

    app.exit_code()
}
