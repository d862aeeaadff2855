use std::time::Instant;

use glam::Vec4;
use glmodel::{
    ModelBuilder, ModelConfig, ShaderBundle, UniformDescriptor,
    abs::{Buffer, BufferUsage, RenderContext},
    logging,
};

mod app;

const TRIANGLE: [f32; 6] = [0.0, 0.5, -0.5, -0.5, 0.5, -0.5];

fn main() {
    let config = match std::env::args().nth(1) {
        Some(path) => ModelConfig::load(path),
        None => Ok(ModelConfig::default()),
    };
    let level = config
        .as_ref()
        .map_or(log::LevelFilter::Info, ModelConfig::level_filter);
    if let Err(e) = logging::init(level) {
        eprintln!("Failed to set up logging: {e}");
    }

    let result = config
        .map_err(|e| e.to_string())
        .and_then(|config| run(&config));
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(config: &ModelConfig) -> Result<(), String> {
    let mut app = app::App::new(&config.window)?;
    let (width, height) = app.drawable_size();

    let start = Instant::now();
    let vertex = ShaderBundle::new(include_str!("shaders/triangle/vert.glsl"))
        .with_attributes(config.attributes.clone());
    let fragment = ShaderBundle::new(include_str!("shaders/triangle/frag.glsl")).with_uniform(
        "color",
        UniformDescriptor::new(move || {
            let t = start.elapsed().as_secs_f32();
            Vec4::new(0.5 + 0.5 * t.sin(), 0.3, 0.5 + 0.5 * t.cos(), 1.0)
        }),
    );
    let buffer =
        Buffer::new(&app.gl, &TRIANGLE, BufferUsage::Static).map_err(|e| e.to_string())?;

    let mut model = ModelBuilder::new(config.name.as_str())
        .vertex(vertex)
        .fragment(fragment)
        .buffer(buffer)
        .draw_properties(config.draw)
        .debug(config.debug)
        .viewport(width, height)
        .clear_color(config.clear_color)
        .build(&app.gl)
        .map_err(|e| e.to_string())?;
    model
        .check_error(true, "after model setup")
        .map_err(|e| e.to_string())?;
    log::info!("Model {} ready", model.name());

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                sdl2::event::Event::Quit { .. } => break 'running,
                sdl2::event::Event::Window {
                    win_event: sdl2::event::WindowEvent::Resized(width, height),
                    ..
                } => {
                    app.gl.viewport(0, 0, width, height);
                }
                _ => {}
            }
        }

        app.gl.clear_color_buffer();
        model.update();
        model.draw();
        model
            .check_error(false, "after draw")
            .map_err(|e| e.to_string())?;

        app.window.gl_swap_window();
    }

    Ok(())
}
