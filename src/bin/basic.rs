//! One orange triangle drawn straight from clip-space coordinates.

#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process;

use glsteps::application::{self, Application, Context, Settings};
use glsteps::errors::*;
use glsteps::math::prelude::*;
use glsteps::video::prelude::*;

const VS: &str = "#version 330 core
layout (location = 0) in vec3 pos;
void main() {
    gl_Position = vec4(pos.x, pos.y, pos.z, 1.0);
}
";

const FS: &str = "#version 330 core
out vec4 FragColor;
void main() {
    FragColor = vec4(1.0, 0.5, 0.2, 1.0);
}
";

struct Window {
    program: ShaderProgram,
    triangle: Geometry,
}

impl Window {
    fn new(ctx: &mut Context) -> Result<Self> {
        let device = ctx.device();
        let program = ShaderProgram::from_sources::<&str>(device, VS, FS, &[])?;

        #[rustfmt::skip]
        let vertices: [f32; 9] = [
            -0.5, -0.5, 0.0,
             0.5, -0.5, 0.0,
             0.0,  0.5, 0.0,
        ];

        let triangle = Geometry::arrays(device, &VertexLayout::position(), &vertices)?;
        Ok(Window { program, triangle })
    }
}

impl Application for Window {
    fn on_render(&mut self, _: &mut Context) -> Result<()> {
        self.program.use_program()?;
        self.triangle.draw()
    }
}

fn main() {
    env_logger::init();

    let mut settings = Settings::default();
    settings.window.title = "Hello World".into();
    settings.window.size = Vector2::new(640, 480);
    settings.assets = PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/assets"));

    let settings = match settings.parse_args() {
        Ok(v) => v,
        Err(err) => {
            error!("{}", err);
            process::exit(application::EXIT_FAILURE);
        }
    };

    process::exit(application::run(settings, Window::new));
}
