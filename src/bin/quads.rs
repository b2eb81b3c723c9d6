//! Three overlapping quads drawn from index buffers, each with its own color.

#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process;

use glsteps::application::{self, Application, Context, Settings};
use glsteps::errors::*;
use glsteps::math::prelude::*;
use glsteps::video::prelude::*;

const INDICES: [u32; 6] = [0, 1, 2, 3, 1, 2];

struct Window {
    program: ShaderProgram,
    quads: Vec<Geometry>,
}

impl Window {
    fn new(ctx: &mut Context) -> Result<Self> {
        let device = ctx.device();
        let program = ShaderProgram::new(
            device,
            ctx.asset("shaders/quads/vertex.glsl"),
            ctx.asset("shaders/quads/fragment.glsl"),
            &["in_color", "transform"],
        )?;

        let color = program.uniform_location("in_color")?;
        let layout = VertexLayout::position();

        #[rustfmt::skip]
        let quads: [([f32; 12], Color<f32>); 3] = [
            ([-0.7, -0.2, 0.0,
              -0.7,  0.7, 0.0,
               0.3, -0.2, 0.0,
               0.3,  0.7, 0.0], Color::new(0.8, 0.0, 0.0, 1.0)),
            ([-0.3, -0.5, 0.0,
              -0.3,  0.5, 0.0,
               0.7, -0.5, 0.0,
               0.7,  0.5, 0.0], Color::new(0.0, 0.8, 0.0, 1.0)),
            ([-0.5, -0.4, 0.0,
              -0.5,  0.4, 0.0,
               0.3, -0.4, 0.0,
               0.5,  0.4, 0.0], Color::new(0.0, 0.0, 0.8, 1.0)),
        ];

        let mut geometries = Vec::with_capacity(quads.len());
        for (vertices, c) in quads.iter() {
            let quad = Geometry::new(device, &layout, vertices, &INDICES)?.with_color(*c, color);
            geometries.push(quad);
        }

        let transform = program.uniform_location("transform")?;
        program.use_program()?;
        program.set_uniform_matrix4fv(transform, &Matrix4::identity())?;

        Ok(Window {
            program,
            quads: geometries,
        })
    }
}

impl Application for Window {
    fn on_render(&mut self, _: &mut Context) -> Result<()> {
        self.program.use_program()?;
        for v in &self.quads {
            v.draw()?;
        }

        Ok(())
    }
}

fn main() {
    env_logger::init();

    let mut settings = Settings::default();
    settings.window.title = "Hello Quads".into();
    settings.window.size = Vector2::new(640, 480);
    settings.clear_color = Color::new(0.1, 0.1, 0.1, 1.0);
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
