//! A textured quad tilted away from the camera under a perspective projection.

#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process;

use glsteps::application::{self, Application, Context, Settings};
use glsteps::errors::*;
use glsteps::math::prelude::*;
use glsteps::video::prelude::*;
use glsteps::window::prelude::*;

struct Window {
    program: ShaderProgram,
    quad: Geometry,
    texture: Texture,
}

impl Window {
    fn new(ctx: &mut Context) -> Result<Self> {
        let device = ctx.device();
        let program = ShaderProgram::new(
            device,
            ctx.asset("shaders/texquad/vertex.glsl"),
            ctx.asset("shaders/texquad/fragment.glsl"),
            &["in_color", "model", "view", "projection", "tex"],
        )?;

        #[rustfmt::skip]
        let vertices: [f32; 20] = [
            // positions      // texture coordinates
            0.8,  0.45, 0.0,  1.0, 1.0,
            0.8, -0.45, 0.0,  1.0, 0.0,
           -0.8, -0.45, 0.0,  0.0, 0.0,
           -0.8,  0.45, 0.0,  0.0, 1.0,
        ];

        let indices: [u32; 6] = [0, 1, 3, 1, 2, 3];
        let layout = VertexLayout::position_texcoord();
        let quad = Geometry::new(device, &layout, &vertices, &indices)?;

        let params = TextureParams::default();
        let texture = Texture::from_file(device, ctx.asset("textures/texquad.png"), &params)?;

        let model = Matrix4::from_angle_x(Deg(-55.0f32));
        let view = Matrix4::from_translation(Vector3::new(0.0f32, 0.0, -2.0));

        program.use_program()?;
        program.set_uniform_matrix4fv(program.uniform_location("model")?, &model)?;
        program.set_uniform_matrix4fv(program.uniform_location("view")?, &view)?;
        program.set_uniform_1i(program.uniform_location("tex")?, 0)?;

        let window = Window {
            program,
            quad,
            texture,
        };

        window.update_projection(ctx.aspect())?;
        Ok(window)
    }

    fn update_projection(&self, aspect: f32) -> Result<()> {
        let projection = Projection::perspective(Deg(45.0f32), aspect, 0.1, 100.0);
        if let Err(err) = projection.validate() {
            // A collapsed window keeps the last good projection.
            warn!("{}", err);
            return Ok(());
        }

        let location = self.program.uniform_location("projection")?;

        self.program.use_program()?;
        self.program
            .set_uniform_matrix4fv(location, &projection.to_matrix())
    }
}

impl Application for Window {
    fn on_event(&mut self, ctx: &mut Context, event: &Event) -> Result<()> {
        if let Event::Window(WindowEvent::Resized(_, _)) = *event {
            self.update_projection(ctx.aspect())?;
        }

        Ok(())
    }

    fn on_render(&mut self, _: &mut Context) -> Result<()> {
        self.program.use_program()?;
        self.texture.bind(0)?;
        self.quad.draw()
    }
}

fn main() {
    env_logger::init();

    let mut settings = Settings::default();
    settings.window.title = "Look! A Textured Quad!".into();
    settings.window.size = Vector2::new(1024, 768);
    settings.clear_color = Color::black();
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
