//! Four textured sprites in the corners of an orthographic view. `Tab` picks
//! a sprite, `Left` and `Right` spin it.

#[macro_use]
extern crate log;

use std::path::PathBuf;
use std::process;
use std::rc::Rc;

use glsteps::application::{self, Application, Context, Settings};
use glsteps::errors::*;
use glsteps::math::prelude::*;
use glsteps::scene::{Scene, Sprite, SpriteIndex};
use glsteps::video::prelude::*;
use glsteps::window::prelude::*;

/// Degrees per key press.
const STEP: f32 = 15.0;

#[rustfmt::skip]
const QUAD: [f32; 20] = [
    // positions      // texture coordinates
    0.2,  0.2, 0.0,   1.0, 1.0,
    0.2, -0.2, 0.0,   1.0, 0.0,
   -0.2, -0.2, 0.0,   0.0, 0.0,
   -0.2,  0.2, 0.0,   0.0, 1.0,
];

const INDICES: [u32; 6] = [0, 1, 3, 1, 2, 3];

struct Window {
    program: ShaderProgram,
    scene: Scene,
    selected: SpriteIndex,
}

impl Window {
    fn new(ctx: &mut Context) -> Result<Self> {
        let device = ctx.device();
        let program = ShaderProgram::new(
            device,
            ctx.asset("shaders/orthographic/vertex.glsl"),
            ctx.asset("shaders/orthographic/fragment.glsl"),
            &["projection", "model", "tex"],
        )?;

        let layout = VertexLayout::position_texcoord();
        let quad = Rc::new(Geometry::new(device, &layout, &QUAD, &INDICES)?);
        let model = program.uniform_location("model")?;

        let corners = [(-0.8, 0.8), (0.8, 0.8), (-0.8, -0.8), (0.8, -0.8)];
        let params = TextureParams::default();

        let mut scene = Scene::new();
        for (i, &(x, y)) in corners.iter().enumerate() {
            let path = ctx.asset(format!("textures/{}.png", i + 1));
            let texture = Rc::new(Texture::from_file(device, path, &params)?);
            let transform = Matrix4::from_translation(Vector3::new(x, y, 0.0f32));
            scene.add(Sprite::new(quad.clone(), texture, model).with_transform(transform));
        }

        let projection = Projection::ortho2d(-3.0f32, 3.0, -3.0, 3.0);
        projection.validate()?;

        program.use_program()?;
        let location = program.uniform_location("projection")?;
        program.set_uniform_matrix4fv(location, &projection.to_matrix())?;
        program.set_uniform_1i(program.uniform_location("tex")?, 0)?;

        Ok(Window {
            program,
            scene,
            selected: SpriteIndex::default(),
        })
    }

    fn rotate(&mut self, degrees: f32) {
        if let Some(sprite) = self.scene.get_mut(self.selected) {
            sprite.rotate(Deg(degrees));
        }
    }
}

impl Application for Window {
    fn on_event(&mut self, _: &mut Context, event: &Event) -> Result<()> {
        if let Event::InputDevice(InputEvent::KeyboardPressed { key }) = *event {
            match key {
                Key::Tab => {
                    if let Some(next) = self.scene.next(self.selected) {
                        self.selected = next;
                        info!("Selects sprite {}.", next.index() + 1);
                    }
                }
                Key::Left => self.rotate(STEP),
                Key::Right => self.rotate(-STEP),
                _ => {}
            }
        }

        Ok(())
    }

    fn on_render(&mut self, _: &mut Context) -> Result<()> {
        self.program.use_program()?;
        self.scene.draw(&self.program)
    }
}

fn main() {
    env_logger::init();

    let mut settings = Settings::default();
    settings.window.title = "Orthographic Projection".into();
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
