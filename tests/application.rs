extern crate glsteps;

use std::cell::RefCell;
use std::rc::Rc;

use glsteps::application::{self, Application, Context, Settings};
use glsteps::errors::*;
use glsteps::math::prelude::*;
use glsteps::video::prelude::*;
use glsteps::window::prelude::*;

const VS: &str = "#version 330 core
layout (location = 0) in vec3 pos;
void main() {
    gl_Position = vec4(pos, 1.0);
}
";

const FS: &str = "#version 330 core
out vec4 FragColor;
uniform vec4 in_color;
void main() {
    FragColor = in_color;
}
";

#[derive(Default)]
struct Record {
    frames: usize,
    events: Vec<Event>,
    dimensions: Vec<Vector2<u32>>,
    drawcalls: Vec<u32>,
}

struct Triangle {
    program: ShaderProgram,
    triangle: Geometry,
    record: Rc<RefCell<Record>>,
    fail_at: Option<usize>,
}

impl Triangle {
    fn new(ctx: &mut Context, record: Rc<RefCell<Record>>) -> Result<Self> {
        let device = ctx.device();
        let program = ShaderProgram::from_sources(device, VS, FS, &["in_color"])?;
        let color = program.uniform_location("in_color")?;

        let vertices: [f32; 9] = [-0.5, -0.5, 0.0, 0.5, -0.5, 0.0, 0.0, 0.5, 0.0];
        let layout = VertexLayout::position();
        let triangle = Geometry::new(device, &layout, &vertices, &[0, 1, 2])?
            .with_color(Color::red(), color);

        Ok(Triangle {
            program,
            triangle,
            record,
            fail_at: None,
        })
    }
}

impl Application for Triangle {
    fn on_event(&mut self, _: &mut Context, event: &Event) -> Result<()> {
        self.record.borrow_mut().events.push(*event);
        Ok(())
    }

    fn on_render(&mut self, ctx: &mut Context) -> Result<()> {
        let mut record = self.record.borrow_mut();
        if Some(record.frames) == self.fail_at {
            return Err(Error::Backend("frame failure".into()));
        }

        record.frames += 1;
        record.dimensions.push(ctx.dimensions());
        record.drawcalls.push(ctx.frame_info().drawcall);

        self.program.use_program()?;
        self.triangle.draw()
    }
}

fn run(frames: Vec<Vec<Event>>, fail_at: Option<usize>) -> (i32, Rc<RefCell<Record>>, Device) {
    let device = Device::headless();
    let window = Window::headless(Vector2::new(640, 480), frames);
    let record = Rc::new(RefCell::new(Record::default()));

    let shared = record.clone();
    let settings = Settings::default();
    let code = application::run_with(window, device.clone(), settings, move |ctx| {
        let mut app = Triangle::new(ctx, shared)?;
        app.fail_at = fail_at;
        Ok(app)
    });

    (code, record, device)
}

#[test]
fn closes_after_script() {
    let (code, record, device) = run(vec![Vec::new(); 3], None);
    assert_eq!(code, application::EXIT_SUCCESS);

    let record = record.borrow();
    assert_eq!(record.frames, 4);
    assert_eq!(record.events, vec![Event::Window(WindowEvent::Closed)]);

    // The first frame sees nothing, later ones the single draw of the frame before.
    assert_eq!(record.drawcalls, vec![0, 1, 1, 1]);

    let info = device.info();
    assert_eq!(info.alive_programs, 0);
    assert_eq!(info.alive_buffers, 0);
    assert_eq!(info.alive_vertex_arrays, 0);
}

#[test]
fn escape() {
    let frames = vec![
        vec![Event::pressed(Key::A)],
        vec![Event::pressed(Key::Escape), Event::released(Key::Escape)],
        Vec::new(),
        Vec::new(),
    ];

    let (code, record, _) = run(frames, None);
    assert_eq!(code, application::EXIT_SUCCESS);

    let record = record.borrow();
    assert_eq!(record.frames, 2);
    assert_eq!(
        record.events,
        vec![
            Event::pressed(Key::A),
            Event::pressed(Key::Escape),
            Event::released(Key::Escape),
        ]
    );
}

#[test]
fn resize() {
    let frames = vec![vec![Event::Window(WindowEvent::Resized(320, 200))]];
    let (_, record, _) = run(frames, None);

    let record = record.borrow();
    assert_eq!(
        record.dimensions,
        vec![Vector2::new(640, 480), Vector2::new(320, 200)]
    );
}

#[test]
fn setup_failure() {
    let device = Device::headless();
    let window = Window::headless(Vector2::new(640, 480), Vec::new());

    let code = application::run_with(window, device.clone(), Settings::default(), |_| {
        Err::<Triangle, _>(Error::Config("broken".into()))
    });

    assert_eq!(code, application::EXIT_FAILURE);
}

#[test]
fn frame_failure() {
    let (code, record, device) = run(vec![Vec::new(); 10], Some(2));
    assert_eq!(code, application::EXIT_FAILURE);
    assert_eq!(record.borrow().frames, 2);
    assert_eq!(device.info().alive_programs, 0);
}

#[test]
fn headless_settings() {
    let mut settings = Settings::default();
    settings.headless = true;
    settings.headless_frames = 2;

    let record = Rc::new(RefCell::new(Record::default()));
    let shared = record.clone();
    let code = application::run(settings, move |ctx| Triangle::new(ctx, shared));

    assert_eq!(code, application::EXIT_SUCCESS);
    assert_eq!(record.borrow().frames, 3);
}
