//! The render loop shared by every exercise.
//!
//! An exercise implements `Application` and hands a setup closure to `run`,
//! which opens the window, builds the application inside a live GL context,
//! and drives it until the window is closed or `Escape` is pressed:
//!
//! ```text
//! while !shutdown {
//!     clear; on_render; swap buffers; poll events -> on_event
//! }
//! ```
//!
//! The application, and with it every GPU resource it owns, is dropped
//! before the window so that no object outlives its context.

pub mod settings;
pub use self::settings::Settings;

mod context;
pub use self::context::Context;

use crate::errors::*;
use crate::video::Device;
use crate::window::events::{Event, InputEvent, Key, WindowEvent};
use crate::window::Window;

/// Process exit code after the window was closed normally.
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code when the window or its GL context could not be created.
pub const EXIT_CONTEXT_FAILURE: i32 = -1;
/// Process exit code when the exercise failed to set up or to render a frame.
pub const EXIT_FAILURE: i32 = 1;

/// `Application` is a user-friendly facade to building exercises, which
/// defines a number of event functions that get executed in a pre-determined
/// order.
pub trait Application {
    /// `Application::on_event` is called once for every event polled from
    /// the window, after the frame was presented.
    fn on_event(&mut self, _: &mut Context, _: &Event) -> Result<()> {
        Ok(())
    }

    /// `Application::on_render` is called every frame between the clear and
    /// the buffer swap.
    fn on_render(&mut self, ctx: &mut Context) -> Result<()>;
}

/// Opens the window described by `settings` (or a headless one), then runs
/// the application built by `setup`. Returns the process exit code.
pub fn run<T, F>(settings: Settings, setup: F) -> i32
where
    T: Application,
    F: FnOnce(&mut Context) -> Result<T>,
{
    let (window, device) = if settings.headless {
        let frames = vec![Vec::new(); settings.headless_frames];
        let window = Window::headless(settings.window.size, frames);
        (window, Device::headless())
    } else {
        match create_window(&settings) {
            Ok(v) => v,
            Err(err) => {
                error!("Failed to create window. {}", err);
                return EXIT_CONTEXT_FAILURE;
            }
        }
    };

    run_with(window, device, settings, setup)
}

fn create_window(settings: &Settings) -> Result<(Window, Device)> {
    let window = Window::new(&settings.window)?;
    let device = unsafe { Device::gl()? };
    Ok((window, device))
}

/// Runs the application built by `setup` on an existing window and device.
/// Returns the process exit code.
pub fn run_with<T, F>(mut window: Window, device: Device, settings: Settings, setup: F) -> i32
where
    T: Application,
    F: FnOnce(&mut Context) -> Result<T>,
{
    if !window.is_current() {
        error!("The GL context of the window is not current on this thread.");
        return EXIT_CONTEXT_FAILURE;
    }

    let mut ctx = Context::new(device, settings, window.dimensions());

    let mut application = match setup(&mut ctx) {
        Ok(v) => v,
        Err(err) => {
            error!("Failed to setup application. {}", err);
            return EXIT_FAILURE;
        }
    };

    let code = match execute(&mut window, &mut ctx, &mut application) {
        Ok(()) => {
            info!("Exits after {} frames.", ctx.frame());
            EXIT_SUCCESS
        }
        Err(err) => {
            error!("Failed to run frame {}. {}", ctx.frame(), err);
            EXIT_FAILURE
        }
    };

    drop(application);

    let info = ctx.device().info();
    let alive =
        info.alive_programs + info.alive_buffers + info.alive_vertex_arrays + info.alive_textures;
    if alive > 0 {
        warn!("GPU objects outlive the application. {:?}", info);
    }

    code
}

fn execute<T>(window: &mut Window, ctx: &mut Context, application: &mut T) -> Result<()>
where
    T: Application,
{
    while !ctx.is_shutdown() {
        let device = ctx.device().clone();
        device.set_viewport(ctx.dimensions())?;
        device.clear(ctx.settings().clear_color)?;

        application.on_render(ctx)?;
        window.swap_buffers()?;

        ctx.end_frame(device.info());
        device.advance();

        for v in window.poll_events() {
            match *v {
                Event::Window(WindowEvent::Closed) => ctx.shutdown(),
                Event::Window(WindowEvent::Resized(w, h)) => ctx.set_dimensions((w, h).into()),
                Event::InputDevice(InputEvent::KeyboardPressed { key: Key::Escape }) => {
                    ctx.shutdown()
                }
                _ => {}
            }

            application.on_event(ctx, v)?;
        }
    }

    Ok(())
}
