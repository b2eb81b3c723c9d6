/// The status of application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// The window has been requested to close.
    Closed,
    /// The window gained focus of user input.
    GainFocus,
    /// The window lost focus of user input.
    LostFocus,
    /// The size of window has changed.
    Resized(u32, u32),
}

/// Input device event, supports keyboard only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Pressed event on keyboard has been received.
    KeyboardPressed { key: Key },
    /// Released event from keyboard has been received.
    KeyboardReleased { key: Key },
}

/// The enumerations of all events that come from various kinds of user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Window(WindowEvent),
    InputDevice(InputEvent),
}

impl Event {
    /// Shortcut for a key press.
    pub fn pressed(key: Key) -> Self {
        Event::InputDevice(InputEvent::KeyboardPressed { key })
    }

    /// Shortcut for a key release.
    pub fn released(key: Key) -> Self {
        Event::InputDevice(InputEvent::KeyboardReleased { key })
    }
}

/// Symbolic name for a keyboard key.
#[derive(Debug, Hash, Ord, PartialOrd, PartialEq, Eq, Clone, Copy)]
pub enum Key {
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Key0,

    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
    I,
    J,
    K,
    L,
    M,
    N,
    O,
    P,
    Q,
    R,
    S,
    T,
    U,
    V,
    W,
    X,
    Y,
    Z,

    Escape,
    Tab,
    Space,
    Return,
    Back,

    Left,
    Up,
    Right,
    Down,
}
