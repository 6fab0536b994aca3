pub mod scripted;

use bracket_geometry::prelude::Point;
use bracket_terminal::prelude::{BTerm, VirtualKeyCode};

pub use scripted::{ScriptError, ScriptedInput};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Up,
    Down,
    Left,
    Right,
    FovUp,
    FovDown,
    Harvest,
    ShowInventory,
    Quit,
}

impl Command {
    pub fn delta(self) -> Option<Point> {
        match self {
            Command::Up => Some(Point::new(0, -1)),
            Command::Down => Some(Point::new(0, 1)),
            Command::Left => Some(Point::new(-1, 0)),
            Command::Right => Some(Point::new(1, 0)),
            _ => None,
        }
    }
}

/// Keys held during one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InputFrame {
    held: Vec<Command>,
}

impl InputFrame {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn with(mut self, command: Command) -> Self {
        self.press(command);
        self
    }

    pub fn press(&mut self, command: Command) {
        if !self.held.contains(&command) {
            self.held.push(command);
        }
    }

    pub fn is_held(&self, command: Command) -> bool {
        self.held.contains(&command)
    }

    /// Sum of all held directions; opposite keys cancel out.
    pub fn movement(&self) -> Point {
        self.held
            .iter()
            .filter_map(|command| command.delta())
            .fold(Point::new(0, 0), |acc, delta| acc + delta)
    }
}

pub trait InputSource {
    /// `None` once the source has nothing more to say.
    fn poll(&mut self) -> Option<InputFrame>;
}

pub fn command_for_key(key: VirtualKeyCode) -> Option<Command> {
    match key {
        VirtualKeyCode::Z | VirtualKeyCode::W | VirtualKeyCode::Up => Some(Command::Up),
        VirtualKeyCode::S | VirtualKeyCode::Down => Some(Command::Down),
        VirtualKeyCode::Q | VirtualKeyCode::A | VirtualKeyCode::Left => Some(Command::Left),
        VirtualKeyCode::D | VirtualKeyCode::Right => Some(Command::Right),
        VirtualKeyCode::NumpadAdd | VirtualKeyCode::Plus | VirtualKeyCode::Equals => {
            Some(Command::FovUp)
        }
        VirtualKeyCode::NumpadSubtract | VirtualKeyCode::Minus => Some(Command::FovDown),
        VirtualKeyCode::Space => Some(Command::Harvest),
        VirtualKeyCode::Tab | VirtualKeyCode::I => Some(Command::ShowInventory),
        VirtualKeyCode::Escape => Some(Command::Quit),
        _ => None,
    }
}

/// The terminal backend reports at most one key per tick.
pub fn poll_terminal(ctx: &BTerm) -> InputFrame {
    let mut frame = InputFrame::idle();
    if let Some(command) = ctx.key.and_then(command_for_key) {
        frame.press(command);
    }
    frame
}
