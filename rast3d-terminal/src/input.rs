//! Keyboard bindings for the viewer
//!
//! | Key            | Action                 |
//! |----------------|------------------------|
//! | Up / Down      | move forward / back    |
//! | Left / Right   | strafe left / right    |
//! | Space / c      | move up / down         |
//! | j / l          | yaw left / right       |
//! | i / k          | pitch up / down        |
//! | b              | spin the object        |
//! | q / Esc / ^C   | quit                   |
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rast3d_core::{Movement, Movements};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Move(Movement),
    Spin,
    Quit,
}

/// Map a key to its command, if it is bound
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Command::Quit);
    }

    let command = match key.code {
        KeyCode::Up => Command::Move(Movement::MoveForward),
        KeyCode::Down => Command::Move(Movement::MoveBackward),
        KeyCode::Left => Command::Move(Movement::StrafeLeft),
        KeyCode::Right => Command::Move(Movement::StrafeRight),
        KeyCode::Char(' ') => Command::Move(Movement::MoveUp),
        KeyCode::Char('c') => Command::Move(Movement::MoveDown),
        KeyCode::Char('j') => Command::Move(Movement::YawLeft),
        KeyCode::Char('l') => Command::Move(Movement::YawRight),
        KeyCode::Char('i') => Command::Move(Movement::PitchUp),
        KeyCode::Char('k') => Command::Move(Movement::PitchDown),
        KeyCode::Char('b') => Command::Spin,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}

/// Everything the user asked for during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameInput {
    pub movements: Movements,
    pub spin: bool,
    pub quit: bool,
    /// Latest terminal size in columns and rows
    pub resized: Option<(u16, u16)>,
}

impl FrameInput {
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => match command_for(&key) {
                Some(Command::Move(movement)) => self.movements.insert(movement),
                Some(Command::Spin) => self.spin = true,
                Some(Command::Quit) => self.quit = true,
                None => {}
            },
            Event::Resize(columns, rows) => self.resized = Some((columns, rows)),
            _ => {}
        }
    }

    /// Wait up to `timeout` for input, then drain everything already queued
    pub fn poll(timeout: Duration) -> io::Result<Self> {
        let mut input = Self::default();
        let mut wait = timeout;
        while event::poll(wait)? {
            input.handle_event(event::read()?);
            wait = Duration::ZERO;
        }
        Ok(input)
    }
}
