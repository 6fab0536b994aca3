use std::{
    fs::File,
    io::{self, BufRead, BufReader, Read},
    path::Path,
};

use thiserror::Error;

use super::{Command, InputFrame, InputSource};

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("cannot read input script: {0}")]
    Io(#[from] io::Error),
    #[error("line {line}: unknown key {key:?}")]
    UnknownKey { line: usize, key: char },
}

/// Pre-recorded key presses, one frame per script line.
///
/// Blank lines and `#` comments are skipped. Every other character of a
/// line is a key held during that frame; `.` marks a frame with no keys.
pub struct ScriptedInput {
    frames: Vec<InputFrame>,
    current_frame_index: usize,
}

impl ScriptedInput {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: BufReader<R>) -> Result<Self, ScriptError> {
        let mut frames = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            let line = line.trim_end_matches(['\r', '\n']);
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }

            let mut frame = InputFrame::idle();
            for char_code in line.chars() {
                match char_to_key(char_code) {
                    Some(ScriptKey::Press(command)) => frame.press(command),
                    Some(ScriptKey::Idle) => {}
                    None => {
                        return Err(ScriptError::UnknownKey {
                            line: index + 1,
                            key: char_code,
                        });
                    }
                }
            }
            frames.push(frame);
        }

        Ok(Self {
            frames,
            current_frame_index: 0,
        })
    }

    pub fn from_script(text: &str) -> Result<Self, ScriptError> {
        Self::from_reader(BufReader::new(text.as_bytes()))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len() - self.current_frame_index
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<InputFrame> {
        let frame = self.frames.get(self.current_frame_index)?.clone();
        self.current_frame_index += 1;
        Some(frame)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum ScriptKey {
    Press(Command),
    Idle,
}

fn char_to_key(c: char) -> Option<ScriptKey> {
    let command = match c {
        'z' | 'Z' | 'w' | 'W' => Command::Up,
        's' | 'S' => Command::Down,
        'q' | 'Q' | 'a' | 'A' => Command::Left,
        'd' | 'D' => Command::Right,
        '+' => Command::FovUp,
        '-' => Command::FovDown,
        'h' | 'H' | ' ' => Command::Harvest,
        'i' | 'I' | '\t' => Command::ShowInventory,
        'x' | 'X' | '\x1B' => Command::Quit,
        '.' => return Some(ScriptKey::Idle),
        _ => return None,
    };
    Some(ScriptKey::Press(command))
}
