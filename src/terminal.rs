use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{poll, read, Event, KeyCode},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        disable_raw_mode, enable_raw_mode, size, Clear, ClearType, EnterAlternateScreen,
        LeaveAlternateScreen,
    },
};
use std::fmt::Write as _;
use std::io::{self, stdout, Write};
use std::time::Duration;

/// Terminal abstraction for rendering
pub struct Terminal {
    width: u16,
    height: u16,
    buffer: Vec<Vec<Cell>>,
    alternate_screen: bool,
}

/// A single cell in the terminal buffer
#[derive(Clone, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Option<Color>,
    pub bg: Option<Color>,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: None,
            bg: None,
        }
    }
}

impl Terminal {
    /// Initialize the terminal for drawing
    pub fn new(alternate_screen: bool) -> io::Result<Self> {
        let (width, height) = size()?;

        if alternate_screen {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen, Hide)?;
        }

        Ok(Self::with_buffer(width, height, alternate_screen))
    }

    /// Buffer of a fixed size that never touches the real terminal
    pub fn offscreen(width: u16, height: u16) -> Self {
        Self::with_buffer(width, height, false)
    }

    fn with_buffer(width: u16, height: u16, alternate_screen: bool) -> Self {
        Self {
            width,
            height,
            buffer: vec![vec![Cell::default(); width as usize]; height as usize],
            alternate_screen,
        }
    }

    /// Get terminal dimensions
    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        for row in &mut self.buffer {
            for cell in row {
                *cell = Cell::default();
            }
        }
    }

    /// Clear the actual terminal
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(stdout(), Clear(ClearType::All))?;
        Ok(())
    }

    /// Set a cell, ignoring positions outside the buffer
    pub fn set(&mut self, x: i32, y: i32, ch: char, fg: Option<Color>, bg: Option<Color>) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            self.buffer[y as usize][x as usize] = Cell { ch, fg, bg };
        }
    }

    /// Set a string starting at position
    pub fn set_str(&mut self, x: i32, y: i32, s: &str, fg: Option<Color>) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i as i32, y, ch, fg, None);
        }
    }

    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.buffer.get(y as usize).and_then(|row| row.get(x as usize))
    }

    /// Render the entire buffer to screen
    pub fn render(&self) -> io::Result<()> {
        let mut out = stdout();

        for (y, row) in self.buffer.iter().enumerate() {
            queue!(out, MoveTo(0, y as u16))?;
            for cell in row {
                if let Some(color) = cell.fg {
                    queue!(out, SetForegroundColor(color))?;
                }
                if let Some(color) = cell.bg {
                    queue!(out, SetBackgroundColor(color))?;
                }
                queue!(out, Print(cell.ch), ResetColor)?;
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Wait for a keypress with timeout
    pub fn wait_key(&self, timeout_ms: u64) -> io::Result<Option<KeyCode>> {
        if poll(Duration::from_millis(timeout_ms))? {
            if let Event::Key(key_event) = read()? {
                return Ok(Some(key_event.code));
            }
        }
        Ok(None)
    }

    /// Buffer as ANSI text, trailing blank cells trimmed per row
    pub fn to_ansi(&self) -> String {
        let mut out = String::new();
        for row in &self.buffer {
            let used = row
                .iter()
                .rposition(|c| *c != Cell::default())
                .map_or(0, |i| i + 1);
            for cell in &row[..used] {
                if cell.fg.is_none() && cell.bg.is_none() {
                    out.push(cell.ch);
                    continue;
                }
                if let Some(color) = cell.fg {
                    push_sgr(&mut out, color, 38);
                }
                if let Some(color) = cell.bg {
                    push_sgr(&mut out, color, 48);
                }
                out.push(cell.ch);
                out.push_str("\x1b[0m");
            }
            out.push('\n');
        }
        out
    }

    /// Print buffer to stdout with ANSI colors (for print mode)
    pub fn print_to_stdout(&self) -> io::Result<()> {
        let mut out = stdout();
        out.write_all(self.to_ansi().as_bytes())?;
        out.flush()
    }
}

/// `layer` is 38 for foreground, 48 for background
fn push_sgr(out: &mut String, color: Color, layer: u8) {
    let _ = match color {
        Color::Rgb { r, g, b } => write!(out, "\x1b[{};2;{};{};{}m", layer, r, g, b),
        Color::AnsiValue(v) => write!(out, "\x1b[{};5;{}m", layer, v),
        _ => Ok(()),
    };
}

impl Drop for Terminal {
    fn drop(&mut self) {
        if self.alternate_screen {
            let _ = execute!(stdout(), Show, LeaveAlternateScreen);
            let _ = disable_raw_mode();
        }
    }
}
