//! TerminalRenderer: flushes frames to a real terminal.
//!
//! Frames are diffed line by line against the previous one; only changed rows
//! are rewritten.

use std::io::{self, Write};

use anyhow::Result;

use crossterm::{
    cursor,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor},
    terminal, QueueableCommand,
};

use crate::frame::{Frame, Line, Tone};

pub struct TerminalRenderer {
    stdout: io::Stdout,
    last: Option<Frame>,
    buf: Vec<u8>,
}

impl TerminalRenderer {
    pub fn new() -> Self {
        Self {
            stdout: io::stdout(),
            last: None,
            buf: Vec::with_capacity(16 * 1024),
        }
    }

    pub fn enter(&mut self) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.buf.clear();
        self.buf.queue(terminal::EnterAlternateScreen)?;
        self.buf.queue(cursor::Hide)?;
        self.buf.queue(terminal::DisableLineWrap)?;
        self.flush_buf()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        self.buf.clear();
        self.buf.queue(ResetColor)?;
        self.buf.queue(SetAttribute(Attribute::Reset))?;
        self.buf.queue(terminal::EnableLineWrap)?;
        self.buf.queue(cursor::Show)?;
        self.buf.queue(terminal::LeaveAlternateScreen)?;
        self.flush_buf()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Force the next draw to be a full redraw.
    ///
    /// Useful on terminal resize events.
    pub fn invalidate(&mut self) {
        self.last = None;
    }

    pub fn draw(&mut self, frame: Frame) -> Result<()> {
        self.buf.clear();
        match self.last.as_ref() {
            Some(prev) => encode_diff_into(prev, &frame, &mut self.buf)?,
            None => encode_full_into(&frame, &mut self.buf)?,
        }
        self.flush_buf()?;
        self.last = Some(frame);
        Ok(())
    }

    fn flush_buf(&mut self) -> Result<()> {
        self.stdout.write_all(&self.buf)?;
        self.stdout.flush()?;
        Ok(())
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode a full-frame redraw into `out`.
pub fn encode_full_into(frame: &Frame, out: &mut Vec<u8>) -> Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;
    for (y, line) in frame.lines().iter().enumerate() {
        encode_line_into(y as u16, line, out)?;
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

/// Encode only the rows that differ between `prev` and `next` into `out`.
pub fn encode_diff_into(prev: &Frame, next: &Frame, out: &mut Vec<u8>) -> Result<()> {
    for y in changed_rows(prev, next) {
        match next.lines().get(y) {
            Some(line) => encode_line_into(y as u16, line, out)?,
            None => {
                out.queue(cursor::MoveTo(0, y as u16))?;
                out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
            }
        }
    }
    out.queue(ResetColor)?;
    out.queue(SetAttribute(Attribute::Reset))?;
    Ok(())
}

fn changed_rows(prev: &Frame, next: &Frame) -> Vec<usize> {
    let rows = prev.height().max(next.height());
    (0..rows)
        .filter(|&y| prev.lines().get(y) != next.lines().get(y))
        .collect()
}

fn encode_line_into(y: u16, line: &Line, out: &mut Vec<u8>) -> Result<()> {
    out.queue(cursor::MoveTo(0, y))?;
    out.queue(terminal::Clear(terminal::ClearType::UntilNewLine))?;
    for span in line.spans() {
        apply_tone_into(out, span.tone)?;
        out.queue(Print(&span.text))?;
    }
    Ok(())
}

fn apply_tone_into(out: &mut Vec<u8>, tone: Tone) -> Result<()> {
    out.queue(SetAttribute(Attribute::Reset))?;
    out.queue(SetForegroundColor(tone_color(tone)))?;
    match tone {
        Tone::Title | Tone::Popup | Tone::Warning => {
            out.queue(SetAttribute(Attribute::Bold))?;
        }
        Tone::Dim => {
            out.queue(SetAttribute(Attribute::Dim))?;
        }
        Tone::Normal | Tone::RedSuit | Tone::BlackSuit => {}
    }
    Ok(())
}

fn tone_color(tone: Tone) -> Color {
    let (r, g, b) = match tone {
        Tone::Normal => (220, 220, 220),
        Tone::Dim => (120, 120, 130),
        Tone::Title => (240, 200, 80),
        Tone::RedSuit => (230, 70, 70),
        Tone::BlackSuit => (200, 200, 255),
        Tone::Popup => (120, 230, 120),
        Tone::Warning => (250, 140, 60),
    };
    Color::Rgb { r, g, b }
}
