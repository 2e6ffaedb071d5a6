//! Styled text lines for terminal rendering.

/// Colour role of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Normal,
    Dim,
    Title,
    RedSuit,
    BlackSuit,
    Popup,
    Warning,
}

/// A run of text sharing one tone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub tone: Tone,
}

impl Span {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }

    pub fn width(&self) -> usize {
        self.text.chars().count()
    }
}

/// One terminal row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Line {
    spans: Vec<Span>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, tone: Tone) -> &mut Self {
        self.spans.push(Span::new(text, tone));
        self
    }

    /// Pad with spaces up to column `col`.
    pub fn pad_to(&mut self, col: usize) -> &mut Self {
        let width = self.width();
        if width < col {
            self.spans.push(Span::new(" ".repeat(col - width), Tone::Normal));
        }
        self
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    pub fn width(&self) -> usize {
        self.spans.iter().map(Span::width).sum()
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A full screen of lines, top to bottom.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    lines: Vec<Line>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    /// Append an unstyled line.
    pub fn push_text(&mut self, text: impl Into<String>, tone: Tone) {
        let mut line = Line::new();
        line.push(text, tone);
        self.lines.push(line);
    }

    pub fn blank(&mut self) {
        self.lines.push(Line::new());
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// True if any line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.text().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_width_and_padding() {
        let mut line = Line::new();
        line.push("K♥", Tone::RedSuit).push(" ", Tone::Normal);
        assert_eq!(line.width(), 3);
        line.pad_to(8);
        assert_eq!(line.width(), 8);
        line.pad_to(4);
        assert_eq!(line.width(), 8);
        assert_eq!(line.text(), "K♥      ");
    }

    #[test]
    fn test_frame_contains() {
        let mut frame = Frame::new();
        frame.push_text("score 400", Tone::Title);
        frame.blank();
        assert_eq!(frame.height(), 2);
        assert!(frame.contains("400"));
        assert!(!frame.contains("BUST"));
    }
}
