//! Shell color markup
//!
//! Output is zsh prompt-expansion markup (`%F{color}...%f`), not ANSI
//! escapes, so the consuming shell stays in charge of rendering.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Green,
    Black,
    Blue,
    Yellow,
    Magenta,
}

impl Color {
    pub fn name(&self) -> &'static str {
        match self {
            Color::Red => "red",
            Color::Green => "green",
            Color::Black => "black",
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Magenta => "magenta",
        }
    }
}

/// Wrap `text` in a foreground-color span
pub fn paint(color: Color, text: &str) -> String {
    format!("%F{{{}}}{}%f", color.name(), text)
}
