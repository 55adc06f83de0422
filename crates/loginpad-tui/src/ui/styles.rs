//! Colors and text styles, named by where they are used on screen.

use ratatui::style::{Color, Modifier, Style};

const INK: Color = Color::Rgb(220, 220, 210);
const FADED: Color = Color::Rgb(110, 116, 124);
const TEAL: Color = Color::Rgb(70, 170, 160);
const AMBER: Color = Color::Rgb(230, 170, 80);
const CRIMSON: Color = Color::Rgb(210, 80, 90);
const LEAF: Color = Color::Rgb(120, 190, 110);
const INPUT_BG: Color = Color::Rgb(36, 52, 60);
const BAR_BG: Color = Color::Rgb(24, 28, 34);

/// View titles
pub fn heading() -> Style {
    Style::default().fg(TEAL).add_modifier(Modifier::BOLD)
}

/// The path shown in the address bar
pub fn address() -> Style {
    Style::default().fg(AMBER).add_modifier(Modifier::UNDERLINED)
}

/// Labels, brackets and other secondary text
pub fn faded() -> Style {
    Style::default().fg(FADED)
}

pub fn input(focused: bool) -> Style {
    let style = Style::default().fg(INK);
    if focused {
        style.bg(INPUT_BG).add_modifier(Modifier::BOLD)
    } else {
        style
    }
}

pub fn button(focused: bool) -> Style {
    if focused {
        Style::default().fg(BAR_BG).bg(TEAL).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEAL)
    }
}

pub fn alert() -> Style {
    Style::default().fg(CRIMSON)
}

/// Transient status text such as "Signing in..."
pub fn notice() -> Style {
    Style::default().fg(AMBER)
}

pub fn welcome() -> Style {
    Style::default().fg(LEAF).add_modifier(Modifier::BOLD)
}

pub fn frame(active: bool) -> Style {
    Style::default().fg(if active { TEAL } else { FADED })
}

pub fn bar() -> Style {
    Style::default().fg(INK).bg(BAR_BG)
}

/// Key names in the hint line
pub fn key() -> Style {
    Style::default().fg(TEAL)
}
