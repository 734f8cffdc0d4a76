use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::BorderType;

pub struct Theme;

impl Theme {
    pub const ACCENT: Color = Color::Cyan;

    pub fn border() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn border_focused() -> Style {
        Style::default().fg(Self::ACCENT)
    }

    pub fn border_type(focused: bool) -> BorderType {
        if focused {
            BorderType::Rounded
        } else {
            BorderType::Plain
        }
    }

    pub fn title() -> Style {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    }

    pub fn header() -> Style {
        Style::default().fg(Color::Black).bg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn menu_item() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn menu_selected() -> Style {
        Style::default().fg(Self::ACCENT).add_modifier(Modifier::BOLD)
    }

    pub fn label() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn value() -> Style {
        Style::default().fg(Color::White)
    }

    pub fn field_selected() -> Style {
        Style::default().fg(Color::Black).bg(Self::ACCENT)
    }

    pub fn unit() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn pass() -> Style {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    }

    pub fn fail() -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }

    pub fn note() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn highlight() -> Style {
        Style::default().fg(Color::Black).bg(Color::Yellow)
    }

    pub fn hint() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn status_bar() -> Style {
        Style::default().fg(Color::White).bg(Color::DarkGray)
    }

    pub fn status_error() -> Style {
        Style::default().fg(Color::White).bg(Color::Red)
    }
}
