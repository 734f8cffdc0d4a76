use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Focus, Status};
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, status: &Status, focus: Focus) {
    let (text, style) = match status {
        Status::Ready => ("Ready".to_string(), Theme::status_bar()),
        Status::Info(message) => (message.clone(), Theme::status_bar()),
        Status::Error(message) => (format!("Error: {}", message), Theme::status_error()),
    };

    let focus_name = match focus {
        Focus::Sidebar => "MENU",
        Focus::Content => "EDIT",
    };
    let keys = "Tab focus | Esc menu | Ctrl+P report | q quit";

    // Pad to fill remaining space
    let used = text.chars().count() + 2;
    let right = format!(" {} | {} ", keys, focus_name);
    let remaining = (area.width as usize).saturating_sub(used + right.chars().count());

    let line = Line::from(vec![
        Span::styled(format!(" {} ", text), style),
        Span::styled(" ".repeat(remaining), Theme::status_bar()),
        Span::styled(right, Theme::status_bar()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
