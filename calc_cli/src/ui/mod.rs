pub mod form;
pub mod layout;
pub mod sidebar;
pub mod status_bar;
pub mod theme;

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use theme::Theme;

/// Page title across the top row
pub fn render_header(frame: &mut Frame, area: Rect, title: &str) {
    let header = Paragraph::new(Line::from(format!(" {} ", title)))
        .style(Theme::header())
        .alignment(Alignment::Center);
    frame.render_widget(header, area);
}
