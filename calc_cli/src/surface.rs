//! Render target handed to menu handlers.
//!
//! A handler draws into an off-screen buffer covering the content pane and
//! receives at most one key press per cycle. The host copies the buffer into
//! the frame afterwards, so the surface owns everything it holds and the
//! dispatcher can live across frames.

use crossterm::event::KeyEvent;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::widgets::{StatefulWidget, Widget};

pub struct Surface {
    pub area: Rect,
    pub buffer: Buffer,
    key: Option<KeyEvent>,
    focused: bool,
    cursor: Option<Position>,
    notice: Option<String>,
}

impl Surface {
    pub fn new(area: Rect, key: Option<KeyEvent>) -> Self {
        Self {
            area,
            buffer: Buffer::empty(area),
            key,
            focused: false,
            cursor: None,
            notice: None,
        }
    }

    /// Mark the content pane as holding keyboard focus
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Key press for this cycle; only the first caller gets it
    pub fn take_key(&mut self) -> Option<KeyEvent> {
        self.key.take()
    }

    pub fn render_widget<W: Widget>(&mut self, widget: W, area: Rect) {
        widget.render(area.intersection(self.area), &mut self.buffer);
    }

    pub fn render_stateful_widget<W: StatefulWidget>(&mut self, widget: W, area: Rect, state: &mut W::State) {
        widget.render(area.intersection(self.area), &mut self.buffer, state);
    }

    /// Place the terminal cursor (shown only while the content pane has focus)
    pub fn set_cursor(&mut self, x: u16, y: u16) {
        self.cursor = Some(Position::new(x, y));
    }

    pub fn cursor(&self) -> Option<Position> {
        self.cursor
    }

    /// Message for the status bar
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }

    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Rows of the buffer as plain text
    #[cfg(test)]
    pub fn text(&self) -> String {
        buffer_text(&self.buffer)
    }
}

#[cfg(test)]
pub fn buffer_text(buffer: &Buffer) -> String {
    let width = buffer.area.width.max(1) as usize;
    buffer
        .content
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use ratatui::widgets::Paragraph;

    #[test]
    fn test_key_taken_once() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE);
        let mut surface = Surface::new(Rect::new(0, 0, 10, 2), Some(key));
        assert_eq!(surface.take_key(), Some(key));
        assert_eq!(surface.take_key(), None);
    }

    #[test]
    fn test_render_widget_clipped_to_area() {
        let mut surface = Surface::new(Rect::new(2, 1, 6, 1), None);
        surface.render_widget(Paragraph::new("hello world"), Rect::new(0, 0, 20, 5));
        assert_eq!(surface.text(), "hello ");
    }

    #[test]
    fn test_notice() {
        let mut surface = Surface::new(Rect::new(0, 0, 1, 1), None);
        surface.notify("saved");
        assert_eq!(surface.take_notice().as_deref(), Some("saved"));
        assert_eq!(surface.take_notice(), None);
    }
}
