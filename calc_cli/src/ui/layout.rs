use ratatui::layout::{Constraint, Direction, Layout, Rect};

use calc_core::menu::LayoutMode;

/// Widest content pane in centered mode
pub const CENTERED_MAX_WIDTH: u16 = 100;

const SIDEBAR_WIDTH: u16 = 36;

pub struct AppLayout {
    pub header: Rect,
    pub sidebar: Rect,
    pub content: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect, mode: LayoutMode) -> AppLayout {
    // Main vertical split: header | body | status bar
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Page title
            Constraint::Min(5),    // Sidebar + content
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(30)])
        .split(main_chunks[1]);

    let content = match mode {
        LayoutMode::Wide => body_chunks[1],
        LayoutMode::Centered => centered(body_chunks[1], CENTERED_MAX_WIDTH),
    };

    AppLayout {
        header: main_chunks[0],
        sidebar: body_chunks[0],
        content,
        status_bar: main_chunks[2],
    }
}

/// Horizontally center a column of at most `max_width` inside `area`
pub fn centered(area: Rect, max_width: u16) -> Rect {
    if area.width <= max_width {
        return area;
    }
    let margin = (area.width - max_width) / 2;
    Rect {
        x: area.x + margin,
        width: max_width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_uses_full_width() {
        let layout = compute_layout(Rect::new(0, 0, 200, 40), LayoutMode::Wide);
        assert_eq!(layout.sidebar.width, SIDEBAR_WIDTH);
        assert_eq!(layout.content.width, 200 - SIDEBAR_WIDTH - 1);
        assert_eq!(layout.header.height, 1);
        assert_eq!(layout.status_bar.y, 39);
    }

    #[test]
    fn test_centered_caps_width() {
        let layout = compute_layout(Rect::new(0, 0, 200, 40), LayoutMode::Centered);
        assert_eq!(layout.content.width, CENTERED_MAX_WIDTH);
        assert!(layout.content.x > layout.sidebar.right());
    }

    #[test]
    fn test_centered_narrow_terminal_unchanged() {
        let area = Rect::new(5, 2, 80, 20);
        assert_eq!(centered(area, CENTERED_MAX_WIDTH), area);
        let wide = Rect::new(0, 0, 120, 20);
        assert_eq!(centered(wide, 100), Rect::new(10, 0, 100, 20));
    }
}
