use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem};

use calc_core::menu::{MenuOption, MENU_TITLE};

use crate::ui::theme::Theme;

/// Main menu as a radio group
pub fn render(frame: &mut Frame, area: Rect, selected: MenuOption, focused: bool) {
    let block = Block::default()
        .title(format!(" {} ", MENU_TITLE))
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_type(Theme::border_type(focused))
        .border_style(if focused { Theme::border_focused() } else { Theme::border() });

    let items: Vec<ListItem> = MenuOption::ALL
        .iter()
        .map(|option| {
            let (marker, style) = if *option == selected {
                ("(•) ", Theme::menu_selected())
            } else {
                ("( ) ", Theme::menu_item())
            };
            ListItem::new(Line::from(vec![Span::styled(marker, style), Span::styled(option.label(), style)]))
        })
        .collect();

    let hint = ListItem::new(Line::from(""));
    let keys = ListItem::new(Line::from(Span::styled("↑/↓ select  Tab switch", Theme::hint())));
    let list = List::new(items.into_iter().chain([hint, keys])).block(block);
    frame.render_widget(list, area);
}
