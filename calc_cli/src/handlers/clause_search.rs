use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

use calc_core::clauses::{highlight_ranges, Query};
use calc_core::menu::Handler;
use calc_core::{ClauseIndex, SearchHit};

use crate::surface::Surface;
use crate::ui::theme::Theme;

/// Live search over the code of practice clauses
pub struct ClauseSearchHandler {
    index: Result<ClauseIndex, String>,
    limit: usize,
    query: String,
    hits: Vec<SearchHit>,
    list_state: ListState,
}

impl ClauseSearchHandler {
    /// `index` is the loaded clause index, or why none is available
    pub fn new(index: Result<ClauseIndex, String>, limit: usize) -> Self {
        Self {
            index,
            limit,
            query: String::new(),
            hits: Vec::new(),
            list_state: ListState::default(),
        }
    }

    fn search(&mut self) {
        self.hits = match &self.index {
            Ok(index) => index.search(&self.query, self.limit),
            Err(_) => Vec::new(),
        };
        self.list_state.select(if self.hits.is_empty() { None } else { Some(0) });
    }

    fn move_selection(&mut self, forward: bool) {
        if self.hits.is_empty() {
            return;
        }
        let last = self.hits.len() - 1;
        let current = self.list_state.selected().unwrap_or(0);
        let next = if forward { (current + 1).min(last) } else { current.saturating_sub(1) };
        self.list_state.select(Some(next));
    }

    fn render_query(&self, surface: &mut Surface, area: Rect) {
        let focused = surface.is_focused();
        let block = Block::default()
            .title(" Search clauses (number or keywords) ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_type(Theme::border_type(focused))
            .border_style(if focused { Theme::border_focused() } else { Theme::border() });
        let inner = block.inner(area);
        surface.render_widget(block, area);

        let line = Line::from(vec![
            Span::styled("❯ ", Style::default().fg(Theme::ACCENT)),
            Span::styled(self.query.clone(), Theme::value()),
        ]);
        surface.render_widget(Paragraph::new(line), inner);
        if focused && inner.height > 0 {
            let x = inner.x + 2 + self.query.chars().count() as u16;
            surface.set_cursor(x.min(inner.right().saturating_sub(1)), inner.y);
        }
    }

    fn render_hits(&mut self, surface: &mut Surface, area: Rect) {
        let title = match (&self.index, self.query.trim().is_empty()) {
            (Ok(index), true) => format!(" {} clauses in {} ", index.len(), index.source),
            (Ok(_), false) => format!(" {} matches ", self.hits.len()),
            (Err(_), _) => " No clause index ".to_string(),
        };
        let block = Block::default()
            .title(title)
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let items: Vec<ListItem> = self
            .hits
            .iter()
            .map(|hit| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<10}", hit.number), Theme::menu_selected()),
                    Span::styled(hit.title.clone(), Theme::value()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(Theme::field_selected())
            .highlight_symbol("▶ ");
        surface.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn render_detail(&self, surface: &mut Surface, area: Rect) {
        let block = Block::default()
            .title(" Clause ")
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_style(Theme::border());

        let lines: Vec<Line> = match (&self.index, self.selected_clause()) {
            (Err(reason), _) => vec![
                Line::from(Span::styled(reason.clone(), Theme::note())),
                Line::from(""),
                Line::from(Span::styled(
                    "Set [clauses] source in the config file to a code PDF, text file or clause-extract JSON index.",
                    Theme::hint(),
                )),
            ],
            (Ok(_), None) if self.query.trim().is_empty() => vec![Line::from(Span::styled(
                "Type a clause number such as 6.1.2.5, or keywords such as \"shear links\".",
                Theme::hint(),
            ))],
            (Ok(_), None) => vec![Line::from(Span::styled("No clause matches every term.", Theme::hint()))],
            (Ok(index), Some(hit)) => {
                let terms = Query::parse(&self.query).highlight_terms();
                let mut lines = vec![Line::from(Span::styled(
                    format!("{} {}", hit.number, hit.title),
                    Theme::title(),
                ))];
                lines.push(Line::from(""));
                if let Some(clause) = index.clauses().get(hit.clause_index) {
                    lines.extend(clause.body.lines().map(|l| highlighted(l, &terms)));
                }
                lines
            }
        };

        surface.render_widget(Paragraph::new(lines).block(block).wrap(Wrap { trim: false }), area);
    }

    fn selected_clause(&self) -> Option<&SearchHit> {
        self.list_state.selected().and_then(|i| self.hits.get(i))
    }
}

impl Handler<Surface, anyhow::Error> for ClauseSearchHandler {
    fn render(&mut self, surface: &mut Surface) -> Result<()> {
        if let Some(key) = surface.take_key() {
            let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
            match key.code {
                KeyCode::Char('u') if ctrl => {
                    self.query.clear();
                    self.search();
                }
                KeyCode::Char(c) if !ctrl => {
                    self.query.push(c);
                    self.search();
                }
                KeyCode::Backspace => {
                    self.query.pop();
                    self.search();
                }
                KeyCode::Up => self.move_selection(false),
                KeyCode::Down => self.move_selection(true),
                _ => {}
            }
        }

        super::clear(surface);
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(3)])
            .split(surface.area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[1]);

        self.render_query(surface, rows[0]);
        self.render_hits(surface, columns[0]);
        self.render_detail(surface, columns[1]);
        Ok(())
    }
}

/// Line with every occurrence of `terms` highlighted
fn highlighted(text: &str, terms: &[String]) -> Line<'static> {
    let mut spans = Vec::new();
    let mut pos = 0;
    for range in highlight_ranges(text, terms) {
        if range.start > pos {
            spans.push(Span::styled(text[pos..range.start].to_string(), Theme::value()));
        }
        spans.push(Span::styled(text[range.clone()].to_string(), Theme::highlight()));
        pos = range.end;
    }
    if pos < text.len() {
        spans.push(Span::styled(text[pos..].to_string(), Theme::value()));
    }
    Line::from(spans)
}
