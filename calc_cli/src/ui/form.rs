//! Editable input form for the design handlers.
//!
//! ↑/↓ move between fields, typing edits text and number fields, ←/→ cycle
//! choice fields, Enter submits and Ctrl+P asks for a report.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use calc_core::{CalcError, CalcResult};

use crate::surface::Surface;
use crate::ui::theme::Theme;

const LABEL_WIDTH: usize = 22;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    Number,
    Choice { options: Vec<String>, index: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Input field name, used in error messages
    pub key: &'static str,
    pub label: &'static str,
    pub unit: &'static str,
    pub text: String,
    pub kind: FieldKind,
}

impl Field {
    pub fn text(key: &'static str, label: &'static str, value: &str) -> Self {
        Self {
            key,
            label,
            unit: "",
            text: value.to_string(),
            kind: FieldKind::Text,
        }
    }

    pub fn number(key: &'static str, label: &'static str, unit: &'static str, value: f64) -> Self {
        Self {
            key,
            label,
            unit,
            text: format_number(value),
            kind: FieldKind::Number,
        }
    }

    pub fn choice(key: &'static str, label: &'static str, options: Vec<String>, index: usize) -> Self {
        let index = index.min(options.len().saturating_sub(1));
        Self {
            key,
            label,
            unit: "",
            text: options.get(index).cloned().unwrap_or_default(),
            kind: FieldKind::Choice { options, index },
        }
    }

    fn cycle(&mut self, forward: bool) {
        if let FieldKind::Choice { options, index } = &mut self.kind {
            if options.is_empty() {
                return;
            }
            *index = if forward {
                (*index + 1) % options.len()
            } else {
                (*index + options.len() - 1) % options.len()
            };
            self.text = options[*index].clone();
        }
    }
}

/// What a key press asks the owning handler to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    None,
    Submit,
    Export,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    pub fields: Vec<Field>,
    pub selected: usize,
}

impl Form {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields, selected: 0 }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('p') => FormAction::Export,
                _ => FormAction::None,
            };
        }

        let len = self.fields.len();
        if len == 0 {
            return FormAction::None;
        }

        match key.code {
            KeyCode::Enter => return FormAction::Submit,
            KeyCode::Up => self.selected = (self.selected + len - 1) % len,
            KeyCode::Down => self.selected = (self.selected + 1) % len,
            KeyCode::Left => self.fields[self.selected].cycle(false),
            KeyCode::Right => self.fields[self.selected].cycle(true),
            KeyCode::Backspace => {
                let field = &mut self.fields[self.selected];
                if !matches!(field.kind, FieldKind::Choice { .. }) {
                    field.text.pop();
                }
            }
            KeyCode::Char(c) => {
                let field = &mut self.fields[self.selected];
                match field.kind {
                    FieldKind::Text => field.text.push(c),
                    FieldKind::Number if c.is_ascii_digit() || c == '.' || c == '-' => field.text.push(c),
                    FieldKind::Number => {}
                    FieldKind::Choice { .. } if c == ' ' => field.cycle(true),
                    FieldKind::Choice { .. } => {}
                }
            }
            _ => {}
        }
        FormAction::None
    }

    pub fn field(&self, key: &str) -> CalcResult<&Field> {
        self.fields
            .iter()
            .find(|f| f.key == key)
            .ok_or_else(|| CalcError::missing_field(key))
    }

    pub fn text(&self, key: &str) -> CalcResult<String> {
        Ok(self.field(key)?.text.trim().to_string())
    }

    pub fn number(&self, key: &str) -> CalcResult<f64> {
        let field = self.field(key)?;
        let text = field.text.trim();
        if text.is_empty() {
            return Err(CalcError::missing_field(key));
        }
        text.parse::<f64>()
            .map_err(|_| CalcError::invalid_input(key, text, "Not a number"))
    }

    /// Selected option index of a choice field
    pub fn choice(&self, key: &str) -> CalcResult<usize> {
        match self.field(key)?.kind {
            FieldKind::Choice { index, .. } => Ok(index),
            _ => Err(CalcError::Internal {
                message: format!("Field '{}' is not a choice", key),
            }),
        }
    }

    /// Draw the form; the cursor follows the selected field when `focused`
    pub fn render(&self, surface: &mut Surface, area: Rect, title: &str, focused: bool) {
        let block = Block::default()
            .title(format!(" {} ", title))
            .title_style(Theme::title())
            .borders(Borders::ALL)
            .border_type(Theme::border_type(focused))
            .border_style(if focused { Theme::border_focused() } else { Theme::border() });
        let inner = block.inner(area);
        surface.render_widget(block, area);

        let lines: Vec<Line> = self
            .fields
            .iter()
            .enumerate()
            .map(|(i, field)| {
                let selected = i == self.selected;
                let value = match field.kind {
                    FieldKind::Choice { .. } => format!("‹ {} ›", field.text),
                    _ => field.text.clone(),
                };
                Line::from(vec![
                    Span::styled(format!("{:<width$}", field.label, width = LABEL_WIDTH), Theme::label()),
                    Span::styled(value, if selected && focused { Theme::field_selected() } else { Theme::value() }),
                    Span::styled(format!(" {}", field.unit), Theme::unit()),
                ])
            })
            .collect();

        let hint = Line::from(Span::styled("Enter calculate  Ctrl+P export PDF", Theme::hint()));
        let text: Vec<Line> = lines.into_iter().chain([Line::from(""), hint]).collect();
        surface.render_widget(Paragraph::new(text), inner);

        if focused {
            if let Some(field) = self.fields.get(self.selected) {
                if !matches!(field.kind, FieldKind::Choice { .. }) && (self.selected as u16) < inner.height {
                    let x = inner.x + (LABEL_WIDTH + field.text.chars().count()) as u16;
                    surface.set_cursor(x.min(inner.right().saturating_sub(1)), inner.y + self.selected as u16);
                }
            }
        }
    }
}

/// Shortest representation without trailing zeros
pub fn format_number(value: f64) -> String {
    let text = format!("{:.3}", value);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn sample() -> Form {
        Form::new(vec![
            Field::text("label", "Label", "B1"),
            Field::number("width_mm", "Width", "mm", 300.0),
            Field::choice("grade", "Grade", vec!["C30".into(), "C35".into(), "C40".into()], 1),
        ])
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(300.0), "300");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(12.5), "12.5");
    }

    #[test]
    fn test_navigation_wraps() {
        let mut form = sample();
        form.handle_key(key(KeyCode::Up));
        assert_eq!(form.selected, 2);
        form.handle_key(key(KeyCode::Down));
        assert_eq!(form.selected, 0);
    }

    #[test]
    fn test_number_field_filters_characters() {
        let mut form = sample();
        form.handle_key(key(KeyCode::Down));
        form.handle_key(key(KeyCode::Backspace));
        form.handle_key(key(KeyCode::Char('x')));
        form.handle_key(key(KeyCode::Char('5')));
        assert_eq!(form.number("width_mm").unwrap(), 305.0);
    }

    #[test]
    fn test_choice_cycles() {
        let mut form = sample();
        form.selected = 2;
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.choice("grade").unwrap(), 2);
        form.handle_key(key(KeyCode::Right));
        assert_eq!(form.choice("grade").unwrap(), 0);
        assert_eq!(form.text("grade").unwrap(), "C30");
        form.handle_key(key(KeyCode::Left));
        assert_eq!(form.text("grade").unwrap(), "C40");
    }

    #[test]
    fn test_actions() {
        let mut form = sample();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormAction::Submit);
        assert_eq!(
            form.handle_key(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL)),
            FormAction::Export
        );
        // Ctrl+P does not type into the text field
        assert_eq!(form.text("label").unwrap(), "B1");
    }

    #[test]
    fn test_number_errors() {
        let mut form = sample();
        form.fields[1].text = "3.0.0".to_string();
        let err = form.number("width_mm").unwrap_err();
        assert!(err.is_input_error());

        form.fields[1].text.clear();
        assert_eq!(form.number("width_mm").unwrap_err().error_code(), "MISSING_FIELD");
        assert!(form.number("nope").is_err());
    }
}
