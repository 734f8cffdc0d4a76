use anyhow::{Context, Result};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use calc_core::calculations::bending::{self, BendingInput, BendingResult};
use calc_core::materials::{BarSize, ConcreteGrade, RebarGrade};
use calc_core::menu::Handler;
use calc_core::pdf::render_bending_pdf;
use calc_core::CalcResult;

use crate::config::ReportConfig;
use crate::surface::Surface;
use crate::ui::form::{Field, Form, FormAction};
use crate::ui::theme::Theme;

const FORM_WIDTH: u16 = 50;

/// Beam bending design: section form on the left, design on the right
pub struct BendingHandler {
    form: Form,
    outcome: CalcResult<BendingResult>,
    report: ReportConfig,
}

impl BendingHandler {
    pub fn new(report: ReportConfig) -> Self {
        let form = input_form(&BendingInput::default());
        let outcome = read_input(&form).and_then(|input| bending::calculate(&input));
        Self { form, outcome, report }
    }

    fn recalculate(&mut self) {
        self.outcome = read_input(&self.form).and_then(|input| bending::calculate(&input));
        if let Err(e) = &self.outcome {
            tracing::debug!(error = %e, "bending input rejected");
        }
    }

    fn export(&self) -> Result<std::path::PathBuf> {
        let input = read_input(&self.form).context("Cannot export: fix the input first")?;
        let result = bending::calculate(&input).context("Cannot export: design failed")?;
        let bytes = render_bending_pdf(&input, &result, &self.report.engineer, &self.report.job_id)?;
        super::write_report(&self.report.output_dir, &input.label, "bending", &bytes)
    }
}

impl Handler<Surface, anyhow::Error> for BendingHandler {
    fn render(&mut self, surface: &mut Surface) -> Result<()> {
        let focused = surface.is_focused();
        if let Some(key) = surface.take_key() {
            match self.form.handle_key(key) {
                FormAction::Submit => self.recalculate(),
                FormAction::Export => {
                    let path = self.export()?;
                    surface.notify(format!("Report saved to {}", path.display()));
                }
                FormAction::None => {}
            }
        }

        super::clear(surface);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(FORM_WIDTH), Constraint::Min(20)])
            .split(surface.area);

        self.form.render(surface, chunks[0], "Beam Bending Input", focused);
        surface.render_widget(results_view(&self.outcome), chunks[1]);
        Ok(())
    }
}

fn input_form(input: &BendingInput) -> Form {
    let concrete: Vec<String> = ConcreteGrade::ALL.iter().map(|g| g.display_name()).collect();
    let concrete_index = ConcreteGrade::ALL.iter().position(|g| *g == input.concrete).unwrap_or(0);
    let rebar: Vec<String> = RebarGrade::ALL.iter().map(|g| g.display_name().to_string()).collect();
    let rebar_index = RebarGrade::ALL.iter().position(|g| *g == input.rebar).unwrap_or(0);
    let bars: Vec<String> = std::iter::once("Auto".to_string())
        .chain(BarSize::MAIN_BARS.iter().map(|b| format!("{} mm", b)))
        .collect();
    let bar_index = input
        .bar_size
        .and_then(|size| BarSize::MAIN_BARS.iter().position(|b| *b == size))
        .map(|i| i + 1)
        .unwrap_or(0);

    Form::new(vec![
        Field::text("label", "Label", &input.label),
        Field::number("width_mm", "Width b", "mm", input.width_mm),
        Field::number("overall_depth_mm", "Overall depth h", "mm", input.overall_depth_mm),
        Field::number("effective_depth_mm", "Effective depth d", "mm", input.effective_depth_mm),
        Field::number("compression_depth_mm", "Top steel depth d'", "mm", input.compression_depth_mm),
        Field::number("moment_knm", "Design moment M", "kNm", input.moment_knm),
        Field::choice("concrete", "Concrete grade", concrete, concrete_index),
        Field::choice("rebar", "Steel grade", rebar, rebar_index),
        Field::number("redistribution_pct", "Redistribution", "%", input.redistribution_pct),
        Field::choice("bar_size", "Bar size", bars, bar_index),
    ])
}

fn read_input(form: &Form) -> CalcResult<BendingInput> {
    let bar_choice = form.choice("bar_size")?;
    Ok(BendingInput {
        label: form.text("label")?,
        width_mm: form.number("width_mm")?,
        overall_depth_mm: form.number("overall_depth_mm")?,
        effective_depth_mm: form.number("effective_depth_mm")?,
        compression_depth_mm: form.number("compression_depth_mm")?,
        moment_knm: form.number("moment_knm")?,
        concrete: ConcreteGrade::ALL[form.choice("concrete")?.min(ConcreteGrade::ALL.len() - 1)],
        rebar: RebarGrade::ALL[form.choice("rebar")?.min(RebarGrade::ALL.len() - 1)],
        redistribution_pct: form.number("redistribution_pct")?,
        bar_size: bar_choice.checked_sub(1).and_then(|i| BarSize::MAIN_BARS.get(i).copied()),
    })
}

fn results_view(outcome: &CalcResult<BendingResult>) -> Paragraph<'static> {
    let block = Block::default()
        .title(" Design (cl. 6.1.2.4) ")
        .title_style(Theme::title())
        .borders(Borders::ALL)
        .border_style(Theme::border());

    let lines = match outcome {
        Err(e) => vec![
            Line::from(Span::styled("Input rejected", Theme::fail())),
            Line::from(""),
            Line::from(Span::styled(e.to_string(), Theme::note())),
        ],
        Ok(r) => {
            let mut lines = vec![
                row("K", format!("{:.4}", r.k)),
                row("K'", format!("{:.4}", r.k_prime)),
                row("βb", format!("{:.2}", r.beta_b)),
                row("Lever arm z", format!("{:.1} mm", r.lever_arm_mm)),
                row("Neutral axis x", format!("{:.1} mm (limit {:.1})", r.neutral_axis_mm, r.neutral_axis_limit_mm)),
                Line::from(""),
                row("As required", format!("{:.0} mm²", r.tension_steel_required_mm2)),
                row("As' required", format!("{:.0} mm²", r.compression_steel_required_mm2)),
                row("As min / max", format!("{:.0} / {:.0} mm²", r.min_steel_mm2, r.max_steel_mm2)),
                row(
                    "Bottom bars",
                    format!("{} ({:.0} mm²)", r.tension_bars, r.tension_bars.area().value()),
                ),
            ];
            if let Some(top) = r.compression_bars {
                lines.push(row("Top bars", format!("{} ({:.0} mm²)", top, top.area().value())));
                lines.push(row("fsc", format!("{:.0} MPa", r.compression_steel_stress_mpa)));
            }
            lines.push(row("Moment capacity", format!("{:.1} kNm", r.moment_capacity_knm)));
            lines.push(Line::from(""));
            lines.push(if r.passes() {
                Line::from(Span::styled(format!("PASS  {}", r.summary()), Theme::pass()))
            } else {
                Line::from(Span::styled(format!("FAIL  {}", r.summary()), Theme::fail()))
            });
            lines.extend(r.notes.iter().map(|n| Line::from(Span::styled(format!("• {}", n), Theme::note()))));
            lines
        }
    };

    Paragraph::new(lines).block(block).wrap(Wrap { trim: false })
}

fn row(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:<18}", label), Theme::label()),
        Span::styled(value, Theme::value()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::layout::Rect;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn render_with(handler: &mut BendingHandler, key: Option<KeyEvent>) -> (Result<()>, Surface) {
        let mut surface = Surface::new(Rect::new(0, 0, 110, 24), key);
        let result = handler.render(&mut surface);
        (result, surface)
    }

    #[test]
    fn test_form_matches_default_input() {
        let form = input_form(&BendingInput::default());
        assert_eq!(read_input(&form).unwrap(), BendingInput::default());
    }

    #[test]
    fn test_initial_render_shows_design() {
        let mut handler = BendingHandler::new(ReportConfig::default());
        let (result, surface) = render_with(&mut handler, None);
        result.unwrap();
        let text = surface.text();
        assert!(text.contains("Beam Bending Input"));
        assert!(text.contains("As required"));
        assert!(text.contains("PASS"));
    }

    #[test]
    fn test_edit_and_recalculate() {
        let mut handler = BendingHandler::new(ReportConfig::default());
        // move to the moment field and replace 300 with 500
        for _ in 0..5 {
            render_with(&mut handler, Some(press(KeyCode::Down))).0.unwrap();
        }
        for _ in 0..3 {
            render_with(&mut handler, Some(press(KeyCode::Backspace))).0.unwrap();
        }
        for c in ['5', '0', '0'] {
            render_with(&mut handler, Some(press(KeyCode::Char(c)))).0.unwrap();
        }
        render_with(&mut handler, Some(press(KeyCode::Enter))).0.unwrap();

        let result = handler.outcome.as_ref().unwrap();
        let expected = bending::calculate(&BendingInput {
            moment_knm: 500.0,
            ..BendingInput::default()
        })
        .unwrap();
        assert_eq!(*result, expected);
    }

    #[test]
    fn test_invalid_input_stays_in_pane() {
        let mut handler = BendingHandler::new(ReportConfig::default());
        handler.form.fields[1].text.clear();
        let (result, surface) = render_with(&mut handler, Some(press(KeyCode::Enter)));
        assert!(result.is_ok());
        assert!(handler.outcome.is_err());
        assert!(surface.text().contains("Input rejected"));
    }

    #[test]
    fn test_export_error_propagates() {
        let mut handler = BendingHandler::new(ReportConfig::default());
        handler.form.fields[1].text = "-5".to_string();
        let (result, _) = render_with(&mut handler, Some(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL)));
        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("Cannot export"));
    }
}
