use anyhow::{Context, Result};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use calc_core::calculations::shear::{self, ShearInput, ShearLinkClass, ShearResult};
use calc_core::materials::{BarSize, ConcreteGrade, RebarGrade};
use calc_core::menu::Handler;
use calc_core::pdf::render_shear_pdf;
use calc_core::{CalcError, CalcResult};

use crate::config::ReportConfig;
use crate::surface::Surface;
use crate::ui::form::{Field, Form, FormAction};
use crate::ui::theme::Theme;

const FORM_WIDTH: u16 = 50;

/// Beam shear design: section and link form, link design beside it
pub struct ShearHandler {
    form: Form,
    outcome: CalcResult<ShearResult>,
    report: ReportConfig,
}

impl ShearHandler {
    pub fn new(report: ReportConfig) -> Self {
        let form = input_form(&ShearInput::default());
        let outcome = read_input(&form).and_then(|input| shear::calculate(&input));
        Self { form, outcome, report }
    }

    fn recalculate(&mut self) {
        self.outcome = read_input(&self.form).and_then(|input| shear::calculate(&input));
    }

    fn export(&self) -> Result<std::path::PathBuf> {
        let input = read_input(&self.form).context("Cannot export: fix the input first")?;
        let result = shear::calculate(&input).context("Cannot export: design failed")?;
        let bytes = render_shear_pdf(&input, &result, &self.report.engineer, &self.report.job_id)?;
        super::write_report(&self.report.output_dir, &input.label, "shear", &bytes)
    }
}

impl Handler<Surface, anyhow::Error> for ShearHandler {
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

        self.form.render(surface, chunks[0], "Beam Shear Input", focused);
        surface.render_widget(results_view(&self.outcome), chunks[1]);
        Ok(())
    }
}

fn input_form(input: &ShearInput) -> Form {
    let concrete: Vec<String> = ConcreteGrade::ALL.iter().map(|g| g.display_name()).collect();
    let concrete_index = ConcreteGrade::ALL.iter().position(|g| *g == input.concrete).unwrap_or(0);
    let grades: Vec<String> = RebarGrade::ALL.iter().map(|g| g.display_name().to_string()).collect();
    let grade_index = RebarGrade::ALL.iter().position(|g| *g == input.link_grade).unwrap_or(0);
    let sizes: Vec<String> = BarSize::LINKS.iter().map(|b| format!("{} mm", b)).collect();
    let size_index = BarSize::LINKS.iter().position(|b| *b == input.link_size).unwrap_or(0);

    Form::new(vec![
        Field::text("label", "Label", &input.label),
        Field::number("width_mm", "Width bv", "mm", input.width_mm),
        Field::number("effective_depth_mm", "Effective depth d", "mm", input.effective_depth_mm),
        Field::number("shear_kn", "Design shear V", "kN", input.shear_kn),
        Field::number("tension_steel_mm2", "Tension steel As", "mm²", input.tension_steel_mm2),
        Field::choice("concrete", "Concrete grade", concrete, concrete_index),
        Field::choice("link_grade", "Link grade", grades, grade_index),
        Field::choice("link_size", "Link size", sizes, size_index),
        Field::number("link_legs", "Link legs", "", f64::from(input.link_legs)),
    ])
}

fn read_input(form: &Form) -> CalcResult<ShearInput> {
    let legs = form.number("link_legs")?;
    if legs.fract() != 0.0 || legs < 0.0 {
        return Err(CalcError::invalid_input(
            "link_legs",
            legs.to_string(),
            "Number of legs must be a whole number",
        ));
    }
    Ok(ShearInput {
        label: form.text("label")?,
        width_mm: form.number("width_mm")?,
        effective_depth_mm: form.number("effective_depth_mm")?,
        shear_kn: form.number("shear_kn")?,
        tension_steel_mm2: form.number("tension_steel_mm2")?,
        concrete: ConcreteGrade::ALL[form.choice("concrete")?.min(ConcreteGrade::ALL.len() - 1)],
        link_grade: RebarGrade::ALL[form.choice("link_grade")?.min(RebarGrade::ALL.len() - 1)],
        link_size: BarSize::LINKS[form.choice("link_size")?.min(BarSize::LINKS.len() - 1)],
        link_legs: legs as u32,
    })
}

fn results_view(outcome: &CalcResult<ShearResult>) -> Paragraph<'static> {
    let block = Block::default()
        .title(" Design (cl. 6.1.2.5) ")
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
            let spacing = r
                .link_spacing_mm
                .map(|s| format!("{:.0} mm (max {:.0})", s, r.max_link_spacing_mm))
                .unwrap_or_else(|| "-".to_string());
            let class_style = match r.link_class {
                ShearLinkClass::SectionInadequate => Theme::fail(),
                _ => Theme::value(),
            };
            let mut lines = vec![
                row("v", format!("{:.2} MPa", r.shear_stress_mpa)),
                row("vc", format!("{:.2} MPa", r.concrete_shear_stress_mpa)),
                row("vr", format!("{:.2} MPa", r.minimum_link_stress_mpa)),
                row("vmax", format!("{:.2} MPa", r.max_shear_stress_mpa)),
                Line::from(""),
                Line::from(vec![
                    Span::styled(format!("{:<18}", "Links"), Theme::label()),
                    Span::styled(r.link_class.display_name(), class_style),
                ]),
                row("Asv/sv required", format!("{:.3} mm²/mm", r.link_area_per_spacing.value())),
                row("Asv provided", format!("{:.0} mm²", r.link_area_mm2)),
                row("Spacing", spacing),
                row("Shear capacity", format!("{:.1} kN", r.shear_capacity_kn)),
                Line::from(""),
            ];
            lines.push(if r.passes() {
                Line::from(Span::styled(format!("PASS  {}", r.links), Theme::pass()))
            } else {
                Line::from(Span::styled(format!("FAIL  {}", r.links), Theme::fail()))
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
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::layout::Rect;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn render_with(handler: &mut ShearHandler, key: Option<KeyEvent>) -> (Result<()>, Surface) {
        let mut surface = Surface::new(Rect::new(0, 0, 110, 24), key).focused(true);
        let result = handler.render(&mut surface);
        (result, surface)
    }

    #[test]
    fn test_form_matches_default_input() {
        let form = input_form(&ShearInput::default());
        assert_eq!(read_input(&form).unwrap(), ShearInput::default());
    }

    #[test]
    fn test_initial_render_shows_links() {
        let mut handler = ShearHandler::new(ReportConfig::default());
        let (result, surface) = render_with(&mut handler, None);
        result.unwrap();
        let text = surface.text();
        assert!(text.contains("Beam Shear Input"));
        assert!(text.contains("Asv/sv required"));
        assert!(surface.cursor().is_some());
    }

    #[test]
    fn test_link_size_choice() {
        let mut handler = ShearHandler::new(ReportConfig::default());
        handler.form.selected = 7;
        render_with(&mut handler, Some(press(KeyCode::Right))).0.unwrap();
        render_with(&mut handler, Some(press(KeyCode::Enter))).0.unwrap();
        assert_eq!(read_input(&handler.form).unwrap().link_size, BarSize::D12);
        assert!(handler.outcome.is_ok());
    }

    #[test]
    fn test_fractional_legs_rejected() {
        let mut handler = ShearHandler::new(ReportConfig::default());
        handler.form.fields[8].text = "2.5".to_string();
        render_with(&mut handler, Some(press(KeyCode::Enter))).0.unwrap();
        let err = handler.outcome.as_ref().unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_export_writes_pdf() {
        let dir = std::env::temp_dir().join(format!("rc_design_shear_{}", std::process::id()));
        let report = ReportConfig {
            engineer: "Test".to_string(),
            job_id: "T-1".to_string(),
            output_dir: dir.clone(),
        };
        let mut handler = ShearHandler::new(report);
        let (result, mut surface) =
            render_with(&mut handler, Some(KeyEvent::new(KeyCode::Char('p'), KeyModifiers::CONTROL)));
        result.unwrap();
        let notice = surface.take_notice().unwrap();
        assert!(notice.contains("B1_shear.pdf"));
        let bytes = std::fs::read(dir.join("B1_shear.pdf")).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        let _ = std::fs::remove_dir_all(dir);
    }
}
