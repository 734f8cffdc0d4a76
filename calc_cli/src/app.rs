//! Application state and the per-cycle render.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use tracing::{debug, warn};

use calc_core::menu::{Dispatcher, MenuOption, PageConfig};

use crate::surface::Surface;
use crate::ui::{self, layout, sidebar, status_bar};

/// Handler dispatcher as used by the terminal host
pub type AppDispatcher = Dispatcher<'static, Surface, anyhow::Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Sidebar,
    Content,
}

/// Status bar message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Info(String),
    Error(String),
}

pub struct App {
    pub page: PageConfig,
    pub selected: MenuOption,
    pub focus: Focus,
    pub status: Status,
    pub should_quit: bool,
    dispatcher: AppDispatcher,
}

impl App {
    /// `page` is fixed for the life of the process
    pub fn new(page: PageConfig, dispatcher: AppDispatcher) -> Self {
        Self {
            page,
            selected: MenuOption::default(),
            focus: Focus::Sidebar,
            status: Status::Ready,
            should_quit: false,
            dispatcher,
        }
    }

    pub fn with_selected(mut self, option: MenuOption) -> Self {
        self.selected = option;
        self
    }

    /// Apply global keys; returns the key if it belongs to the content pane.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<KeyEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match (self.focus, key.code) {
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => {
                self.focus = match self.focus {
                    Focus::Sidebar => Focus::Content,
                    Focus::Content => Focus::Sidebar,
                };
                None
            }
            (Focus::Content, KeyCode::Esc) => {
                self.focus = Focus::Sidebar;
                None
            }
            (Focus::Content, _) => Some(key),
            (Focus::Sidebar, KeyCode::Up | KeyCode::Char('k')) => {
                self.select(self.selected.previous());
                None
            }
            (Focus::Sidebar, KeyCode::Down | KeyCode::Char('j')) => {
                self.select(self.selected.next());
                None
            }
            (Focus::Sidebar, KeyCode::Enter | KeyCode::Right) => {
                self.focus = Focus::Content;
                None
            }
            (Focus::Sidebar, KeyCode::Char('q')) => {
                self.should_quit = true;
                None
            }
            (Focus::Sidebar, _) => None,
        }
    }

    fn select(&mut self, option: MenuOption) {
        if option != self.selected {
            debug!(option = %option, "menu selection changed");
            self.selected = option;
            self.status = Status::Ready;
        }
    }

    /// Draw one cycle: chrome, then the selected handler in the content pane.
    pub fn render(&mut self, frame: &mut Frame, key: Option<KeyEvent>) {
        let app_layout = layout::compute_layout(frame.area(), self.page.layout);

        let mut surface = Surface::new(app_layout.content, key).focused(self.focus == Focus::Content);
        match self.dispatcher.dispatch(self.selected, &mut surface) {
            Ok(()) => {
                if let Some(notice) = surface.take_notice() {
                    self.status = Status::Info(notice);
                }
            }
            Err(e) => {
                warn!(option = %self.selected, error = %format!("{:#}", e), "handler failed");
                self.status = Status::Error(format!("{:#}", e));
            }
        }
        frame.buffer_mut().merge(&surface.buffer);
        if self.focus == Focus::Content {
            if let Some(position) = surface.cursor() {
                frame.set_cursor_position(position);
            }
        }

        ui::render_header(frame, app_layout.header, &self.page.page_title);
        sidebar::render(frame, app_layout.sidebar, self.selected, self.focus == Focus::Sidebar);
        status_bar::render(frame, app_layout.status_bar, &self.status, self.focus);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::buffer_text;
    use calc_core::menu::LayoutMode;
    use ratatui::backend::TestBackend;
    use ratatui::widgets::Paragraph;
    use ratatui::Terminal;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn labelled(text: &'static str) -> impl FnMut(&mut Surface) -> anyhow::Result<()> {
        move |surface: &mut Surface| {
            let area = surface.area;
            surface.render_widget(Paragraph::new(text), area);
            Ok(())
        }
    }

    fn test_app() -> App {
        let dispatcher = Dispatcher::new(labelled("BENDING PANE"), labelled("SHEAR PANE"), labelled("CLAUSE PANE"));
        App::new(PageConfig::new("Test Title", LayoutMode::Wide), dispatcher)
    }

    fn draw(app: &mut App, key: Option<KeyEvent>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
        terminal.draw(|frame| app.render(frame, key)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_renders_chrome_and_default_handler() {
        let mut app = test_app();
        let screen = draw(&mut app, None);
        assert!(screen.contains("Test Title"));
        assert!(screen.contains("Main Menu"));
        assert!(screen.contains("(•) Beam Bending design"));
        assert!(screen.contains("( ) Beam Shear design"));
        assert!(screen.contains("( ) COP Concrete Clauses Search"));
        assert!(screen.contains("BENDING PANE"));
        assert!(!screen.contains("SHEAR PANE"));
    }

    #[test]
    fn test_sidebar_selection_routes_dispatch() {
        let mut app = test_app();
        assert_eq!(app.handle_key(press(KeyCode::Down)), None);
        assert_eq!(app.selected, MenuOption::BeamShear);
        let screen = draw(&mut app, None);
        assert!(screen.contains("SHEAR PANE"));
        assert!(screen.contains("(•) Beam Shear design"));

        app.handle_key(press(KeyCode::Down));
        app.handle_key(press(KeyCode::Down));
        assert_eq!(app.selected, MenuOption::BeamBending);
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.selected, MenuOption::ClauseSearch);
    }

    #[test]
    fn test_focus_and_key_forwarding() {
        let mut app = test_app();
        // sidebar keeps its own keys
        assert_eq!(app.handle_key(press(KeyCode::Char('x'))), None);
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Content);

        let forwarded = app.handle_key(press(KeyCode::Char('q')));
        assert_eq!(forwarded.map(|k| k.code), Some(KeyCode::Char('q')));
        assert!(!app.should_quit);

        app.handle_key(press(KeyCode::Esc));
        assert_eq!(app.focus, Focus::Sidebar);
        app.handle_key(press(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_content() {
        let mut app = test_app();
        app.focus = Focus::Content;
        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn test_key_reaches_selected_handler() {
        let seen: Rc<RefCell<Vec<KeyCode>>> = Rc::default();
        let record = {
            let seen = Rc::clone(&seen);
            move |surface: &mut Surface| {
                if let Some(key) = surface.take_key() {
                    seen.borrow_mut().push(key.code);
                }
                Ok::<(), anyhow::Error>(())
            }
        };
        let dispatcher = Dispatcher::new(record, labelled("S"), labelled("C"));
        let mut app = App::new(PageConfig::default(), dispatcher);
        draw(&mut app, Some(press(KeyCode::Char('7'))));
        draw(&mut app, None);
        assert_eq!(*seen.borrow(), vec![KeyCode::Char('7')]);
    }

    #[test]
    fn test_handler_error_shown_in_status_bar() {
        let failing = |_: &mut Surface| Err::<(), anyhow::Error>(anyhow::anyhow!("disk full"));
        let dispatcher = Dispatcher::new(labelled("B"), failing, labelled("C"));
        let mut app = App::new(PageConfig::default(), dispatcher).with_selected(MenuOption::BeamShear);
        let screen = draw(&mut app, None);
        assert_eq!(app.status, Status::Error("disk full".to_string()));
        assert!(screen.contains("Error: disk full"));

        // changing selection clears the error
        app.handle_key(press(KeyCode::Up));
        assert_eq!(app.status, Status::Ready);
    }

    #[test]
    fn test_notice_shown_in_status_bar() {
        let notifying = |surface: &mut Surface| {
            surface.notify("Report saved");
            Ok::<(), anyhow::Error>(())
        };
        let dispatcher = Dispatcher::new(notifying, labelled("S"), labelled("C"));
        let mut app = App::new(PageConfig::default(), dispatcher);
        let screen = draw(&mut app, None);
        assert!(screen.contains("Report saved"));
    }

    #[test]
    fn test_release_events_ignored() {
        let mut app = test_app();
        let mut key = press(KeyCode::Down);
        key.kind = KeyEventKind::Release;
        app.handle_key(key);
        assert_eq!(app.selected, MenuOption::BeamBending);
    }
}
