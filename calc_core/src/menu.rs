//! # Main Menu and Dispatcher
//!
//! The application offers a fixed, ordered set of three tools. The host
//! renders them as a radio list, and once per interaction cycle asks the
//! [`Dispatcher`] to render whichever tool is selected.
//!
//! Handlers are injected rather than looked up by name. The dispatcher never
//! inspects what a handler does or returns: an error from a handler comes
//! back from [`Dispatcher::dispatch`] untouched.
//!
//! ## Example
//!
//! ```rust
//! use calc_core::menu::{Dispatcher, MenuOption};
//!
//! let mut log: Vec<&'static str> = Vec::new();
//! let mut dispatcher: Dispatcher<Vec<&'static str>, ()> = Dispatcher::new(
//!     |out: &mut Vec<&'static str>| { out.push("bending"); Ok(()) },
//!     |out: &mut Vec<&'static str>| { out.push("shear"); Ok(()) },
//!     |out: &mut Vec<&'static str>| { out.push("clauses"); Ok(()) },
//! );
//!
//! dispatcher.dispatch(MenuOption::BeamShear, &mut log).unwrap();
//! assert_eq!(log, vec!["shear"]);
//!
//! // Labels arriving as text from outside are matched exactly
//! assert!(!dispatcher.dispatch_label("Column design", &mut log).unwrap());
//! assert_eq!(log.len(), 1);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Title of the sidebar radio group
pub const MENU_TITLE: &str = "Main Menu";

/// Default page title shown in the host's header
pub const DEFAULT_PAGE_TITLE: &str = "Reinforced Concrete Design Tools";

/// One entry of the main menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MenuOption {
    #[default]
    BeamBending,
    BeamShear,
    ClauseSearch,
}

impl MenuOption {
    /// All options in menu order
    pub const ALL: [MenuOption; 3] = [MenuOption::BeamBending, MenuOption::BeamShear, MenuOption::ClauseSearch];

    /// Label shown to the user
    pub fn label(&self) -> &'static str {
        match self {
            MenuOption::BeamBending => "Beam Bending design",
            MenuOption::BeamShear => "Beam Shear design",
            MenuOption::ClauseSearch => "COP Concrete Clauses Search",
        }
    }

    /// Exact label match, in menu order
    pub fn from_label(label: &str) -> Option<MenuOption> {
        Self::ALL.iter().copied().find(|option| option.label() == label)
    }

    /// Position in the menu (0-based)
    pub fn index(&self) -> usize {
        match self {
            MenuOption::BeamBending => 0,
            MenuOption::BeamShear => 1,
            MenuOption::ClauseSearch => 2,
        }
    }

    /// Following option, wrapping to the first
    pub fn next(&self) -> MenuOption {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Preceding option, wrapping to the last
    pub fn previous(&self) -> MenuOption {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for MenuOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Page layout mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Content uses the full width beside the sidebar
    #[default]
    Wide,
    /// Content is kept to a centered column
    Centered,
}

/// Process-wide page settings, applied once before the first render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageConfig {
    #[serde(default = "default_page_title")]
    pub page_title: String,
    #[serde(default)]
    pub layout: LayoutMode,
}

fn default_page_title() -> String {
    DEFAULT_PAGE_TITLE.to_string()
}

impl Default for PageConfig {
    fn default() -> Self {
        PageConfig {
            page_title: default_page_title(),
            layout: LayoutMode::default(),
        }
    }
}

impl PageConfig {
    pub fn new(page_title: impl Into<String>, layout: LayoutMode) -> Self {
        PageConfig {
            page_title: page_title.into(),
            layout,
        }
    }
}

/// A unit of behavior bound to one menu option.
///
/// `Ctx` is whatever output channel the host provides (a terminal frame, a
/// writer, a test recorder). Failures are the handler's own error type `E`.
pub trait Handler<Ctx: ?Sized, E> {
    /// Produce this handler's output
    fn render(&mut self, ctx: &mut Ctx) -> Result<(), E>;
}

impl<Ctx: ?Sized, E, F> Handler<Ctx, E> for F
where
    F: FnMut(&mut Ctx) -> Result<(), E>,
{
    fn render(&mut self, ctx: &mut Ctx) -> Result<(), E> {
        self(ctx)
    }
}

/// Maps the selected [`MenuOption`] to exactly one handler invocation.
pub struct Dispatcher<'h, Ctx: ?Sized, E> {
    bending: Box<dyn Handler<Ctx, E> + 'h>,
    shear: Box<dyn Handler<Ctx, E> + 'h>,
    clause_search: Box<dyn Handler<Ctx, E> + 'h>,
}

impl<'h, Ctx: ?Sized, E> Dispatcher<'h, Ctx, E> {
    /// Bind one handler to each menu option
    pub fn new(
        bending: impl Handler<Ctx, E> + 'h,
        shear: impl Handler<Ctx, E> + 'h,
        clause_search: impl Handler<Ctx, E> + 'h,
    ) -> Self {
        Dispatcher {
            bending: Box::new(bending),
            shear: Box::new(shear),
            clause_search: Box::new(clause_search),
        }
    }

    /// Invoke the handler bound to `option` and return its result unchanged.
    pub fn dispatch(&mut self, option: MenuOption, ctx: &mut Ctx) -> Result<(), E> {
        trace!(option = %option, "dispatch");
        self.handler_mut(option).render(ctx)
    }

    /// Dispatch by display label.
    ///
    /// Returns `Ok(false)` without invoking anything when the label is not one
    /// of the menu's labels.
    pub fn dispatch_label(&mut self, label: &str, ctx: &mut Ctx) -> Result<bool, E> {
        match MenuOption::from_label(label) {
            Some(option) => self.dispatch(option, ctx).map(|()| true),
            None => {
                debug!(label, "no menu option matches label");
                Ok(false)
            }
        }
    }

    fn handler_mut(&mut self, option: MenuOption) -> &mut (dyn Handler<Ctx, E> + 'h) {
        match option {
            MenuOption::BeamBending => self.bending.as_mut(),
            MenuOption::BeamShear => self.shear.as_mut(),
            MenuOption::ClauseSearch => self.clause_search.as_mut(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records which handlers ran
    #[derive(Default)]
    struct Calls {
        bending: usize,
        shear: usize,
        clause_search: usize,
    }

    impl Calls {
        fn total(&self) -> usize {
            self.bending + self.shear + self.clause_search
        }
    }

    fn counting_dispatcher<'h>() -> Dispatcher<'h, Calls, String> {
        Dispatcher::new(
            |c: &mut Calls| {
                c.bending += 1;
                Ok(())
            },
            |c: &mut Calls| {
                c.shear += 1;
                Ok(())
            },
            |c: &mut Calls| {
                c.clause_search += 1;
                Ok(())
            },
        )
    }

    #[test]
    fn test_menu_order_and_labels() {
        let labels: Vec<&str> = MenuOption::ALL.iter().map(|o| o.label()).collect();
        assert_eq!(
            labels,
            vec!["Beam Bending design", "Beam Shear design", "COP Concrete Clauses Search"]
        );
    }

    #[test]
    fn test_from_label_exact_match() {
        for option in MenuOption::ALL {
            assert_eq!(MenuOption::from_label(option.label()), Some(option));
        }
        assert_eq!(MenuOption::from_label("beam shear design"), None);
        assert_eq!(MenuOption::from_label("Beam Shear design "), None);
        assert_eq!(MenuOption::from_label(""), None);
    }

    #[test]
    fn test_each_option_invokes_only_its_handler() {
        for option in MenuOption::ALL {
            let mut dispatcher = counting_dispatcher();
            let mut calls = Calls::default();
            dispatcher.dispatch(option, &mut calls).unwrap();

            assert_eq!(calls.total(), 1);
            let expected = match option {
                MenuOption::BeamBending => calls.bending,
                MenuOption::BeamShear => calls.shear,
                MenuOption::ClauseSearch => calls.clause_search,
            };
            assert_eq!(expected, 1, "{option} did not reach its handler");
        }
    }

    #[test]
    fn test_shear_label_scenario() {
        let mut dispatcher = counting_dispatcher();
        let mut calls = Calls::default();
        assert!(dispatcher.dispatch_label("Beam Shear design", &mut calls).unwrap());
        assert_eq!(calls.shear, 1);
        assert_eq!(calls.bending, 0);
        assert_eq!(calls.clause_search, 0);
    }

    #[test]
    fn test_clause_search_label_scenario() {
        let mut dispatcher = counting_dispatcher();
        let mut calls = Calls::default();
        assert!(dispatcher
            .dispatch_label("COP Concrete Clauses Search", &mut calls)
            .unwrap());
        assert_eq!(calls.clause_search, 1);
        assert_eq!(calls.total(), 1);
    }

    #[test]
    fn test_known_labels_never_error() {
        let mut dispatcher = counting_dispatcher();
        let mut calls = Calls::default();
        for option in MenuOption::ALL {
            let before = calls.total();
            assert!(dispatcher.dispatch_label(option.label(), &mut calls).is_ok());
            assert!(calls.total() - before <= 1);
        }
    }

    #[test]
    fn test_unknown_label_is_silent_noop() {
        let mut dispatcher = counting_dispatcher();
        let mut calls = Calls::default();
        let matched = dispatcher.dispatch_label("Slab design", &mut calls);
        assert_eq!(matched, Ok(false));
        assert_eq!(calls.total(), 0);
    }

    #[test]
    fn test_dispatch_is_not_memoized() {
        let mut dispatcher = counting_dispatcher();
        let mut calls = Calls::default();
        dispatcher.dispatch(MenuOption::BeamBending, &mut calls).unwrap();
        dispatcher.dispatch(MenuOption::BeamBending, &mut calls).unwrap();
        assert_eq!(calls.bending, 2);
        assert_eq!(calls.total(), 2);
    }

    #[test]
    fn test_handler_error_propagates_unchanged() {
        let mut dispatcher: Dispatcher<Calls, String> = Dispatcher::new(
            |_: &mut Calls| Ok(()),
            |_: &mut Calls| Err("shear handler failed".to_string()),
            |_: &mut Calls| Ok(()),
        );
        let mut calls = Calls::default();
        assert_eq!(
            dispatcher.dispatch(MenuOption::BeamShear, &mut calls),
            Err("shear handler failed".to_string())
        );
        assert_eq!(
            dispatcher.dispatch_label("Beam Shear design", &mut calls),
            Err("shear handler failed".to_string())
        );
    }

    #[test]
    fn test_struct_handlers_keep_state() {
        struct Counter(usize);
        impl Handler<Vec<usize>, ()> for Counter {
            fn render(&mut self, out: &mut Vec<usize>) -> Result<(), ()> {
                self.0 += 1;
                out.push(self.0);
                Ok(())
            }
        }

        let mut dispatcher = Dispatcher::new(Counter(0), Counter(100), Counter(200));
        let mut out = Vec::new();
        dispatcher.dispatch(MenuOption::ClauseSearch, &mut out).unwrap();
        dispatcher.dispatch(MenuOption::ClauseSearch, &mut out).unwrap();
        dispatcher.dispatch(MenuOption::BeamBending, &mut out).unwrap();
        assert_eq!(out, vec![201, 202, 1]);
    }

    #[test]
    fn test_option_cycling() {
        assert_eq!(MenuOption::BeamBending.next(), MenuOption::BeamShear);
        assert_eq!(MenuOption::ClauseSearch.next(), MenuOption::BeamBending);
        assert_eq!(MenuOption::BeamBending.previous(), MenuOption::ClauseSearch);
    }

    #[test]
    fn test_page_config_defaults() {
        let config: PageConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.page_title, DEFAULT_PAGE_TITLE);
        assert_eq!(config.layout, LayoutMode::Wide);
        assert_eq!(PageConfig::default().layout, LayoutMode::Wide);

        let centered: PageConfig = serde_json::from_str(r#"{"layout":"centered"}"#).unwrap();
        assert_eq!(centered.layout, LayoutMode::Centered);
    }
}
