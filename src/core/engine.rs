//! # Navigation Engine
//!
//! The state machine behind the console UI. It owns the single `current`
//! page and the history stack, renders pages through the [`Console`] seam,
//! pulls data through the [`DataProvider`] seam, and dispatches the global
//! commands (`b`/`h`/`q`/`r`) ahead of any page-specific input.
//!
//! ```text
//!          ┌──────┐  1        ┌──────────┐  pick n   ┌──────────────┐
//!          │ Home ├──────────▶│ ListAll  ├──────────▶│ ListCountry  │
//!          │      │  2        ├──────────┤  field +  │   (query)    │
//!          │      ├──────────▶│ Search   ├──────────▶│              │
//!          └──────┘           │ Specific │   value   └──────────────┘
//!              ▲              └──────────┘
//!              │    h = clear history + re-enter Home (any state)
//!              │    b = pop history, revisit the popped page
//!              │    r = re-enter the failed transition (error pages)
//!              │    q = farewell + end of run loop
//! ```
//!
//! Handlers never recurse. Each one returns a [`Flow`]: either the next
//! [`Transition`] (state + whether it is a revisit) or `Quit`. Error pages
//! bind the transition to re-enter as a retry descriptor instead of a
//! captured closure, so `r` and `b` are plain data dispatch.

use std::fmt;
use std::io;

use log::{debug, info, warn};
use serde_json::Value;

use crate::api::provider::{DataProvider, FetchStatus};
use crate::console::{Console, DisplayError};
use crate::core::history::{EmptyHistory, HistoryStack};
use crate::core::page::{Options, Page, PageName};
use crate::core::query::{Query, QueryField};

const PROMPT: &str = ": ";
const BASIC_INSTRUCTIONS: &str =
    "Enter **b** to go back, **h** to go to main screen, or **q** to exit the program.";
const FETCH_ERROR_MESSAGE: &str =
    "There was a problem retrieving the necessary response!\nEnter **r** to retry.";
const FAREWELL: &str = "*See you soon!*";
const SINGLE_RESULT_MESSAGE: &str = "Alright! We found everything about the country:";

// ── Flow types ──────────────────────────────────────────────────────────────

/// Which screen to run next.
#[derive(Debug, Clone, PartialEq)]
pub enum State {
    Home,
    ListAll,
    SearchSpecific,
    ListCountry(Query),
}

/// A pending state change. `revisit` is true only when the state is being
/// re-entered via back or retry; it suppresses the history push.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: State,
    pub revisit: bool,
}

impl Transition {
    pub fn fresh(state: State) -> Self {
        Transition { state, revisit: false }
    }

    pub fn revisit(state: State) -> Self {
        Transition { state, revisit: true }
    }
}

/// What a handler decided: keep navigating, or end the run loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Flow {
    Goto(Transition),
    Quit,
}

/// Outcome of checking one input line against the global commands.
enum CommandOutcome {
    /// The command produced a state change (or quit).
    Flow(Flow),
    /// The input was consumed (e.g. `b` with empty history); read again.
    Handled,
    /// Not a command; interpret as page-specific input.
    NotACommand,
}

/// A prompt either yields a page-specific value or gets hijacked by a
/// global command.
enum Prompted<T> {
    Flow(Flow),
    Value(T),
}

// ── Errors ──────────────────────────────────────────────────────────────────

/// Failures that end the run loop. Data-fetch problems never show up here —
/// they become error pages with a retry affordance.
#[derive(Debug)]
pub enum EngineError {
    /// The current page could not be rendered.
    Display(DisplayError),
    /// Reading user input failed (e.g. stdin closed).
    Input(io::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Display(e) => write!(f, "display error: {e}"),
            EngineError::Input(e) => write!(f, "input error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}

impl From<DisplayError> for EngineError {
    fn from(e: DisplayError) -> Self {
        EngineError::Display(e)
    }
}

impl From<io::Error> for EngineError {
    fn from(e: io::Error) -> Self {
        EngineError::Input(e)
    }
}

// ── Engine ──────────────────────────────────────────────────────────────────

pub struct NavigationEngine<P, C> {
    provider: P,
    console: C,
    current: Page,
    history: HistoryStack,
    /// Sorted common names from the last full listing, reused for choice
    /// resolution until the next `ListAll`.
    all_countries: Vec<String>,
}

impl<P: DataProvider, C: Console> NavigationEngine<P, C> {
    pub fn new(provider: P, console: C) -> Self {
        NavigationEngine {
            provider,
            console,
            current: Page::home(),
            history: HistoryStack::new(),
            all_countries: Vec::new(),
        }
    }

    /// The page currently on screen.
    pub fn current(&self) -> &Page {
        &self.current
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    /// Run the interactive loop until the user quits.
    pub fn run(&mut self) -> Result<(), EngineError> {
        let mut transition = Transition::fresh(State::Home);
        loop {
            debug!("transition to {:?} (revisit: {})", transition.state, transition.revisit);
            match self.step(transition)? {
                Flow::Goto(next) => transition = next,
                Flow::Quit => {
                    info!("user quit");
                    return Ok(());
                }
            }
        }
    }

    fn step(&mut self, transition: Transition) -> Result<Flow, EngineError> {
        match transition.state {
            State::Home => self.home(),
            State::ListAll => self.list_all(transition.revisit),
            State::SearchSpecific => self.search_specific(transition.revisit),
            State::ListCountry(query) => self.list_country(query, transition.revisit),
        }
    }

    // ── State handlers ──────────────────────────────────────────────────

    fn home(&mut self) -> Result<Flow, EngineError> {
        self.history.clear();
        self.current = Page::home();
        self.render_page(true)?;
        match self.read_index(self.current.option_count())? {
            Prompted::Flow(flow) => Ok(flow),
            Prompted::Value(1) => Ok(Flow::Goto(Transition::fresh(State::ListAll))),
            Prompted::Value(_) => Ok(Flow::Goto(Transition::fresh(State::SearchSpecific))),
        }
    }

    fn list_all(&mut self, revisit: bool) -> Result<Flow, EngineError> {
        self.leave_current(revisit);

        let records = match self.provider.fetch_all() {
            Ok(records) if !records.is_empty() => records,
            Ok(_) => {
                warn!("full listing came back empty");
                let message = FetchStatus::NotFound.message().to_string();
                return self.no_data(PageName::ListAll, message, State::ListAll);
            }
            Err(e) => {
                warn!("fetch_all failed: {e}");
                return self.no_data(PageName::ListAll, e.to_string(), State::ListAll);
            }
        };

        self.all_countries.clear();
        self.all_countries.extend(
            records
                .iter()
                .filter_map(|record| record.pointer("/name/common").and_then(Value::as_str))
                .map(str::to_string),
        );
        self.all_countries.sort();
        if self.all_countries.is_empty() {
            warn!("no record in the listing carried a common name");
            let message = FetchStatus::NotFound.message().to_string();
            return self.no_data(PageName::ListAll, message, State::ListAll);
        }

        self.current = Page::listing(self.all_countries.clone());
        self.render_page(true)?;
        self.console
            .plain("To retrieve information about a country, enter its serial number.");
        self.print_instructions();

        match self.read_index(self.all_countries.len())? {
            Prompted::Flow(flow) => Ok(flow),
            Prompted::Value(choice) => {
                let target = &self.all_countries[choice - 1];
                info!("picked {target} off the full listing");
                Ok(Flow::Goto(Transition::fresh(State::ListCountry(
                    Query::full_text_name(target),
                ))))
            }
        }
    }

    fn search_specific(&mut self, revisit: bool) -> Result<Flow, EngineError> {
        self.leave_current(revisit);

        self.current = Page::search_menu();
        self.render_page(true)?;
        self.console.plain("Choose one of the options above to continue:");

        let field = match self.read_index(QueryField::ALL.len())? {
            Prompted::Flow(flow) => return Ok(flow),
            Prompted::Value(choice) => QueryField::ALL[choice - 1],
        };
        self.console.plain(&format!(
            "Please enter the {field} for the country you're looking for:"
        ));
        match self.read_text()? {
            Prompted::Flow(flow) => Ok(flow),
            Prompted::Value(value) => Ok(Flow::Goto(Transition::fresh(State::ListCountry(
                Query::new(field, value),
            )))),
        }
    }

    fn list_country(&mut self, query: Query, revisit: bool) -> Result<Flow, EngineError> {
        self.leave_current(revisit);

        let outcome = self.provider.fetch_by_field(query.field, &query.value);
        let mut data = match outcome.data {
            Some(data) if !data.is_empty() => data,
            _ => {
                info!("no data for {query:?} ({:?})", outcome.status);
                let message = outcome.status.message().to_string();
                return self.no_data(PageName::ListCountry, message, State::ListCountry(query));
            }
        };

        let (message, shown) = if data.len() == 1 {
            (SINGLE_RESULT_MESSAGE.to_string(), data.remove(0))
        } else {
            (
                format!("We found {} results for your query:", data.len()),
                Value::Array(data),
            )
        };

        self.current = Page::country(message, shown);
        self.render_page(false)?;
        self.print_instructions();
        self.read_ack(None)
    }

    /// Convert a data-fetch failure into an error page named after the
    /// state that failed, with `retry` bound as the `r` target.
    fn no_data(
        &mut self,
        name: PageName,
        message: String,
        retry: State,
    ) -> Result<Flow, EngineError> {
        self.current = Page::error(name, message);
        self.console.markdown(FETCH_ERROR_MESSAGE);
        self.print_instructions();
        self.read_ack(Some(retry))
    }

    // ── History ─────────────────────────────────────────────────────────

    /// Record the page being transitioned away from, unless this entry is
    /// itself a revisit or the page is already on top of the stack.
    fn leave_current(&mut self, revisit: bool) {
        self.history.append_if_new(&self.current, revisit);
    }

    fn go_back(&mut self, retry: Option<&State>) -> Option<Flow> {
        let popped = match self.history.pop() {
            Ok(page) => page,
            Err(EmptyHistory) => {
                warn!("back requested with empty history");
                return None;
            }
        };
        let next = match popped.name {
            PageName::Home => Transition::fresh(State::Home),
            PageName::ListAll => Transition::revisit(State::ListAll),
            PageName::SearchSpecific => Transition::revisit(State::SearchSpecific),
            // Country pages re-enter through the bound retry descriptor;
            // without one there is no query to replay.
            PageName::ListCountry => match retry {
                Some(state) => Transition::revisit(state.clone()),
                None => {
                    warn!("popped a country page with no retry target, going home");
                    Transition::fresh(State::Home)
                }
            },
        };
        debug!("back to {:?}", popped.name);
        self.current = popped;
        Some(Flow::Goto(next))
    }

    // ── Input ───────────────────────────────────────────────────────────

    /// Check one input line against the global commands. `q` works
    /// everywhere; `b`/`h`/`r` only away from home, and `b` only with
    /// something to pop.
    fn try_command(&mut self, input: &str, retry: Option<&State>) -> CommandOutcome {
        if input == "q" {
            self.console.markdown(FAREWELL);
            return CommandOutcome::Flow(Flow::Quit);
        }
        if self.current.name == PageName::Home {
            return CommandOutcome::NotACommand;
        }
        match input {
            "r" => match retry {
                Some(state) => {
                    CommandOutcome::Flow(Flow::Goto(Transition::revisit(state.clone())))
                }
                None => CommandOutcome::Handled,
            },
            "b" => {
                if self.history.is_empty() {
                    self.console.plain("There is nothing to go back to yet.");
                    return CommandOutcome::Handled;
                }
                match self.go_back(retry) {
                    Some(flow) => CommandOutcome::Flow(flow),
                    None => CommandOutcome::Handled,
                }
            }
            "h" => CommandOutcome::Flow(Flow::Goto(Transition::fresh(State::Home))),
            _ => CommandOutcome::NotACommand,
        }
    }

    /// Read a 1-based menu choice in `[1, count]`, re-prompting on
    /// anything malformed or out of range.
    fn read_index(&mut self, count: usize) -> Result<Prompted<usize>, EngineError> {
        loop {
            let line = self.console.read_line(PROMPT)?;
            let input = line.trim();
            match self.try_command(input, None) {
                CommandOutcome::Flow(flow) => return Ok(Prompted::Flow(flow)),
                CommandOutcome::Handled => continue,
                CommandOutcome::NotACommand => {}
            }
            match input.parse::<usize>() {
                Ok(n) if n >= 1 && n <= count => return Ok(Prompted::Value(n)),
                _ => self
                    .console
                    .plain(&format!("Please enter a number between 1 and {count}!")),
            }
        }
    }

    /// Read one line of free text. Global commands still win.
    fn read_text(&mut self) -> Result<Prompted<String>, EngineError> {
        loop {
            let line = self.console.read_line(PROMPT)?;
            let input = line.trim();
            match self.try_command(input, None) {
                CommandOutcome::Flow(flow) => return Ok(Prompted::Flow(flow)),
                CommandOutcome::Handled => continue,
                CommandOutcome::NotACommand => return Ok(Prompted::Value(input.to_string())),
            }
        }
    }

    /// Block until a command resolves the page — used on error pages (with
    /// a retry target) and on the country view (without one).
    fn read_ack(&mut self, retry: Option<State>) -> Result<Flow, EngineError> {
        loop {
            let line = self.console.read_line(PROMPT)?;
            let input = line.trim();
            match self.try_command(input, retry.as_ref()) {
                CommandOutcome::Flow(flow) => return Ok(flow),
                CommandOutcome::Handled => {}
                CommandOutcome::NotACommand => self.console.plain("Please enter a valid choice:"),
            }
        }
    }

    // ── Rendering ───────────────────────────────────────────────────────

    fn render_page(&mut self, numbered: bool) -> Result<(), EngineError> {
        self.print_instructions();
        if let Some(message) = self.current.message.clone() {
            self.console.markdown(&message);
            self.console.plain("");
        }
        self.render_options(numbered)?;
        Ok(())
    }

    fn render_options(&mut self, numbered: bool) -> Result<(), DisplayError> {
        match &self.current.options {
            None => Ok(()),
            Some(Options::List(items)) if numbered => {
                for (index, item) in items.iter().enumerate() {
                    self.console.plain(&format!("{}. {}.", index + 1, item));
                }
                Ok(())
            }
            Some(Options::Menu(entries)) if numbered => {
                for (index, (_, label)) in entries.iter().enumerate() {
                    self.console.plain(&format!("{}. {}.", index + 1, label));
                }
                Ok(())
            }
            Some(Options::Record(value)) if !numbered => self.console.structured(value),
            Some(_) => Err(DisplayError::Shape(format!(
                "options of page {:?} do not fit its layout",
                self.current.name
            ))),
        }
    }

    /// The back/home/quit hint, shown on every page except home.
    fn print_instructions(&mut self) {
        if self.current.name != PageName::Home {
            self.console.plain("");
            self.console.markdown(BASIC_INSTRUCTIONS);
            self.console.plain("");
        }
    }
}
