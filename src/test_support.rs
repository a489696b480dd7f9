//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;

use serde_json::{Value, json};

use crate::api::provider::{DataProvider, FetchError, FetchOutcome};
use crate::console::{Console, DisplayError};
use crate::core::query::QueryField;

/// Minimal country record shaped like the upstream API's.
pub fn country(name: &str) -> Value {
    json!({
        "name": { "common": name, "official": format!("Republic of {name}") },
        "region": "Testland",
    })
}

/// What a [`StaticProvider`] was asked for during a run.
#[derive(Default)]
pub struct ProviderLog {
    pub fetch_all_calls: usize,
    pub field_queries: Vec<(QueryField, String)>,
}

/// Canned data provider. Serves a fixed country list (or a network error),
/// and a fixed by-field result (or NotFound).
pub struct StaticProvider {
    countries: Vec<Value>,
    fail_all: bool,
    by_field: Option<Vec<Value>>,
    log: Rc<RefCell<ProviderLog>>,
}

impl StaticProvider {
    pub fn new(countries: Vec<Value>) -> Self {
        StaticProvider {
            countries,
            fail_all: false,
            by_field: None,
            log: Rc::default(),
        }
    }

    /// A provider whose `fetch_all` always fails.
    pub fn failing() -> Self {
        StaticProvider {
            countries: vec![],
            fail_all: true,
            by_field: None,
            log: Rc::default(),
        }
    }

    pub fn with_by_field(mut self, data: Vec<Value>) -> Self {
        self.by_field = Some(data);
        self
    }

    /// Shared handle for asserting on calls after the engine consumed the
    /// provider.
    pub fn log_handle(&self) -> Rc<RefCell<ProviderLog>> {
        Rc::clone(&self.log)
    }
}

impl DataProvider for StaticProvider {
    fn fetch_all(&mut self) -> Result<Vec<Value>, FetchError> {
        self.log.borrow_mut().fetch_all_calls += 1;
        if self.fail_all {
            return Err(FetchError::Network("connection refused".to_string()));
        }
        Ok(self.countries.clone())
    }

    fn fetch_by_field(&mut self, field: QueryField, value: &str) -> FetchOutcome {
        self.log
            .borrow_mut()
            .field_queries
            .push((field, value.to_string()));
        match &self.by_field {
            Some(data) => FetchOutcome::ok(data.clone()),
            None => FetchOutcome::not_found(),
        }
    }
}

/// Console double driven by a scripted list of inputs. Records everything
/// it would have printed; returns `UnexpectedEof` when the script runs dry.
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Rc<RefCell<Vec<String>>>,
}

impl ScriptedConsole {
    pub fn new<'a, I: IntoIterator<Item = &'a str>>(inputs: I) -> Self {
        ScriptedConsole {
            inputs: inputs.into_iter().map(str::to_string).collect(),
            transcript: Rc::default(),
        }
    }

    pub fn transcript_handle(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.transcript)
    }
}

impl Console for ScriptedConsole {
    fn markdown(&mut self, source: &str) {
        self.transcript.borrow_mut().push(source.to_string());
    }

    fn plain(&mut self, text: &str) {
        self.transcript.borrow_mut().push(text.to_string());
    }

    fn structured(&mut self, value: &Value) -> Result<(), DisplayError> {
        // Unstyled dump so tests can assert on plain content.
        let text = serde_json::to_string_pretty(value)
            .map_err(|e| DisplayError::Format(e.to_string()))?;
        self.transcript.borrow_mut().push(text);
        Ok(())
    }

    fn read_line(&mut self, _prompt: &str) -> io::Result<String> {
        self.inputs
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted"))
    }
}
