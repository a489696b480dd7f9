//! # Page Model
//!
//! The data shape for one displayed screen: a name, an optional markdown
//! message, and the options the user can act on. Pages are immutable once
//! displayed — the engine replaces its `current` page wholesale on every
//! transition and never mutates one in place.

use serde::Serialize;
use serde_json::Value;

use crate::core::query::QueryField;

/// Markdown shown at the top of the home screen.
const HOME_MESSAGE: &str = "\
# Atlas

Welcome! Atlas lets you browse facts about every country in the world,
straight from your terminal.

Pick an option below by typing its number. On any other screen you can
also enter **b** to go back, **h** to return here, or **q** to quit.";

/// Which screen a page represents. Error pages reuse the name of the state
/// that failed and carry no options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageName {
    Home,
    ListAll,
    SearchSpecific,
    ListCountry,
}

/// The selectable (or displayable) content of a page.
///
/// Serialized untagged so structural equality sees the underlying shape:
/// an ordered list of labels, an ordered key→label menu, or an arbitrary
/// record returned by a data query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Options {
    /// Numbered list of plain labels (the full country listing).
    List(Vec<String>),
    /// Numbered menu of `(key, label)` pairs, order significant.
    Menu(Vec<(String, String)>),
    /// Structured query result, pretty-dumped rather than numbered.
    Record(Value),
}

impl Options {
    /// How many numbered choices this page offers. Records are displayed,
    /// not selected from.
    pub fn count(&self) -> usize {
        match self {
            Options::List(items) => items.len(),
            Options::Menu(entries) => entries.len(),
            Options::Record(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub name: PageName,
    pub message: Option<String>,
    pub options: Option<Options>,
}

impl Page {
    /// The always-available home page.
    pub fn home() -> Self {
        Page {
            name: PageName::Home,
            message: Some(HOME_MESSAGE.to_string()),
            options: Some(Options::List(vec![
                "List all countries".to_string(),
                "Search for a specific country".to_string(),
            ])),
        }
    }

    /// The full country listing, names already sorted by the caller.
    pub fn listing(names: Vec<String>) -> Self {
        Page {
            name: PageName::ListAll,
            message: Some(
                "Below is the list of countries that exist today in the world.\n\
                 To retrieve information about a country, enter its serial number:"
                    .to_string(),
            ),
            options: Some(Options::List(names)),
        }
    }

    /// The search-field menu, one entry per supported query field.
    pub fn search_menu() -> Self {
        let entries = QueryField::ALL
            .iter()
            .map(|field| (field.as_str().to_string(), field.label().to_string()))
            .collect();
        Page {
            name: PageName::SearchSpecific,
            message: Some("Choose one of the following options to continue:".to_string()),
            options: Some(Options::Menu(entries)),
        }
    }

    /// A country-details page holding the query result.
    pub fn country(message: String, record: Value) -> Self {
        Page {
            name: PageName::ListCountry,
            message: Some(message),
            options: Some(Options::Record(record)),
        }
    }

    /// An error page for a failed data fetch. Carries no options.
    pub fn error(name: PageName, message: String) -> Self {
        Page {
            name,
            message: Some(message),
            options: None,
        }
    }

    /// Number of numbered choices on this page (0 when there are none).
    pub fn option_count(&self) -> usize {
        self.options.as_ref().map_or(0, Options::count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn home_page_offers_two_choices() {
        let home = Page::home();
        assert_eq!(home.name, PageName::Home);
        assert_eq!(home.option_count(), 2);
        assert!(home.message.is_some());
    }

    #[test]
    fn search_menu_covers_all_query_fields() {
        let menu = Page::search_menu();
        assert_eq!(menu.option_count(), QueryField::ALL.len());
        match menu.options {
            Some(Options::Menu(entries)) => {
                assert_eq!(entries[0].0, "name");
                assert_eq!(entries[1].1, "Search by country code");
            }
            other => panic!("expected a menu, got {other:?}"),
        }
    }

    #[test]
    fn error_pages_have_no_options() {
        let page = Page::error(PageName::ListAll, "Not Found".to_string());
        assert_eq!(page.option_count(), 0);
        assert!(page.options.is_none());
    }

    #[test]
    fn page_names_serialize_snake_case() {
        let value = serde_json::to_value(PageName::SearchSpecific).unwrap();
        assert_eq!(value, json!("search_specific"));
        let value = serde_json::to_value(PageName::ListCountry).unwrap();
        assert_eq!(value, json!("list_country"));
    }

    #[test]
    fn record_options_offer_no_numbered_choices() {
        let page = Page::country("msg".to_string(), json!({"name": {"common": "Chad"}}));
        assert_eq!(page.option_count(), 0);
    }
}
