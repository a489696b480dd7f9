//! Country lookup dimensions and the query value the engine passes to the
//! data provider. Queries are rebuilt per navigation, never persisted.

use std::fmt;

use serde::Serialize;

/// The supported country-lookup dimensions, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryField {
    Name,
    Alpha,
    Capital,
    Currency,
    Lang,
    Region,
    Subregion,
    Translation,
}

impl QueryField {
    /// Menu order, fixed by the search screen.
    pub const ALL: [QueryField; 8] = [
        QueryField::Name,
        QueryField::Alpha,
        QueryField::Capital,
        QueryField::Currency,
        QueryField::Lang,
        QueryField::Region,
        QueryField::Subregion,
        QueryField::Translation,
    ];

    /// Wire name: the REST path segment for this field.
    pub fn as_str(self) -> &'static str {
        match self {
            QueryField::Name => "name",
            QueryField::Alpha => "alpha",
            QueryField::Capital => "capital",
            QueryField::Currency => "currency",
            QueryField::Lang => "lang",
            QueryField::Region => "region",
            QueryField::Subregion => "subregion",
            QueryField::Translation => "translation",
        }
    }

    /// Human label shown on the search menu.
    pub fn label(self) -> &'static str {
        match self {
            QueryField::Name => "Search by name",
            QueryField::Alpha => "Search by country code",
            QueryField::Capital => "Search by capital city",
            QueryField::Currency => "Search by currency",
            QueryField::Lang => "Search by language",
            QueryField::Region => "Search by region",
            QueryField::Subregion => "Search by subregion",
            QueryField::Translation => "Search by translation name",
        }
    }
}

impl fmt::Display for QueryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single country lookup: which dimension, and the text to match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Query {
    pub field: QueryField,
    pub value: String,
}

impl Query {
    pub fn new(field: QueryField, value: impl Into<String>) -> Self {
        Query { field, value: value.into() }
    }

    /// Exact-name lookup for a country picked off the full listing. The
    /// `fullText` flag rides along in the value, as the upstream API expects.
    pub fn full_text_name(name: &str) -> Self {
        Query {
            field: QueryField::Name,
            value: format!("{name}?fullText=true"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_order_is_stable() {
        let names: Vec<&str> = QueryField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            ["name", "alpha", "capital", "currency", "lang", "region", "subregion", "translation"]
        );
    }

    #[test]
    fn every_field_has_a_label() {
        for field in QueryField::ALL {
            assert!(field.label().starts_with("Search by"));
        }
    }

    #[test]
    fn full_text_name_carries_the_flag() {
        let query = Query::full_text_name("Chad");
        assert_eq!(query.field, QueryField::Name);
        assert_eq!(query.value, "Chad?fullText=true");
    }
}
