//! # Core Navigation Logic
//!
//! This module contains Atlas's navigation engine and everything it is
//! built from. It knows nothing about HTTP or any specific terminal —
//! data arrives through the `DataProvider` seam and output leaves through
//! the `Console` seam.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Page (screen data)   │
//!                    │  • HistoryStack (back)  │
//!                    │  • compare (deep eq)    │
//!                    │  • engine (state loop)  │
//!                    └───────────┬─────────────┘
//!                                │
//!                  ┌─────────────┴─────────────┐
//!                  ▼                           ▼
//!           ┌────────────┐              ┌────────────┐
//!           │  console   │              │    api     │
//!           │  adapter   │              │  adapter   │
//!           └────────────┘              └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`page`]: the `Page` value — one displayable screen
//! - [`history`]: the back-stack with its no-duplicate policy
//! - [`compare`]: structural equality used by the history stack
//! - [`query`]: lookup fields and query values
//! - [`engine`]: the input-dispatch state machine
//! - [`config`]: settings with the defaults → file → env → CLI hierarchy

pub mod compare;
pub mod config;
pub mod engine;
pub mod history;
pub mod page;
pub mod query;
