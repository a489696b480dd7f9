//! # Data Adapter
//!
//! Everything that produces country data: the `DataProvider` seam the
//! engine consumes, the blocking restcountries client, and the local file
//! cache it reads and writes.

pub mod cache;
pub mod client;
pub mod provider;
