//! Percolator - transaction data conversion engine
//! ---
//!
//! Reads accounting files of different shapes, double-entry ledgers as well as flat
//! spreadsheet exports, and exposes every one of them as the same sequence of
//! normalized transaction rows. Two-legged double-entry records are classified into
//! balance modifications, income, expenses and transfers along the way.
//!

extern crate pest;
#[macro_use]
extern crate pest_derive;

/// Source accounts and the five account classes, e.g. `Assets:Bank:Jawir`.
pub mod account;

mod amount;

/// Beancount ledgers. Parsed with a pest grammar, classified row by row.
pub mod beancount;

/// The dual-entry classifier.
///
/// [`classify_entry`][classify::classify_entry] turns one two-posting
/// [`Entry`][transaction::Entry] into row items, or explains why it can't.
pub mod classify;

pub mod column;
pub mod context;

/// Format registry.
pub mod converter;

/// Row, table and iterator protocol every importer implements.
pub mod datatable;

/// CSV and TSV import and export.
pub mod dsv;

pub mod error;
pub mod export;
pub mod settings;
pub mod transaction;

/// In-memory tables with a pluggable per-row derivation hook.
pub mod writable;

pub use amount::{format_amount, parse_amount};
pub use converter::{exporter, importer, TransactionDataImporter};
pub use datatable::{DataRow, RowErrorPolicy, TransactionDataRowIterator, TransactionDataTable};
pub use error::{ConverterError, Result};
