use indexmap::IndexMap;
use serde::Deserialize;

use crate::column::{Column, ColumnSet};
use crate::context::{Context, User};
use crate::error::Result;

/// Raw textual values of one record, keyed by column.
pub type RowData = IndexMap<Column, String>;

/// What an iterator does when one entry cannot be turned into a row.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RowErrorPolicy {
    /// Return the error and end the scan. Rows already produced stay valid.
    #[default]
    Abort,
    /// Produce an invalid, empty row and keep going.
    MarkInvalid,
}

/// One materialized row. Never mutated after creation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataRow {
    valid: bool,
    items: RowData,
}

impl DataRow {
    pub fn new(items: RowData) -> Self {
        Self { valid: true, items }
    }

    /// Keeps only the items whose column is in `columns`.
    pub fn filtered(items: RowData, columns: &ColumnSet) -> Self {
        Self::new(
            items
                .into_iter()
                .filter(|(column, _)| columns.contains(*column))
                .collect(),
        )
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            items: RowData::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Value of `column`, or the empty string when the row does not carry it.
    pub fn get_data(&self, column: Column) -> &str {
        self.items.get(&column).map(String::as_str).unwrap_or("")
    }

    pub fn column_count(&self) -> usize {
        self.items.len()
    }
}

/// Single-pass, forward-only cursor over a table.
pub trait TransactionDataRowIterator {
    fn has_next(&self) -> bool;

    /// Materializes the next row. `Ok(None)` once the end is reached.
    fn next_row(&mut self, ctx: &Context, user: &User) -> Result<Option<DataRow>>;
}

/// A parsed source exposed as uniform transaction rows.
pub trait TransactionDataTable {
    fn has_column(&self, column: Column) -> bool;

    fn transaction_row_count(&self) -> usize;

    fn default_error_policy(&self) -> RowErrorPolicy;

    fn transaction_row_iterator(
        &self,
        policy: RowErrorPolicy,
    ) -> Box<dyn TransactionDataRowIterator + '_>;
}

/// Drains a fresh iterator using the table's own error policy.
pub fn collect_rows(
    table: &dyn TransactionDataTable,
    ctx: &Context,
    user: &User,
) -> Result<Vec<DataRow>> {
    let mut iterator = table.transaction_row_iterator(table.default_error_policy());
    let mut rows = Vec::with_capacity(table.transaction_row_count());

    while iterator.has_next() {
        match iterator.next_row(ctx, user)? {
            Some(row) => rows.push(row),
            None => break,
        }
    }

    Ok(rows)
}
