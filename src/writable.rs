use crate::column::{Column, ColumnSet};
use crate::context::{Context, User};
use crate::datatable::{
    DataRow, RowData, RowErrorPolicy, TransactionDataRowIterator, TransactionDataTable,
};
use crate::error::Result;

/// Derivation hook applied to every record of a [`WritableTransactionDataTable`]
/// when it is read back.
///
/// Implementations must be pure functions of the record, the table calls
/// them again on every retrieval.
pub trait RowParser {
    /// Columns this parser synthesizes on top of the table's own.
    fn added_columns(&self) -> Vec<Column> {
        Vec::new()
    }

    /// Returns the derived record, or `None` when the record is not a valid
    /// transaction.
    fn parse(&self, data: &RowData) -> Result<Option<RowData>>;
}

/// In-memory table built from flat `column -> text` records.
pub struct WritableTransactionDataTable {
    columns: ColumnSet,
    records: Vec<RowData>,
    row_parser: Option<Box<dyn RowParser>>,
    default_policy: RowErrorPolicy,
}

impl WritableTransactionDataTable {
    pub fn new(columns: &[Column]) -> Self {
        Self {
            columns: ColumnSet::new(columns),
            records: Vec::new(),
            row_parser: None,
            default_policy: RowErrorPolicy::MarkInvalid,
        }
    }

    pub fn with_row_parser(columns: &[Column], row_parser: Box<dyn RowParser>) -> Self {
        Self {
            columns: ColumnSet::with_added(columns, &row_parser.added_columns()),
            records: Vec::new(),
            row_parser: Some(row_parser),
            default_policy: RowErrorPolicy::MarkInvalid,
        }
    }

    pub fn set_default_error_policy(&mut self, policy: RowErrorPolicy) {
        self.default_policy = policy;
    }

    /// Appends one record. Columns outside the capability set are dropped.
    pub fn add(&mut self, data: RowData) {
        let retained = data
            .into_iter()
            .filter(|(column, _)| self.columns.contains(*column))
            .collect();
        self.records.push(retained);
    }

    /// Row at `index`, or `Ok(None)` past the end.
    pub fn get(&self, index: usize) -> Result<Option<DataRow>> {
        match self.records.get(index) {
            Some(record) => self.materialize(record).map(Some),
            None => Ok(None),
        }
    }

    fn materialize(&self, record: &RowData) -> Result<DataRow> {
        let row_parser = match &self.row_parser {
            Some(row_parser) => row_parser,
            None => return Ok(DataRow::new(record.clone())),
        };

        match row_parser.parse(record)? {
            Some(parsed) => Ok(DataRow::filtered(parsed, &self.columns)),
            None => Ok(DataRow::invalid()),
        }
    }
}

impl TransactionDataTable for WritableTransactionDataTable {
    fn has_column(&self, column: Column) -> bool {
        self.columns.contains(column)
    }

    fn transaction_row_count(&self) -> usize {
        self.records.len()
    }

    fn default_error_policy(&self) -> RowErrorPolicy {
        self.default_policy
    }

    fn transaction_row_iterator(
        &self,
        policy: RowErrorPolicy,
    ) -> Box<dyn TransactionDataRowIterator + '_> {
        Box::new(WritableDataRowIterator {
            table: self,
            next_index: 0,
            policy,
        })
    }
}

struct WritableDataRowIterator<'t> {
    table: &'t WritableTransactionDataTable,
    next_index: usize,
    policy: RowErrorPolicy,
}

impl<'t> TransactionDataRowIterator for WritableDataRowIterator<'t> {
    fn has_next(&self) -> bool {
        self.next_index < self.table.records.len()
    }

    fn next_row(&mut self, ctx: &Context, _user: &User) -> Result<Option<DataRow>> {
        ctx.check()?;

        let record = match self.table.records.get(self.next_index) {
            Some(record) => record,
            None => return Ok(None),
        };
        let index = self.next_index;
        self.next_index += 1;

        match self.table.materialize(record) {
            Ok(row) => {
                if !row.is_valid() {
                    tracing::warn!(row = index, "record rejected by row parser");
                }
                Ok(Some(row))
            }
            Err(err) => {
                tracing::error!(row = index, error = %err, "cannot parse data row");
                match self.policy {
                    RowErrorPolicy::Abort => Err(err),
                    RowErrorPolicy::MarkInvalid => Ok(Some(DataRow::invalid())),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::column::Column;
    use crate::context::{Context, User};
    use crate::datatable::{RowData, RowErrorPolicy, TransactionDataTable};
    use crate::error::{ConverterError, Result};
    use crate::writable::{RowParser, WritableTransactionDataTable};

    struct TestRowParser;

    impl RowParser for TestRowParser {
        fn added_columns(&self) -> Vec<Column> {
            vec![Column::Description]
        }

        fn parse(&self, data: &RowData) -> Result<Option<RowData>> {
            let mut row = data.clone();

            if row.contains_key(&Column::SubCategory) {
                row.insert(Column::SubCategory, "foo".to_string());
            } else {
                return Ok(None);
            }

            if row.get(&Column::Amount).map(String::as_str) == Some("boom") {
                return Err(ConverterError::amount_invalid("boom"));
            }

            row.insert(Column::Tags, "test".to_string());
            row.insert(Column::Description, "bar".to_string());

            Ok(Some(row))
        }
    }

    fn columns() -> Vec<Column> {
        vec![
            Column::TransactionTime,
            Column::TransactionType,
            Column::SubCategory,
            Column::AccountName,
            Column::Amount,
        ]
    }

    fn record(items: &[(Column, &str)]) -> RowData {
        items
            .iter()
            .map(|(column, value)| (*column, value.to_string()))
            .collect()
    }

    fn expense_record() -> RowData {
        record(&[
            (Column::TransactionTime, "2024-09-01 01:23:45"),
            (Column::TransactionType, "Expense"),
            (Column::SubCategory, "Test Category"),
            (Column::AccountName, "Test Account"),
            (Column::Amount, "123.45"),
        ])
    }

    fn income_record_without_category() -> RowData {
        record(&[
            (Column::TransactionTime, "2024-09-01 12:34:56"),
            (Column::TransactionType, "Income"),
            (Column::AccountName, "Test Account2"),
            (Column::Amount, "0.12"),
        ])
    }

    #[test]
    fn create() {
        let table = WritableTransactionDataTable::new(&columns());

        assert_eq!(table.transaction_row_count(), 0);
        assert!(table.has_column(Column::TransactionTime));
        assert!(table.has_column(Column::Amount));
        assert!(!table.has_column(Column::TransactionTimezone));
        assert!(!table.has_column(Column::AccountCurrency));
        assert_eq!(table.default_error_policy(), RowErrorPolicy::MarkInvalid);
    }

    #[test]
    fn add_and_get() -> anyhow::Result<()> {
        let mut table = WritableTransactionDataTable::new(&columns());
        table.add(expense_record());
        assert_eq!(table.transaction_row_count(), 1);

        let row = table.get(0)?.expect("row 0");
        assert!(row.is_valid());
        assert_eq!(row.get_data(Column::TransactionTime), "2024-09-01 01:23:45");
        assert_eq!(row.get_data(Column::TransactionType), "Expense");
        assert_eq!(row.get_data(Column::SubCategory), "Test Category");
        assert_eq!(row.get_data(Column::AccountName), "Test Account");
        assert_eq!(row.get_data(Column::Amount), "123.45");

        Ok(())
    }

    #[test]
    fn add_drops_undeclared_columns() -> anyhow::Result<()> {
        let mut table = WritableTransactionDataTable::new(&[Column::TransactionTime]);
        table.add(record(&[
            (Column::TransactionTime, "2024-09-01 01:23:45"),
            (Column::TransactionType, "Expense"),
        ]));

        let row = table.get(0)?.expect("row 0");
        assert_eq!(row.column_count(), 1);
        assert_eq!(row.get_data(Column::TransactionType), "");

        Ok(())
    }

    #[test]
    fn get_past_the_end_is_not_found() -> anyhow::Result<()> {
        let table = WritableTransactionDataTable::new(&[Column::TransactionTime]);
        assert!(table.get(0)?.is_none());
        Ok(())
    }

    #[test]
    fn iterates_in_insertion_order() -> anyhow::Result<()> {
        let mut table = WritableTransactionDataTable::new(&columns());
        let amounts = ["123.45", "-23.4", "123"];
        for amount in amounts {
            let mut data = expense_record();
            data.insert(Column::Amount, amount.to_string());
            table.add(data);
        }

        let (ctx, user) = (Context::default(), User::default());
        let mut iterator = table.transaction_row_iterator(RowErrorPolicy::Abort);
        let mut seen = Vec::new();
        while iterator.has_next() {
            let row = iterator.next_row(&ctx, &user)?.expect("row");
            seen.push(row.get_data(Column::Amount).to_string());
        }

        assert_eq!(seen, amounts);
        assert!(iterator.next_row(&ctx, &user)?.is_none());
        Ok(())
    }

    #[test]
    fn row_parser_derives_and_filters() -> anyhow::Result<()> {
        let mut table =
            WritableTransactionDataTable::with_row_parser(&columns(), Box::new(TestRowParser));

        assert!(table.has_column(Column::Description));
        assert!(!table.has_column(Column::Tags));

        table.add(expense_record());
        table.add(income_record_without_category());
        assert_eq!(table.transaction_row_count(), 2);

        let first = table.get(0)?.expect("row 0");
        assert!(first.is_valid());
        assert_eq!(first.column_count(), 6);
        assert_eq!(first.get_data(Column::SubCategory), "foo");
        assert_eq!(first.get_data(Column::Tags), "");
        assert_eq!(first.get_data(Column::Description), "bar");

        let second = table.get(1)?.expect("row 1");
        assert!(!second.is_valid());
        assert_eq!(second.column_count(), 0);
        assert_eq!(second.get_data(Column::SubCategory), "");
        assert_eq!(second.get_data(Column::Description), "");

        Ok(())
    }

    #[test]
    fn iterator_with_row_parser() -> anyhow::Result<()> {
        let mut table =
            WritableTransactionDataTable::with_row_parser(&columns(), Box::new(TestRowParser));
        table.add(expense_record());
        table.add(income_record_without_category());

        let (ctx, user) = (Context::default(), User::default());
        let mut iterator = table.transaction_row_iterator(table.default_error_policy());

        assert!(iterator.has_next());
        let row = iterator.next_row(&ctx, &user)?.expect("row 0");
        assert!(row.is_valid());
        assert_eq!(row.get_data(Column::Description), "bar");

        assert!(iterator.has_next());
        let row = iterator.next_row(&ctx, &user)?.expect("row 1");
        assert!(!row.is_valid());
        assert_eq!(row.get_data(Column::SubCategory), "");

        assert!(!iterator.has_next());
        Ok(())
    }

    #[test]
    fn parser_errors_follow_policy() -> anyhow::Result<()> {
        let mut table =
            WritableTransactionDataTable::with_row_parser(&columns(), Box::new(TestRowParser));
        let mut broken = expense_record();
        broken.insert(Column::Amount, "boom".to_string());
        table.add(broken);
        table.add(expense_record());

        assert!(table.get(0).is_err());

        let (ctx, user) = (Context::default(), User::default());

        let mut lenient = table.transaction_row_iterator(RowErrorPolicy::MarkInvalid);
        let row = lenient.next_row(&ctx, &user)?.expect("row 0");
        assert!(!row.is_valid());
        assert_eq!(row.column_count(), 0);
        assert!(lenient.next_row(&ctx, &user)?.expect("row 1").is_valid());

        let mut strict = table.transaction_row_iterator(RowErrorPolicy::Abort);
        assert_eq!(
            strict.next_row(&ctx, &user).unwrap_err(),
            ConverterError::amount_invalid("boom")
        );

        Ok(())
    }

    #[test]
    fn cancelled_context_stops_the_scan() {
        let mut table = WritableTransactionDataTable::new(&columns());
        table.add(expense_record());

        let ctx = Context::new("cancelled");
        ctx.cancel();
        let mut iterator = table.transaction_row_iterator(RowErrorPolicy::MarkInvalid);

        assert_eq!(
            iterator.next_row(&ctx, &User::default()).unwrap_err(),
            ConverterError::Cancelled
        );
    }
}
