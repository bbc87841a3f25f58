use crate::account::AccountStore;
use crate::classify::{classify_entry, OpeningBalancePredicate};
use crate::column::{Column, ColumnSet};
use crate::context::{Context, User};
use crate::datatable::{
    DataRow, RowErrorPolicy, TransactionDataRowIterator, TransactionDataTable,
};
use crate::error::Result;
use crate::transaction::Entry;

pub const BEANCOUNT_SUPPORTED_COLUMNS: [Column; 11] = [
    Column::TransactionTime,
    Column::TransactionType,
    Column::SubCategory,
    Column::AccountName,
    Column::AccountCurrency,
    Column::Amount,
    Column::RelatedAccountName,
    Column::RelatedAccountCurrency,
    Column::RelatedAmount,
    Column::Tags,
    Column::Description,
];

/// Beancount transactions exposed as rows. Each row is classified when it
/// is pulled from the iterator.
pub struct BeancountTransactionDataTable {
    columns: ColumnSet,
    entries: Vec<Entry>,
    accounts: AccountStore,
    opening_balance: Box<dyn OpeningBalancePredicate>,
    default_policy: RowErrorPolicy,
}

impl BeancountTransactionDataTable {
    pub fn new(
        accounts: AccountStore,
        entries: Vec<Entry>,
        opening_balance: Box<dyn OpeningBalancePredicate>,
    ) -> Self {
        Self {
            columns: ColumnSet::new(&BEANCOUNT_SUPPORTED_COLUMNS),
            entries,
            accounts,
            opening_balance,
            default_policy: RowErrorPolicy::Abort,
        }
    }

    pub fn with_default_error_policy(mut self, policy: RowErrorPolicy) -> Self {
        self.default_policy = policy;
        self
    }
}

impl TransactionDataTable for BeancountTransactionDataTable {
    fn has_column(&self, column: Column) -> bool {
        self.columns.contains(column)
    }

    fn transaction_row_count(&self) -> usize {
        self.entries.len()
    }

    fn default_error_policy(&self) -> RowErrorPolicy {
        self.default_policy
    }

    fn transaction_row_iterator(
        &self,
        policy: RowErrorPolicy,
    ) -> Box<dyn TransactionDataRowIterator + '_> {
        Box::new(BeancountDataRowIterator {
            table: self,
            next_index: 0,
            policy,
        })
    }
}

struct BeancountDataRowIterator<'t> {
    table: &'t BeancountTransactionDataTable,
    next_index: usize,
    policy: RowErrorPolicy,
}

impl<'t> TransactionDataRowIterator for BeancountDataRowIterator<'t> {
    fn has_next(&self) -> bool {
        self.next_index < self.table.entries.len()
    }

    fn next_row(&mut self, ctx: &Context, user: &User) -> Result<Option<DataRow>> {
        ctx.check()?;

        let entry = match self.table.entries.get(self.next_index) {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let index = self.next_index;
        self.next_index += 1;

        match classify_entry(entry, &self.table.accounts, self.table.opening_balance.as_ref()) {
            Ok(items) => Ok(Some(DataRow::filtered(items, &self.table.columns))),
            Err(err) => {
                tracing::error!(
                    request_id = ctx.request_id(),
                    uid = user.uid,
                    row = index,
                    date = %entry.date,
                    error = %err,
                    "cannot classify beancount transaction"
                );
                match self.policy {
                    RowErrorPolicy::Abort => Err(err),
                    RowErrorPolicy::MarkInvalid => Ok(Some(DataRow::invalid())),
                }
            }
        }
    }
}
