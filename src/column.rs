use indexmap::IndexSet;

use std::fmt;

/// Separator used to serialize a tag list into [`Column::Tags`], and to split
/// it again on the way back.
pub const TAG_SEPARATOR: char = '#';

/// Semantic fields a transaction row can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    TransactionTime,
    TransactionTimezone,
    TransactionType,
    Category,
    SubCategory,
    AccountName,
    AccountCurrency,
    Amount,
    RelatedAccountName,
    RelatedAccountCurrency,
    RelatedAmount,
    GeographicLocation,
    Tags,
    Description,
}

impl Column {
    pub const ALL: [Column; 14] = [
        Column::TransactionTime,
        Column::TransactionTimezone,
        Column::TransactionType,
        Column::Category,
        Column::SubCategory,
        Column::AccountName,
        Column::AccountCurrency,
        Column::Amount,
        Column::RelatedAccountName,
        Column::RelatedAccountCurrency,
        Column::RelatedAmount,
        Column::GeographicLocation,
        Column::Tags,
        Column::Description,
    ];
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Column::TransactionTime => "transaction_time",
            Column::TransactionTimezone => "transaction_timezone",
            Column::TransactionType => "transaction_type",
            Column::Category => "category",
            Column::SubCategory => "sub_category",
            Column::AccountName => "account_name",
            Column::AccountCurrency => "account_currency",
            Column::Amount => "amount",
            Column::RelatedAccountName => "related_account_name",
            Column::RelatedAccountCurrency => "related_account_currency",
            Column::RelatedAmount => "related_amount",
            Column::GeographicLocation => "geographic_location",
            Column::Tags => "tags",
            Column::Description => "description",
        };
        f.write_str(name)
    }
}

/// A frozen capability set. Built once when a table is constructed and never
/// changed afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColumnSet(IndexSet<Column>);

impl ColumnSet {
    pub fn new(columns: &[Column]) -> Self {
        Self(columns.iter().copied().collect())
    }

    /// Union of `columns` and `added`, in that order.
    pub fn with_added(columns: &[Column], added: &[Column]) -> Self {
        Self(columns.iter().chain(added.iter()).copied().collect())
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }
}

pub fn join_tags<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|t| t.as_ref())
        .collect::<Vec<&str>>()
        .join(&TAG_SEPARATOR.to_string())
}

pub fn split_tags(tags: &str) -> Vec<&str> {
    tags.split(TAG_SEPARATOR).filter(|t| !t.is_empty()).collect()
}

#[cfg(test)]
mod tests {
    use crate::column::{join_tags, split_tags, Column, ColumnSet};

    #[test]
    fn column_set_union_keeps_declaration_order() {
        let set = ColumnSet::with_added(
            &[Column::TransactionTime, Column::Amount],
            &[Column::Description, Column::Amount],
        );
        assert_eq!(set.len(), 3);
        assert!(set.contains(Column::Description));
        assert!(!set.contains(Column::Tags));
        assert_eq!(
            set.iter().collect::<Vec<Column>>(),
            vec![Column::TransactionTime, Column::Amount, Column::Description]
        );
    }

    #[test]
    fn tags_round_trip_through_separator() {
        let joined = join_tags(&["food", "lunch"]);
        assert_eq!(joined, "food#lunch");
        assert_eq!(split_tags(&joined), vec!["food", "lunch"]);
        assert_eq!(join_tags::<&str>(&[]), "");
        assert!(split_tags("").is_empty());
    }
}
