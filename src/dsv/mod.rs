//! Flat delimiter-separated files (CSV and TSV) with one transaction per
//! line and a header row naming the fields.
pub mod exporter;
pub mod parser;
pub mod reader;

use crate::column::Column;
use crate::transaction::TransactionType;

pub const DSV_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Header names, in the order the exporter writes them.
pub const DSV_HEADER: [(&str, Column); 14] = [
    ("Time", Column::TransactionTime),
    ("Timezone", Column::TransactionTimezone),
    ("Type", Column::TransactionType),
    ("Category", Column::Category),
    ("Sub Category", Column::SubCategory),
    ("Account", Column::AccountName),
    ("Account Currency", Column::AccountCurrency),
    ("Amount", Column::Amount),
    ("Account2", Column::RelatedAccountName),
    ("Account2 Currency", Column::RelatedAccountCurrency),
    ("Account2 Amount", Column::RelatedAmount),
    ("Geographic Location", Column::GeographicLocation),
    ("Tags", Column::Tags),
    ("Description", Column::Description),
];

pub const DSV_REQUIRED_COLUMNS: [Column; 5] = [
    Column::TransactionTime,
    Column::TransactionType,
    Column::SubCategory,
    Column::AccountName,
    Column::Amount,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delimiter {
    Comma,
    Tab,
}

impl Delimiter {
    pub fn as_byte(&self) -> u8 {
        match self {
            Delimiter::Comma => b',',
            Delimiter::Tab => b'\t',
        }
    }
}

pub fn column_for_header(name: &str) -> Option<Column> {
    let name = name.trim();
    DSV_HEADER
        .iter()
        .find(|(header, _)| *header == name)
        .map(|(_, column)| *column)
}

pub fn header_for_column(column: Column) -> &'static str {
    DSV_HEADER
        .iter()
        .find(|(_, c)| *c == column)
        .map(|(header, _)| *header)
        .unwrap_or("")
}

pub fn transaction_type_name(ty: TransactionType) -> &'static str {
    match ty {
        TransactionType::ModifyBalance => "Balance Modification",
        TransactionType::Income => "Income",
        TransactionType::Expense => "Expense",
        TransactionType::Transfer => "Transfer",
    }
}

pub fn transaction_type_from_name(name: &str) -> Option<TransactionType> {
    match name.trim() {
        "Balance Modification" => Some(TransactionType::ModifyBalance),
        "Income" => Some(TransactionType::Income),
        "Expense" => Some(TransactionType::Expense),
        "Transfer" => Some(TransactionType::Transfer),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::column::Column;
    use crate::dsv::{
        column_for_header, header_for_column, transaction_type_from_name, transaction_type_name,
        DSV_HEADER,
    };
    use crate::transaction::TransactionType;

    #[test]
    fn header_covers_every_column() {
        for column in Column::ALL {
            assert_eq!(column_for_header(header_for_column(column)), Some(column));
        }
        assert_eq!(DSV_HEADER.len(), Column::ALL.len());
        assert_eq!(column_for_header(" Sub Category "), Some(Column::SubCategory));
        assert_eq!(column_for_header("Memo"), None);
    }

    #[test]
    fn type_names() {
        for ty in [
            TransactionType::ModifyBalance,
            TransactionType::Income,
            TransactionType::Expense,
            TransactionType::Transfer,
        ] {
            assert_eq!(transaction_type_from_name(transaction_type_name(ty)), Some(ty));
        }
        assert_eq!(transaction_type_from_name("3"), None);
    }
}
