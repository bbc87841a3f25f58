//! Errors surfaced by importers, the classifier and exporters.
//!
//! Every variant carries a stable numeric [`code`][ConverterError::code] so
//! an outer layer can translate it into its own status codes without string
//! matching. Structural kinds ([`is_structural`][ConverterError::is_structural])
//! are only ever raised while a table is being constructed.
use thiserror::Error;

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum ConverterError {
    #[error("not found transaction data")]
    NotFoundTransactionData,
    #[error("missing required field `{0}' in header row")]
    MissingRequiredFieldInHeaderRow(String),
    #[error("fewer fields in data row {0} than in header row")]
    FewerFieldsInDataRowThanInHeaderRow(usize),
    #[error("transaction time is invalid")]
    TransactionTimeInvalid,
    #[error("transaction time zone is invalid")]
    TransactionTimeZoneInvalid,
    #[error("transaction amount `{amount}' is invalid")]
    AmountInvalid {
        /// Index of the offending posting, when the amount came from one.
        posting: Option<usize>,
        amount: String,
    },
    #[error("geographic location is invalid")]
    GeographicLocationInvalid,
    #[error("fields in multiple table headers are different")]
    FieldsInMultiTableAreDifferent,
    #[error("invalid file header")]
    InvalidFileHeader,
    #[error("invalid csv file: {0}")]
    InvalidCsvFile(String),
    #[error("missing transaction time field")]
    MissingTransactionTime,
    #[error("missing account data")]
    MissingAccountData,
    #[error("not supported to import split transaction")]
    NotSupportedSplitTransactions,
    #[error("there are not supported transaction type")]
    NotSupportedTransactionType,
    #[error("invalid beancount file: {0}")]
    InvalidBeancountFile(String),
    #[error("not support include directive for beancount file")]
    BeancountFileNotSupportInclude,
    #[error("invalid file: ambiguous transfer direction")]
    AmbiguousTransferDirection,
    #[error("format `{0}' is not implemented")]
    FormatNotImplemented(String),
    #[error("operation cancelled")]
    Cancelled,
}

impl ConverterError {
    pub fn amount_invalid(amount: &str) -> Self {
        ConverterError::AmountInvalid {
            posting: None,
            amount: amount.to_string(),
        }
    }

    pub fn code(&self) -> u32 {
        match self {
            ConverterError::NotFoundTransactionData => 0,
            ConverterError::MissingRequiredFieldInHeaderRow(_) => 1,
            ConverterError::FewerFieldsInDataRowThanInHeaderRow(_) => 2,
            ConverterError::TransactionTimeInvalid => 3,
            ConverterError::TransactionTimeZoneInvalid => 4,
            ConverterError::AmountInvalid { .. } => 5,
            ConverterError::GeographicLocationInvalid => 6,
            ConverterError::FieldsInMultiTableAreDifferent => 7,
            ConverterError::InvalidFileHeader => 8,
            ConverterError::InvalidCsvFile(_) => 9,
            ConverterError::MissingTransactionTime => 13,
            ConverterError::MissingAccountData => 15,
            ConverterError::NotSupportedSplitTransactions => 16,
            ConverterError::NotSupportedTransactionType => 17,
            ConverterError::InvalidBeancountFile(_) => 21,
            ConverterError::BeancountFileNotSupportInclude => 22,
            ConverterError::AmbiguousTransferDirection => 26,
            ConverterError::FormatNotImplemented(_) => 27,
            ConverterError::Cancelled => 28,
        }
    }

    /// Whether this error describes the file as a whole rather than one entry.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            ConverterError::NotFoundTransactionData
                | ConverterError::MissingRequiredFieldInHeaderRow(_)
                | ConverterError::FewerFieldsInDataRowThanInHeaderRow(_)
                | ConverterError::FieldsInMultiTableAreDifferent
                | ConverterError::InvalidFileHeader
                | ConverterError::InvalidCsvFile(_)
                | ConverterError::InvalidBeancountFile(_)
                | ConverterError::BeancountFileNotSupportInclude
        )
    }
}

pub type Result<T> = std::result::Result<T, ConverterError>;

#[cfg(test)]
mod tests {
    use crate::error::ConverterError;

    #[test]
    fn codes_are_distinct() {
        let errors = vec![
            ConverterError::NotFoundTransactionData,
            ConverterError::MissingRequiredFieldInHeaderRow("Time".to_string()),
            ConverterError::FewerFieldsInDataRowThanInHeaderRow(2),
            ConverterError::TransactionTimeInvalid,
            ConverterError::TransactionTimeZoneInvalid,
            ConverterError::amount_invalid("x"),
            ConverterError::GeographicLocationInvalid,
            ConverterError::FieldsInMultiTableAreDifferent,
            ConverterError::InvalidFileHeader,
            ConverterError::InvalidCsvFile(String::new()),
            ConverterError::MissingTransactionTime,
            ConverterError::MissingAccountData,
            ConverterError::NotSupportedSplitTransactions,
            ConverterError::NotSupportedTransactionType,
            ConverterError::InvalidBeancountFile(String::new()),
            ConverterError::BeancountFileNotSupportInclude,
            ConverterError::AmbiguousTransferDirection,
            ConverterError::FormatNotImplemented("qif".to_string()),
            ConverterError::Cancelled,
        ];
        let mut codes: Vec<u32> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn structural_kinds() {
        assert!(ConverterError::InvalidBeancountFile("eof".into()).is_structural());
        assert!(ConverterError::InvalidFileHeader.is_structural());
        assert!(!ConverterError::MissingAccountData.is_structural());
        assert!(!ConverterError::AmbiguousTransferDirection.is_structural());
        assert_eq!(
            format!("{}", ConverterError::amount_invalid("1,2.3")),
            "transaction amount `1,2.3' is invalid"
        );
    }
}
