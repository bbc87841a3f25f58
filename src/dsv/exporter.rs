use csv::{QuoteStyle, WriterBuilder};

use crate::amount::format_amount;
use crate::column::{join_tags, Column};
use crate::context::{format_utc_offset, Context};
use crate::dsv::{header_for_column, transaction_type_name, Delimiter, DSV_HEADER, DSV_TIME_FORMAT};
use crate::error::{ConverterError, Result};
use crate::export::{ExportLookups, StoredTransaction, TransactionDataExporter};
use crate::transaction::TransactionType;

/// Writes stored transactions in the same layout [`DsvImporter`] reads.
///
/// [`DsvImporter`]: crate::dsv::reader::DsvImporter
pub struct DsvExporter {
    delimiter: Delimiter,
}

impl DsvExporter {
    pub fn new(delimiter: Delimiter) -> Self {
        Self { delimiter }
    }

    /// TSV has no quoting, so separators inside a value are flattened.
    fn sanitize(&self, value: &str) -> String {
        match self.delimiter {
            Delimiter::Comma => value.to_string(),
            Delimiter::Tab => value.replace(['\t', '\r', '\n'], " "),
        }
    }

    fn record(&self, transaction: &StoredTransaction, lookups: &ExportLookups<'_>) -> Vec<String> {
        let (category, sub_category) = lookups.category_names(transaction.category_id);
        let account = lookups.account(transaction.account_id);
        let is_transfer = transaction.transaction_type == TransactionType::Transfer;
        let related = if is_transfer {
            lookups.account(transaction.related_account_id)
        } else {
            None
        };

        DSV_HEADER
            .iter()
            .map(|(_, column)| match column {
                Column::TransactionTime => transaction
                    .local_time()
                    .map(|time| time.format(DSV_TIME_FORMAT).to_string())
                    .unwrap_or_default(),
                Column::TransactionTimezone => format_utc_offset(transaction.timezone_utc_offset),
                Column::TransactionType => {
                    transaction_type_name(transaction.transaction_type).to_string()
                }
                Column::Category => category.to_string(),
                Column::SubCategory => sub_category.to_string(),
                Column::AccountName => account.map(|a| a.name.clone()).unwrap_or_default(),
                Column::AccountCurrency => {
                    account.map(|a| a.currency.clone()).unwrap_or_default()
                }
                Column::Amount => format_amount(transaction.amount),
                Column::RelatedAccountName => related.map(|a| a.name.clone()).unwrap_or_default(),
                Column::RelatedAccountCurrency => {
                    related.map(|a| a.currency.clone()).unwrap_or_default()
                }
                Column::RelatedAmount if is_transfer => format_amount(transaction.related_amount),
                Column::RelatedAmount => String::new(),
                Column::GeographicLocation => transaction
                    .geo_location
                    .map(|geo| format!("{} {}", geo.longitude, geo.latitude))
                    .unwrap_or_default(),
                Column::Tags => join_tags(&lookups.tag_names(transaction.id)),
                Column::Description => transaction.comment.clone(),
            })
            .map(|value| self.sanitize(&value))
            .collect()
    }
}

impl TransactionDataExporter for DsvExporter {
    fn to_exported_content(
        &self,
        ctx: &Context,
        owner_uid: i64,
        transactions: &[StoredTransaction],
        lookups: ExportLookups<'_>,
    ) -> Result<Vec<u8>> {
        let write_error = |err: csv::Error| ConverterError::InvalidCsvFile(err.to_string());

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter.as_byte())
            .quote_style(match self.delimiter {
                Delimiter::Comma => QuoteStyle::Necessary,
                Delimiter::Tab => QuoteStyle::Never,
            })
            .from_writer(vec![]);

        writer
            .write_record(DSV_HEADER.iter().map(|(_, column)| header_for_column(*column)))
            .map_err(write_error)?;

        for transaction in transactions {
            ctx.check()?;
            writer
                .write_record(self.record(transaction, &lookups))
                .map_err(write_error)?;
        }

        let content = writer
            .into_inner()
            .map_err(|err| ConverterError::InvalidCsvFile(err.to_string()))?;

        tracing::debug!(
            request_id = ctx.request_id(),
            uid = owner_uid,
            transactions = transactions.len(),
            bytes = content.len(),
            "transactions exported"
        );

        Ok(content)
    }
}
