use csv::{ReaderBuilder, StringRecord};

use crate::column::Column;
use crate::context::{Context, User};
use crate::converter::TransactionDataImporter;
use crate::datatable::{RowData, TransactionDataTable};
use crate::dsv::parser::DsvRowParser;
use crate::dsv::{column_for_header, Delimiter, DSV_REQUIRED_COLUMNS};
use crate::error::{ConverterError, Result};
use crate::settings::ConverterSettings;
use crate::writable::WritableTransactionDataTable;

pub struct DsvImporter {
    delimiter: Delimiter,
    settings: ConverterSettings,
}

/// Column of each header field, `None` for fields this engine ignores.
struct Header {
    fields: StringRecord,
    columns: Vec<Option<Column>>,
}

impl Header {
    fn parse(fields: StringRecord) -> Result<Header> {
        let columns: Vec<Option<Column>> = fields.iter().map(column_for_header).collect();
        if columns.iter().all(Option::is_none) {
            return Err(ConverterError::InvalidFileHeader);
        }

        for required in DSV_REQUIRED_COLUMNS {
            if !columns.contains(&Some(required)) {
                return Err(ConverterError::MissingRequiredFieldInHeaderRow(
                    crate::dsv::header_for_column(required).to_string(),
                ));
            }
        }

        Ok(Header { fields, columns })
    }

    fn known_columns(&self) -> Vec<Column> {
        self.columns.iter().flatten().copied().collect()
    }

    /// A later header row starts a new table inside the same file. Only a
    /// row made entirely of known header names counts as one.
    fn is_header_like(record: &StringRecord) -> bool {
        let mut names = record.iter().filter(|f| !f.trim().is_empty()).peekable();
        names.peek().is_some() && names.all(|f| column_for_header(f).is_some())
    }

    fn matches(&self, record: &StringRecord) -> bool {
        self.fields.len() == record.len()
            && self.fields.iter().zip(record.iter()).all(|(a, b)| a.trim() == b.trim())
    }
}

fn is_blank(record: &StringRecord) -> bool {
    record.iter().all(|field| field.trim().is_empty())
}

impl DsvImporter {
    pub fn new(delimiter: Delimiter, settings: &ConverterSettings) -> Self {
        Self {
            delimiter,
            settings: settings.clone(),
        }
    }
}

impl TransactionDataImporter for DsvImporter {
    fn parse_imported_data(
        &self,
        ctx: &Context,
        user: &User,
        data: &[u8],
    ) -> Result<Box<dyn TransactionDataTable>> {
        ctx.check()?;

        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(ConverterError::NotFoundTransactionData);
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter.as_byte())
            .has_headers(false)
            .flexible(true)
            .quoting(self.delimiter == Delimiter::Comma)
            .from_reader(data);

        let mut rows = reader.records().enumerate();
        let header = loop {
            let record = match rows.next() {
                Some((_, result)) => {
                    result.map_err(|err| ConverterError::InvalidCsvFile(err.to_string()))?
                }
                None => return Err(ConverterError::NotFoundTransactionData),
            };
            if !is_blank(&record) {
                break Header::parse(record)?;
            }
        };

        let mut records: Vec<RowData> = Vec::new();
        for (index, result) in rows {
            let record = result.map_err(|err| ConverterError::InvalidCsvFile(err.to_string()))?;
            if is_blank(&record) {
                continue;
            }

            if header.matches(&record) {
                continue;
            }
            if Header::is_header_like(&record) {
                return Err(ConverterError::FieldsInMultiTableAreDifferent);
            }

            if record.len() < header.columns.len() {
                let line = record
                    .position()
                    .map(|p| p.line() as usize)
                    .unwrap_or(index + 1);
                tracing::error!(
                    request_id = ctx.request_id(),
                    uid = user.uid,
                    line,
                    fields = record.len(),
                    expected = header.columns.len(),
                    "cannot parse data row, too few fields"
                );
                return Err(ConverterError::FewerFieldsInDataRowThanInHeaderRow(line));
            }

            let mut items: RowData = header
                .columns
                .iter()
                .zip(record.iter())
                .filter_map(|(column, value)| column.map(|c| (c, value.to_string())))
                .collect();
            if !items.contains_key(&Column::TransactionTimezone) {
                items.insert(Column::TransactionTimezone, user.timezone_name());
            }
            records.push(items);
        }

        if records.is_empty() {
            return Err(ConverterError::NotFoundTransactionData);
        }

        let mut columns = header.known_columns();
        if !columns.contains(&Column::TransactionTimezone) {
            columns.push(Column::TransactionTimezone);
        }

        let mut table = WritableTransactionDataTable::with_row_parser(&columns, Box::new(DsvRowParser));
        table.set_default_error_policy(self.settings.dsv_default_error_policy);
        let count = records.len();
        for record in records {
            table.add(record);
        }

        tracing::debug!(
            request_id = ctx.request_id(),
            uid = user.uid,
            rows = count,
            "delimiter-separated table constructed"
        );

        Ok(Box::new(table))
    }
}
