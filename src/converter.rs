//! Format registry. Callers pick an importer or exporter by file type and
//! only ever see the trait objects.
use crate::beancount::BeancountImporter;
use crate::context::{Context, User};
use crate::datatable::TransactionDataTable;
use crate::dsv::exporter::DsvExporter;
use crate::dsv::reader::DsvImporter;
use crate::dsv::Delimiter;
use crate::error::{ConverterError, Result};
use crate::export::TransactionDataExporter;
use crate::settings::ConverterSettings;

/// Turns raw file bytes into a transaction table. Every structural problem
/// with the file is reported here.
pub trait TransactionDataImporter {
    fn parse_imported_data(
        &self,
        ctx: &Context,
        user: &User,
        data: &[u8],
    ) -> Result<Box<dyn TransactionDataTable>>;
}

pub fn importer(
    file_type: &str,
    settings: &ConverterSettings,
) -> Result<Box<dyn TransactionDataImporter>> {
    match file_type {
        "beancount" => Ok(Box::new(BeancountImporter::new(settings))),
        "csv" => Ok(Box::new(DsvImporter::new(Delimiter::Comma, settings))),
        "tsv" => Ok(Box::new(DsvImporter::new(Delimiter::Tab, settings))),
        _ => Err(ConverterError::FormatNotImplemented(file_type.to_string())),
    }
}

pub fn exporter(file_type: &str) -> Result<Box<dyn TransactionDataExporter>> {
    match file_type {
        "csv" => Ok(Box::new(DsvExporter::new(Delimiter::Comma))),
        "tsv" => Ok(Box::new(DsvExporter::new(Delimiter::Tab))),
        _ => Err(ConverterError::FormatNotImplemented(file_type.to_string())),
    }
}
