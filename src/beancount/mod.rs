//! Beancount ledgers as transaction tables.
//!
//! The whole file is parsed up front with a pest grammar; classification of
//! each transaction into a row happens lazily while iterating.
pub mod ledger;
pub mod parser;
pub mod statement;
pub mod table;

use crate::context::{Context, User};
use crate::converter::TransactionDataImporter;
use crate::datatable::TransactionDataTable;
use crate::error::{ConverterError, Result};
use crate::settings::ConverterSettings;

pub use table::BeancountTransactionDataTable;

pub struct BeancountImporter {
    settings: ConverterSettings,
}

impl BeancountImporter {
    pub fn new(settings: &ConverterSettings) -> Self {
        Self {
            settings: settings.clone(),
        }
    }
}

impl TransactionDataImporter for BeancountImporter {
    fn parse_imported_data(
        &self,
        ctx: &Context,
        user: &User,
        data: &[u8],
    ) -> Result<Box<dyn TransactionDataTable>> {
        ctx.check()?;

        let content = std::str::from_utf8(data)
            .map_err(|err| ConverterError::InvalidBeancountFile(err.to_string()))?;
        let content = content.strip_prefix('\u{feff}').unwrap_or(content);
        let (accounts, entries) = parser::parse(content)?.into_parts();

        tracing::debug!(
            request_id = ctx.request_id(),
            uid = user.uid,
            transactions = entries.len(),
            "beancount table constructed"
        );

        let table = BeancountTransactionDataTable::new(
            accounts,
            entries,
            Box::new(self.settings.opening_balance_predicate()),
        )
        .with_default_error_policy(self.settings.beancount_default_error_policy);

        Ok(Box::new(table))
    }
}
