#![no_main]
use libfuzzer_sys::fuzz_target;

use percolator::context::{Context, User};
use percolator::datatable::{RowErrorPolicy, TransactionDataTable};
use percolator::settings::ConverterSettings;
use percolator::TransactionDataImporter;

fuzz_target!(|data: &[u8]| {
    let (ctx, user) = (Context::default(), User::default());
    let importer = match percolator::importer("beancount", &ConverterSettings::default()) {
        Ok(importer) => importer,
        Err(_) => return,
    };

    if let Ok(table) = importer.parse_imported_data(&ctx, &user, data) {
        let mut iterator = table.transaction_row_iterator(RowErrorPolicy::MarkInvalid);
        let mut rows = 0;
        while iterator.has_next() {
            match iterator.next_row(&ctx, &user) {
                Ok(Some(_)) => rows += 1,
                _ => break,
            }
        }
        assert_eq!(rows, table.transaction_row_count());
    }
});
