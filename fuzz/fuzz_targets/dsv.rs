#![no_main]
use libfuzzer_sys::fuzz_target;

use percolator::context::{Context, User};
use percolator::datatable::collect_rows;
use percolator::settings::ConverterSettings;
use percolator::TransactionDataImporter;

fuzz_target!(|data: &[u8]| {
    let (ctx, user) = (Context::default(), User::default());
    for file_type in ["csv", "tsv"] {
        if let Ok(importer) = percolator::importer(file_type, &ConverterSettings::default()) {
            if let Ok(table) = importer.parse_imported_data(&ctx, &user, data) {
                let _ = collect_rows(table.as_ref(), &ctx, &user);
            }
        }
    }
});
