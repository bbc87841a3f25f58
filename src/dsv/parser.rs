use chrono::NaiveDateTime;

use crate::amount::normalize_amount;
use crate::column::Column;
use crate::context::{format_utc_offset, parse_utc_offset};
use crate::datatable::RowData;
use crate::dsv::{transaction_type_from_name, DSV_TIME_FORMAT};
use crate::error::{ConverterError, Result};
use crate::transaction::TransactionType;
use crate::writable::RowParser;

/// Validates and normalizes one flat record. Type names become type codes,
/// amounts get at least two decimals and the time zone is rendered as `+HH:MM`.
#[derive(Clone, Copy, Debug, Default)]
pub struct DsvRowParser;

impl RowParser for DsvRowParser {
    fn parse(&self, data: &RowData) -> Result<Option<RowData>> {
        let field = |column: Column| data.get(&column).map(|s| s.trim()).unwrap_or("");

        let ty = match transaction_type_from_name(field(Column::TransactionType)) {
            Some(ty) => ty,
            None => return Ok(None),
        };

        let mut parsed = data.clone();
        parsed.insert(Column::TransactionType, ty.to_string());

        let time = field(Column::TransactionTime);
        NaiveDateTime::parse_from_str(time, DSV_TIME_FORMAT)
            .map_err(|_| ConverterError::TransactionTimeInvalid)?;
        parsed.insert(Column::TransactionTime, time.to_string());

        if data.contains_key(&Column::TransactionTimezone) {
            let offset = parse_utc_offset(field(Column::TransactionTimezone))
                .ok_or(ConverterError::TransactionTimeZoneInvalid)?;
            parsed.insert(Column::TransactionTimezone, format_utc_offset(offset));
        }

        parsed.insert(Column::Amount, normalize_amount(field(Column::Amount))?);

        let related_amount = field(Column::RelatedAmount);
        if ty == TransactionType::Transfer || !related_amount.is_empty() {
            parsed.insert(Column::RelatedAmount, normalize_amount(related_amount)?);
        }

        let location = field(Column::GeographicLocation);
        if !location.is_empty() {
            parsed.insert(Column::GeographicLocation, parse_geo_location(location)?);
        }

        Ok(Some(parsed))
    }
}

/// Accepts `"<longitude> <latitude>"`.
fn parse_geo_location(text: &str) -> Result<String> {
    let coordinates = text
        .split_whitespace()
        .map(|c| c.parse::<f64>())
        .collect::<std::result::Result<Vec<f64>, _>>()
        .map_err(|_| ConverterError::GeographicLocationInvalid)?;

    match coordinates.as_slice() {
        [longitude, latitude]
            if (-180.0..=180.0).contains(longitude) && (-90.0..=90.0).contains(latitude) =>
        {
            Ok(format!("{} {}", longitude, latitude))
        }
        _ => Err(ConverterError::GeographicLocationInvalid),
    }
}
