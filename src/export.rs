//! Stored records handed to exporters, and the exporter trait itself.
//!
//! Exporters never touch persistence. The caller resolves everything up
//! front and passes plain id-keyed maps.
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::context::Context;
use crate::error::Result;
use crate::transaction::TransactionType;

use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoLocation {
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredTransaction {
    pub id: i64,
    pub transaction_type: TransactionType,
    pub category_id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    /// Only meaningful for transfers.
    pub related_account_id: i64,
    pub related_amount: Decimal,
    /// Unix seconds.
    pub transaction_time: i64,
    /// Minutes east of UTC the transaction was recorded in.
    pub timezone_utc_offset: i16,
    pub geo_location: Option<GeoLocation>,
    pub comment: String,
}

impl StoredTransaction {
    /// Transaction time in the offset it was recorded in. Falls back to UTC
    /// when the stored offset is out of range.
    pub fn local_time(&self) -> Option<DateTime<FixedOffset>> {
        let offset = FixedOffset::east_opt(i32::from(self.timezone_utc_offset) * 60)
            .or_else(|| FixedOffset::east_opt(0))?;
        Utc.timestamp_opt(self.transaction_time, 0)
            .single()
            .map(|time| time.with_timezone(&offset))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredAccount {
    pub id: i64,
    pub name: String,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredCategory {
    pub id: i64,
    pub name: String,
    /// `0` for top level categories.
    pub parent_id: i64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoredTag {
    pub id: i64,
    pub name: String,
}

/// Borrowed lookup maps for one export call.
#[derive(Clone, Copy, Debug)]
pub struct ExportLookups<'a> {
    pub accounts: &'a HashMap<i64, StoredAccount>,
    pub categories: &'a HashMap<i64, StoredCategory>,
    pub tags: &'a HashMap<i64, StoredTag>,
    /// Transaction id to the ids of its tags.
    pub tag_index: &'a HashMap<i64, Vec<i64>>,
}

impl<'a> ExportLookups<'a> {
    pub fn account(&self, id: i64) -> Option<&'a StoredAccount> {
        self.accounts.get(&id)
    }

    /// `(parent name, own name)` of a category. Unknown ids give empty names.
    pub fn category_names(&self, id: i64) -> (&'a str, &'a str) {
        match self.categories.get(&id) {
            Some(category) => {
                let parent = self
                    .categories
                    .get(&category.parent_id)
                    .map(|parent| parent.name.as_str())
                    .unwrap_or("");
                (parent, category.name.as_str())
            }
            None => ("", ""),
        }
    }

    /// Tag names of a transaction in index order, skipping unknown ids.
    pub fn tag_names(&self, transaction_id: i64) -> Vec<&'a str> {
        self.tag_index
            .get(&transaction_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.tags.get(id))
                    .map(|tag| tag.name.as_str())
                    .collect()
            })
            .unwrap_or_default()
    }
}

pub trait TransactionDataExporter {
    fn to_exported_content(
        &self,
        ctx: &Context,
        owner_uid: i64,
        transactions: &[StoredTransaction],
        lookups: ExportLookups<'_>,
    ) -> Result<Vec<u8>>;
}
