use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable};
use uuid::Uuid;

use super::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::AnalyticsRecord;

pub fn get(db: &Database, page_id: Uuid) -> Result<Option<AnalyticsRecord>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::ANALYTICS)?;

    let key = page_id.to_string();
    let record = table
        .get(key.as_str())?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;

    Ok(record)
}

/// Count one view of `page_id`
///
/// The counter and the per-day source breakdown are updated in a single
/// write transaction, so concurrent views are never lost.
pub fn record_view(
    db: &Database,
    page_id: Uuid,
    source: &str,
    now: DateTime<Utc>,
) -> Result<AnalyticsRecord> {
    let key = page_id.to_string();

    let write_txn = db.begin_write()?;
    let record = {
        let mut table = write_txn.open_table(tables::ANALYTICS)?;
        let mut record: AnalyticsRecord = table
            .get(key.as_str())?
            .map(|bytes| decode(bytes.value()))
            .transpose()?
            .ok_or(AppError::AnalyticsNotFound)?;

        record.record_view(source, now);

        let bytes = encode(&record)?;
        table.insert(key.as_str(), bytes.as_slice())?;
        record
    };
    write_txn.commit()?;

    Ok(record)
}
