use redb::{Database, ReadableDatabase, ReadableTable};
use uuid::Uuid;

use super::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::{AnalyticsRecord, NewPage, PageRecord, PageUpdate};

/// Create the page for `input.business_id` and its empty analytics record
///
/// The page takes the business id as its own id; analytics take the page id.
pub fn create(db: &Database, input: NewPage, now: i64) -> Result<(Uuid, PageRecord)> {
    let id = input.business_id;
    let key = id.to_string();
    let record = PageRecord::new(input, now).map_err(AppError::InvalidInput)?;

    let write_txn = db.begin_write()?;
    {
        let businesses = write_txn.open_table(tables::BUSINESSES)?;
        if businesses.get(key.as_str())?.is_none() {
            return Err(AppError::BusinessNotFound);
        }
        drop(businesses);

        let mut pages = write_txn.open_table(tables::PAGES)?;
        if pages.get(key.as_str())?.is_some() {
            return Err(AppError::PageAlreadyExists);
        }
        let page_bytes = encode(&record)?;
        pages.insert(key.as_str(), page_bytes.as_slice())?;
        drop(pages);

        let mut analytics = write_txn.open_table(tables::ANALYTICS)?;
        let analytics_bytes = encode(&AnalyticsRecord::default())?;
        analytics.insert(key.as_str(), analytics_bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok((id, record))
}

pub fn get(db: &Database, id: Uuid) -> Result<Option<PageRecord>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::PAGES)?;

    let key = id.to_string();
    let record = table
        .get(key.as_str())?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;

    Ok(record)
}

pub fn update(db: &Database, id: Uuid, update: PageUpdate, now: i64) -> Result<PageRecord> {
    let key = id.to_string();

    let write_txn = db.begin_write()?;
    let record = {
        let mut table = write_txn.open_table(tables::PAGES)?;
        let mut record: PageRecord = table
            .get(key.as_str())?
            .map(|bytes| decode(bytes.value()))
            .transpose()?
            .ok_or(AppError::PageNotFound)?;

        record.apply(update, now).map_err(AppError::InvalidInput)?;

        let bytes = encode(&record)?;
        table.insert(key.as_str(), bytes.as_slice())?;
        record
    };
    write_txn.commit()?;

    Ok(record)
}
