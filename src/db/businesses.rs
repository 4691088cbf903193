use redb::{Database, ReadableDatabase, ReadableTable};
use uuid::Uuid;

use super::{decode, encode, tables};
use crate::error::{AppError, Result};
use crate::models::BusinessRecord;

pub fn insert(db: &Database, id: Uuid, record: &BusinessRecord) -> Result<()> {
    let key = id.to_string();
    let bytes = encode(record)?;

    let write_txn = db.begin_write()?;
    {
        let mut table = write_txn.open_table(tables::BUSINESSES)?;
        table.insert(key.as_str(), bytes.as_slice())?;
    }
    write_txn.commit()?;

    Ok(())
}

pub fn get(db: &Database, id: Uuid) -> Result<Option<BusinessRecord>> {
    let read_txn = db.begin_read()?;
    let table = read_txn.open_table(tables::BUSINESSES)?;

    let key = id.to_string();
    let record = table
        .get(key.as_str())?
        .map(|bytes| decode(bytes.value()))
        .transpose()?;

    Ok(record)
}

/// Read-modify-write a business inside one write transaction
///
/// Returns `None` (and writes nothing) when the business does not exist.
pub fn modify<F>(db: &Database, id: Uuid, f: F) -> Result<Option<BusinessRecord>>
where
    F: FnOnce(&mut BusinessRecord),
{
    let key = id.to_string();

    let write_txn = db.begin_write()?;
    let updated = {
        let mut table = write_txn.open_table(tables::BUSINESSES)?;
        let current: Option<BusinessRecord> = table
            .get(key.as_str())?
            .map(|bytes| decode(bytes.value()))
            .transpose()?;

        match current {
            Some(mut record) => {
                f(&mut record);
                let bytes = encode(&record)?;
                table.insert(key.as_str(), bytes.as_slice())?;
                Some(record)
            }
            None => None,
        }
    };
    write_txn.commit()?;

    Ok(updated)
}

/// Delete a business together with its page and the page's analytics
pub fn delete(db: &Database, id: Uuid) -> Result<()> {
    let key = id.to_string();

    let write_txn = db.begin_write()?;
    {
        let mut businesses = write_txn.open_table(tables::BUSINESSES)?;
        if businesses.remove(key.as_str())?.is_none() {
            return Err(AppError::BusinessNotFound);
        }

        // Page and analytics share the business id as their key
        let mut pages = write_txn.open_table(tables::PAGES)?;
        pages.remove(key.as_str())?;

        let mut analytics = write_txn.open_table(tables::ANALYTICS)?;
        analytics.remove(key.as_str())?;
    }
    write_txn.commit()?;

    Ok(())
}
