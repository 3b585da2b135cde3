use chrono::Utc;
use tracing::error;

use crate::{
    database::Database,
    model::warnings::{IssuedWarning, RemovedWarning, WarningRecord},
};

/// Append a warning for a member and persist the ledger.
///
/// If the save fails the append is rolled back and the error returned.
pub async fn record_warning(
    db: &Database,
    member_id: u64,
    moderator_id: u64,
    reason: &str,
) -> anyhow::Result<IssuedWarning> {
    let record = WarningRecord {
        moderator_id,
        reason: reason.to_owned(),
        time: Utc::now(),
    };

    let mut ledger = db.lock().await;
    let entries = ledger.entry(member_id).or_default();
    entries.push(record.clone());
    let warn_number = entries.len();

    if let Err(source) = db.store().save(&ledger).await {
        error!(?source, member_id, "failed to persist warning; rolling back");
        if let Some(entries) = ledger.get_mut(&member_id) {
            entries.pop();
            if entries.is_empty() {
                ledger.remove(&member_id);
            }
        }
        return Err(source.context("failed to persist warning"));
    }

    Ok(IssuedWarning {
        record,
        warn_number,
    })
}

/// Remove the most recent warning of a member.
///
/// Returns `Ok(None)` without touching the store when there is nothing to remove.
pub async fn remove_last_warning(
    db: &Database,
    member_id: u64,
) -> anyhow::Result<Option<RemovedWarning>> {
    let mut ledger = db.lock().await;
    let Some(entries) = ledger.get_mut(&member_id) else {
        return Ok(None);
    };
    let Some(record) = entries.pop() else {
        return Ok(None);
    };
    let remaining = entries.len();
    if remaining == 0 {
        ledger.remove(&member_id);
    }

    if let Err(source) = db.store().save(&ledger).await {
        error!(?source, member_id, "failed to persist warning removal; rolling back");
        ledger.entry(member_id).or_default().push(record);
        return Err(source.context("failed to persist warning removal"));
    }

    Ok(Some(RemovedWarning { record, remaining }))
}

/// Warnings for a member in issuance order.
pub async fn list_warnings(db: &Database, member_id: u64) -> Vec<WarningRecord> {
    db.lock()
        .await
        .get(&member_id)
        .cloned()
        .unwrap_or_default()
}

pub async fn warning_count(db: &Database, member_id: u64) -> usize {
    db.lock().await.get(&member_id).map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{list_warnings, record_warning, remove_last_warning, warning_count};
    use crate::database::Database;
    use crate::model::warnings::{Ledger, WarningRecord};
    use crate::store::LedgerStore;

    const U1: u64 = 1001;
    const M1: u64 = 2001;
    const M2: u64 = 2002;

    fn memory_db() -> Database {
        Database::with_ledger(Ledger::new(), LedgerStore::in_memory())
    }

    fn summary(entries: &[WarningRecord]) -> Vec<(u64, &str)> {
        entries
            .iter()
            .map(|entry| (entry.moderator_id, entry.reason.as_str()))
            .collect()
    }

    #[tokio::test]
    async fn warn_twice_then_unwarn_removes_latest() {
        let db = memory_db();

        let first = record_warning(&db, U1, M1, "spam").await.unwrap();
        let second = record_warning(&db, U1, M2, "spam again").await.unwrap();
        assert_eq!(first.warn_number, 1);
        assert_eq!(second.warn_number, 2);

        let listed = list_warnings(&db, U1).await;
        assert_eq!(summary(&listed), vec![(M1, "spam"), (M2, "spam again")]);

        let removed = remove_last_warning(&db, U1).await.unwrap().unwrap();
        assert_eq!(removed.record.moderator_id, M2);
        assert_eq!(removed.record.reason, "spam again");
        assert_eq!(removed.remaining, 1);

        let listed = list_warnings(&db, U1).await;
        assert_eq!(summary(&listed), vec![(M1, "spam")]);
    }

    #[tokio::test]
    async fn list_preserves_issue_order() {
        let db = memory_db();
        let reasons = ["a", "b", "c", "d", "e"];

        for reason in reasons {
            record_warning(&db, U1, M1, reason).await.unwrap();
        }

        let listed = list_warnings(&db, U1).await;
        let got: Vec<&str> = listed.iter().map(|entry| entry.reason.as_str()).collect();
        assert_eq!(got, reasons);
        assert!(listed.windows(2).all(|pair| pair[0].time <= pair[1].time));
    }

    #[tokio::test]
    async fn unwarn_without_warnings_skips_the_store() {
        let db = memory_db();

        assert!(remove_last_warning(&db, U1).await.unwrap().is_none());
        assert_eq!(db.store().write_count(), 0);

        record_warning(&db, U1, M1, "spam").await.unwrap();
        remove_last_warning(&db, U1).await.unwrap();
        assert_eq!(db.store().write_count(), 2);

        assert!(remove_last_warning(&db, U1).await.unwrap().is_none());
        assert_eq!(db.store().write_count(), 2);
    }

    #[tokio::test]
    async fn members_are_independent() {
        let db = memory_db();

        record_warning(&db, U1, M1, "one").await.unwrap();
        record_warning(&db, U1 + 1, M1, "two").await.unwrap();

        assert_eq!(warning_count(&db, U1).await, 1);
        assert_eq!(warning_count(&db, U1 + 1).await, 1);
        assert!(list_warnings(&db, U1 + 2).await.is_empty());
    }

    #[tokio::test]
    async fn every_mutation_is_mirrored_in_the_store() {
        let store = LedgerStore::in_memory();
        let db = Database::with_ledger(Ledger::new(), store.clone());

        record_warning(&db, U1, M1, "spam").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(db.snapshot().await));

        record_warning(&db, U1, M2, "spam again").await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(db.snapshot().await));

        remove_last_warning(&db, U1).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(db.snapshot().await));
    }

    #[tokio::test]
    async fn json_ledger_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warns.json");

        let db = Database::open(LedgerStore::json_file(&path)).await;
        record_warning(&db, U1, M1, "spam").await.unwrap();
        record_warning(&db, U1, M2, "spam again").await.unwrap();
        remove_last_warning(&db, U1).await.unwrap();
        let before = db.snapshot().await;

        let reopened = Database::open(LedgerStore::json_file(&path)).await;
        assert_eq!(reopened.snapshot().await, before);
        assert_eq!(summary(&list_warnings(&reopened, U1).await), vec![(M1, "spam")]);
    }

    #[tokio::test]
    async fn failed_save_rolls_back_the_warning() {
        let dir = tempdir().unwrap();
        // A directory cannot be replaced by the staged file, so every save fails.
        let path = dir.path().join("warns.json");
        std::fs::create_dir(&path).unwrap();

        let db = Database::with_ledger(Ledger::new(), LedgerStore::json_file(&path));

        assert!(record_warning(&db, U1, M1, "spam").await.is_err());
        assert!(db.snapshot().await.is_empty());
        assert_eq!(db.store().write_count(), 0);
    }

    // Swap the saved ledger for a directory so the staged file can no longer replace it.
    fn block_saves(path: &std::path::Path) {
        std::fs::remove_file(path).unwrap();
        std::fs::create_dir(path).unwrap();
    }

    #[tokio::test]
    async fn failed_save_restores_the_last_warning() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warns.json");
        let db = Database::open(LedgerStore::json_file(&path)).await;
        record_warning(&db, U1, M1, "spam").await.unwrap();
        let writes = db.store().write_count();

        block_saves(&path);

        assert!(remove_last_warning(&db, U1).await.is_err());
        assert_eq!(summary(&list_warnings(&db, U1).await), vec![(M1, "spam")]);
        assert_eq!(db.store().write_count(), writes);
    }

    #[tokio::test]
    async fn failed_save_keeps_earlier_warnings_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("warns.json");
        let db = Database::open(LedgerStore::json_file(&path)).await;
        record_warning(&db, U1, M1, "spam").await.unwrap();
        record_warning(&db, U1, M2, "spam again").await.unwrap();
        let writes = db.store().write_count();

        block_saves(&path);

        assert!(remove_last_warning(&db, U1).await.is_err());
        assert_eq!(
            summary(&list_warnings(&db, U1).await),
            vec![(M1, "spam"), (M2, "spam again")]
        );
        assert_eq!(db.store().write_count(), writes);
    }

    #[tokio::test]
    async fn concurrent_warns_are_not_lost() {
        let db = memory_db();

        let mut tasks = Vec::new();
        for index in 0..16_u64 {
            let db = db.clone();
            tasks.push(tokio::spawn(async move {
                record_warning(&db, U1, M1 + index, "burst").await.unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(warning_count(&db, U1).await, 16);
        assert_eq!(store_len(&db).await, 16);
    }

    async fn store_len(db: &Database) -> usize {
        db.store()
            .load()
            .await
            .unwrap()
            .and_then(|ledger| ledger.get(&U1).map(Vec::len))
            .unwrap_or(0)
    }
}
