// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded document database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `users`: user_id → JSON `User`
//! - `posts`: post_id → JSON `Post`
//! - `comments`: comment_id → JSON `Comment`
//! - `events`: event_id → JSON `Event`
//! - `user_emails`: normalized email → user_id (uniqueness index)
//!
//! Every mutating operation runs inside a single redb write transaction.
//! redb admits one writer at a time, so a read-modify-write performed in
//! [`DocumentDb::write`] cannot interleave with another request touching
//! the same document.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use serde::{de::DeserializeOwned, Serialize};

// =============================================================================
// Table Definitions
// =============================================================================

/// Collection tables share one shape: document id → serialized JSON bytes.
type CollectionTable = TableDefinition<'static, &'static str, &'static [u8]>;

/// Secondary index tables map a lookup key to a document id.
pub type IndexTable = TableDefinition<'static, &'static str, &'static str>;

/// Index: lower-cased email → user_id.
pub const USER_EMAILS: IndexTable = TableDefinition::new("user_emails");

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0} already exists")]
    AlreadyExists(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Documents
// =============================================================================

/// A record stored as one JSON document in a named collection.
pub trait Document: Serialize + DeserializeOwned {
    /// Table name of the collection.
    const COLLECTION: &'static str;

    /// Human-readable kind used in error messages ("Comment", "Post", ...).
    const KIND: &'static str;

    /// Primary key of this document.
    fn id(&self) -> &str;
}

fn collection<D: Document>() -> CollectionTable {
    TableDefinition::new(D::COLLECTION)
}

fn not_found<D: Document>(id: &str) -> StorageError {
    StorageError::NotFound(format!("{} {id}", D::KIND))
}

// =============================================================================
// DocumentDb
// =============================================================================

/// Embedded ACID document database.
pub struct DocumentDb {
    db: Database,
}

impl DocumentDb {
    /// Open (or create) the database at the given path.
    ///
    /// `tables` lists every collection the application uses; they are
    /// created up front so later read transactions never fail on a missing
    /// table.
    pub fn open(path: &Path, tables: &[&'static str]) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        {
            for &name in tables {
                let table: CollectionTable = TableDefinition::new(name);
                let _ = write_txn.open_table(table)?;
            }
            let _ = write_txn.open_table(USER_EMAILS)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Verify that a read transaction can be started.
    pub fn health_check(&self) -> StorageResult<()> {
        let read_txn = self.db.begin_read()?;
        let _ = read_txn.open_table(USER_EMAILS)?;
        Ok(())
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Look up a single document by id.
    pub fn get<D: Document>(&self, id: &str) -> StorageResult<Option<D>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection::<D>())?;
        let doc = match table.get(id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(doc)
    }

    /// Look up a single document by id, failing with `NotFound`.
    pub fn fetch<D: Document>(&self, id: &str) -> StorageResult<D> {
        self.get(id)?.ok_or_else(|| not_found::<D>(id))
    }

    /// All documents of a collection for which `keep` returns true.
    pub fn list_where<D: Document>(&self, keep: impl Fn(&D) -> bool) -> StorageResult<Vec<D>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(collection::<D>())?;

        let mut docs = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let doc: D = serde_json::from_slice(value.value())?;
            if keep(&doc) {
                docs.push(doc);
            }
        }
        Ok(docs)
    }

    /// Resolve an index key to a document id.
    pub fn index_lookup(&self, index: IndexTable, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(index)?;
        let id = table.get(key)?.map(|v| v.value().to_string());
        Ok(id)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Run `f` inside one write transaction.
    ///
    /// The transaction commits only if `f` returns `Ok`; on error it is
    /// dropped and nothing `f` wrote becomes visible.
    pub fn write<T>(&self, f: impl FnOnce(&WriteScope<'_>) -> StorageResult<T>) -> StorageResult<T> {
        let write_txn = self.db.begin_write()?;
        let value = f(&WriteScope { txn: &write_txn })?;
        write_txn.commit()?;
        Ok(value)
    }

    /// Insert a new document; fails if the id is taken.
    pub fn insert<D: Document>(&self, doc: &D) -> StorageResult<()> {
        self.write(|scope| scope.insert(doc))
    }

    /// Atomically load, mutate and store one document.
    ///
    /// Returns the stored document together with whatever `f` returned.
    pub fn update<D: Document, R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut D) -> StorageResult<R>,
    ) -> StorageResult<(D, R)> {
        self.write(|scope| {
            let mut doc = scope.fetch::<D>(id)?;
            let outcome = f(&mut doc)?;
            scope.put(&doc)?;
            Ok((doc, outcome))
        })
    }

    /// Remove a document, returning it.
    pub fn remove<D: Document>(&self, id: &str) -> StorageResult<D> {
        self.write(|scope| scope.remove::<D>(id)?.ok_or_else(|| not_found::<D>(id)))
    }

    /// Remove every document of a collection, returning how many were removed.
    pub fn clear<D: Document>(&self) -> StorageResult<usize> {
        self.write(|scope| scope.remove_where::<D>(|_| true))
    }
}

// =============================================================================
// WriteScope
// =============================================================================

/// Typed view over an open write transaction.
///
/// Each call opens the table it needs and releases it before returning, so
/// calls can be freely sequenced within one transaction.
pub struct WriteScope<'t> {
    txn: &'t WriteTransaction,
}

impl WriteScope<'_> {
    pub fn get<D: Document>(&self, id: &str) -> StorageResult<Option<D>> {
        let table = self.txn.open_table(collection::<D>())?;
        let doc = match table.get(id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(doc)
    }

    pub fn fetch<D: Document>(&self, id: &str) -> StorageResult<D> {
        self.get(id)?.ok_or_else(|| not_found::<D>(id))
    }

    /// Write a document, replacing any previous version.
    pub fn put<D: Document>(&self, doc: &D) -> StorageResult<()> {
        let json = serde_json::to_vec(doc)?;
        let mut table = self.txn.open_table(collection::<D>())?;
        table.insert(doc.id(), json.as_slice())?;
        Ok(())
    }

    /// Write a document that must not exist yet.
    pub fn insert<D: Document>(&self, doc: &D) -> StorageResult<()> {
        if self.get::<D>(doc.id())?.is_some() {
            return Err(StorageError::AlreadyExists(format!("{} {}", D::KIND, doc.id())));
        }
        self.put(doc)
    }

    pub fn remove<D: Document>(&self, id: &str) -> StorageResult<Option<D>> {
        let mut table = self.txn.open_table(collection::<D>())?;
        let removed = match table.remove(id)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(removed)
    }

    /// Remove every document matching `predicate`.
    pub fn remove_where<D: Document>(&self, predicate: impl Fn(&D) -> bool) -> StorageResult<usize> {
        let mut table = self.txn.open_table(collection::<D>())?;

        let mut doomed = Vec::new();
        for entry in table.iter()? {
            let (key, value) = entry?;
            let doc: D = serde_json::from_slice(value.value())?;
            if predicate(&doc) {
                doomed.push(key.value().to_string());
            }
        }

        for id in &doomed {
            table.remove(id.as_str())?;
        }
        Ok(doomed.len())
    }

    pub fn index_get(&self, index: IndexTable, key: &str) -> StorageResult<Option<String>> {
        let table = self.txn.open_table(index)?;
        let id = table.get(key)?.map(|v| v.value().to_string());
        Ok(id)
    }

    pub fn index_put(&self, index: IndexTable, key: &str, id: &str) -> StorageResult<()> {
        let mut table = self.txn.open_table(index)?;
        table.insert(key, id)?;
        Ok(())
    }

    pub fn index_remove(&self, index: IndexTable, key: &str) -> StorageResult<()> {
        let mut table = self.txn.open_table(index)?;
        table.remove(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Note {
        id: String,
        body: String,
    }

    impl Document for Note {
        const COLLECTION: &'static str = "notes";
        const KIND: &'static str = "Note";

        fn id(&self) -> &str {
            &self.id
        }
    }

    fn note(id: &str, body: &str) -> Note {
        Note {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    fn setup() -> (TempDir, DocumentDb) {
        let temp = TempDir::new().unwrap();
        let db = DocumentDb::open(&temp.path().join("test.redb"), &[Note::COLLECTION]).unwrap();
        (temp, db)
    }

    #[test]
    fn insert_and_get() {
        let (_temp, db) = setup();
        db.insert(&note("n1", "hello")).unwrap();

        assert_eq!(db.get::<Note>("n1").unwrap(), Some(note("n1", "hello")));
        assert_eq!(db.get::<Note>("missing").unwrap(), None);
        assert_eq!(db.list_where::<Note>(|_| true).unwrap().len(), 1);
    }

    #[test]
    fn insert_rejects_duplicate_id() {
        let (_temp, db) = setup();
        db.insert(&note("n1", "first")).unwrap();

        let result = db.insert(&note("n1", "second"));
        assert!(matches!(result, Err(StorageError::AlreadyExists(_))));
        assert_eq!(db.fetch::<Note>("n1").unwrap().body, "first");
    }

    #[test]
    fn fetch_missing_is_not_found() {
        let (_temp, db) = setup();
        let err = db.fetch::<Note>("ghost").unwrap_err();
        assert!(matches!(err, StorageError::NotFound(ref what) if what == "Note ghost"));
    }

    #[test]
    fn update_persists_mutation() {
        let (_temp, db) = setup();
        db.insert(&note("n1", "before")).unwrap();

        let (updated, len) = db
            .update::<Note, _>("n1", |n| {
                n.body = "after".to_string();
                Ok(n.body.len())
            })
            .unwrap();

        assert_eq!(updated.body, "after");
        assert_eq!(len, 5);
        assert_eq!(db.fetch::<Note>("n1").unwrap().body, "after");
    }

    #[test]
    fn failed_write_is_rolled_back() {
        let (_temp, db) = setup();
        db.insert(&note("n1", "kept")).unwrap();

        let result: StorageResult<()> = db.write(|scope| {
            scope.put(&note("n1", "discarded"))?;
            scope.put(&note("n2", "discarded"))?;
            Err(StorageError::AlreadyExists("Note n2".to_string()))
        });

        assert!(result.is_err());
        assert_eq!(db.fetch::<Note>("n1").unwrap().body, "kept");
        assert!(db.get::<Note>("n2").unwrap().is_none());
    }

    #[test]
    fn remove_and_clear() {
        let (_temp, db) = setup();
        for i in 1..=3 {
            db.insert(&note(&format!("n{i}"), "x")).unwrap();
        }

        let removed = db.remove::<Note>("n2").unwrap();
        assert_eq!(removed.id, "n2");
        assert!(matches!(
            db.remove::<Note>("n2"),
            Err(StorageError::NotFound(_))
        ));

        assert_eq!(db.clear::<Note>().unwrap(), 2);
        assert!(db.list_where::<Note>(|_| true).unwrap().is_empty());
    }

    #[test]
    fn list_where_filters() {
        let (_temp, db) = setup();
        db.insert(&note("a", "keep")).unwrap();
        db.insert(&note("b", "drop")).unwrap();
        db.insert(&note("c", "keep")).unwrap();

        let mut kept = db.list_where::<Note>(|n| n.body == "keep").unwrap();
        kept.sort_by(|x, y| x.id.cmp(&y.id));
        assert_eq!(kept, vec![note("a", "keep"), note("c", "keep")]);
    }

    #[test]
    fn index_round_trip() {
        let (_temp, db) = setup();
        db.write(|scope| scope.index_put(USER_EMAILS, "a@example.com", "u1"))
            .unwrap();
        assert_eq!(
            db.index_lookup(USER_EMAILS, "a@example.com").unwrap(),
            Some("u1".to_string())
        );

        db.write(|scope| scope.index_remove(USER_EMAILS, "a@example.com"))
            .unwrap();
        assert_eq!(db.index_lookup(USER_EMAILS, "a@example.com").unwrap(), None);
    }

    #[test]
    fn health_check_passes_on_open_db() {
        let (_temp, db) = setup();
        db.health_check().unwrap();
    }
}
