//! Local storage backend

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::{BlobStore, FileRecord, FolderId, Result, StorageError, StorageSink};

const ROOT_FOLDER_ID: &str = "root";

type FileRow = (String, String, String, String, i64, String, i64);

/// Folder registry in SQLite, file contents in a blob store
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
    blobs: Arc<BlobStore>,
}

impl Storage {
    /// Open (or create) the storage rooted at `root`
    pub async fn new(root: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(root).await?;

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(root.join("registry.db"))
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal),
            )
            .await?;

        Self::initialize_schema(&pool).await?;

        let blobs = BlobStore::new(root.join("blobs"))?;

        tracing::debug!(root = %root.display(), "opened storage");

        Ok(Self {
            pool,
            blobs: Arc::new(blobs),
        })
    }

    async fn initialize_schema(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS folders (
                id TEXT PRIMARY KEY,
                parent_id TEXT REFERENCES folders(id),
                name TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                UNIQUE (parent_id, name)
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS files (
                id TEXT PRIMARY KEY,
                folder_id TEXT NOT NULL REFERENCES folders(id),
                name TEXT NOT NULL,
                content_hash TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                mime_type TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_files_folder ON files(folder_id, created_at)")
            .execute(pool)
            .await?;

        sqlx::query(
            "INSERT OR IGNORE INTO folders (id, parent_id, name, created_at) VALUES (?, NULL, '', ?)",
        )
        .bind(ROOT_FOLDER_ID)
        .bind(OffsetDateTime::now_utc().unix_timestamp())
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn folder_exists(&self, id: &FolderId) -> Result<bool> {
        let found: Option<String> = sqlx::query_scalar("SELECT id FROM folders WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        Ok(found.is_some())
    }

    /// Contents of a stored file
    pub async fn read_file(&self, file_id: &str) -> Result<Vec<u8>> {
        let hash: Option<String> = sqlx::query_scalar("SELECT content_hash FROM files WHERE id = ?")
            .bind(file_id)
            .fetch_optional(&self.pool)
            .await?;
        let hash = hash.ok_or_else(|| StorageError::FileNotFound(file_id.to_string()))?;
        self.blobs.retrieve(&hash).await
    }
}

fn file_record(row: FileRow) -> Result<FileRecord> {
    let (id, folder_id, name, content_hash, size_bytes, mime_type, created_at) = row;
    Ok(FileRecord {
        id,
        folder_id: FolderId(folder_id),
        name,
        content_hash,
        size_bytes: u64::try_from(size_bytes).map_err(|e| anyhow::anyhow!(e))?,
        mime_type,
        created_at: OffsetDateTime::from_unix_timestamp(created_at)
            .map_err(|e| anyhow::anyhow!(e))?,
    })
}

#[async_trait]
impl StorageSink for Storage {
    fn root(&self) -> FolderId {
        FolderId(ROOT_FOLDER_ID.to_string())
    }

    async fn find_folder(&self, name: &str, parent: &FolderId) -> Result<Option<FolderId>> {
        let id: Option<String> =
            sqlx::query_scalar("SELECT id FROM folders WHERE parent_id = ? AND name = ?")
                .bind(parent.as_str())
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;
        Ok(id.map(FolderId))
    }

    async fn create_folder(&self, name: &str, parent: &FolderId) -> Result<FolderId> {
        if !self.folder_exists(parent).await? {
            return Err(StorageError::FolderNotFound(parent.to_string()));
        }

        let id = uuid::Uuid::new_v4().to_string();
        let inserted = sqlx::query(
            "INSERT OR IGNORE INTO folders (id, parent_id, name, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(parent.as_str())
        .bind(name)
        .bind(OffsetDateTime::now_utc().unix_timestamp())
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted == 1 {
            tracing::debug!(folder = %id, parent = %parent, name, "created folder");
            return Ok(FolderId(id));
        }

        // Lost a race against another writer; use its folder
        self.find_folder(name, parent)
            .await?
            .ok_or_else(|| StorageError::FolderNotFound(name.to_string()))
    }

    async fn upload(
        &self,
        folder: &FolderId,
        name: &str,
        bytes: &[u8],
        mime_type: &str,
    ) -> Result<FileRecord> {
        if !self.folder_exists(folder).await? {
            return Err(StorageError::FolderNotFound(folder.to_string()));
        }

        let content_hash = self.blobs.store(bytes).await?;
        let record = FileRecord {
            id: uuid::Uuid::new_v4().to_string(),
            folder_id: folder.clone(),
            name: name.to_string(),
            content_hash,
            size_bytes: bytes.len() as u64,
            mime_type: mime_type.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };

        sqlx::query(
            r#"
            INSERT INTO files (id, folder_id, name, content_hash, size_bytes, mime_type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(record.folder_id.as_str())
        .bind(&record.name)
        .bind(&record.content_hash)
        .bind(bytes.len() as i64)
        .bind(&record.mime_type)
        .bind(record.created_at.unix_timestamp())
        .execute(&self.pool)
        .await?;

        tracing::info!(file = %record.id, folder = %folder, name, size = record.size_bytes, "stored file");

        Ok(record)
    }

    async fn list_files(&self, folder: &FolderId) -> Result<Vec<FileRecord>> {
        let rows: Vec<FileRow> = sqlx::query_as(
            r#"
            SELECT id, folder_id, name, content_hash, size_bytes, mime_type, created_at
            FROM files
            WHERE folder_id = ?
            ORDER BY created_at ASC, name ASC
            "#,
        )
        .bind(folder.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(file_record).collect()
    }
}
