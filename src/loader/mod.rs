//! Offline bulk import of recipe entries.
//!
//! The input is a JSON object mapping arbitrary keys to raw entries. Entries
//! that cannot be turned into a row are counted and skipped. Rows are written
//! in batches, each committed on its own, so a failure part-way through keeps
//! everything committed before it.

pub mod clean;

use std::path::Path;

use anyhow::{bail, Context};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{pool::PoolConnection, Connection, PgPool, Postgres};
use tracing::{info, warn};

use crate::recipes::{repo, NewRecipe};

pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Destination for cleaned rows.
#[async_trait]
pub trait RecipeSink: Send {
    /// Writes and commits one batch.
    async fn write_batch(&mut self, batch: &[NewRecipe]) -> anyhow::Result<()>;
}

/// Writes into Postgres over a single connection held for the whole load.
pub struct PgRecipeSink {
    conn: PoolConnection<Postgres>,
}

impl PgRecipeSink {
    pub async fn acquire(pool: &PgPool) -> anyhow::Result<Self> {
        let conn = pool.acquire().await.context("acquire loader connection")?;
        Ok(Self { conn })
    }

    /// Empties the table so a re-run does not duplicate rows.
    pub async fn clear(&mut self) -> anyhow::Result<()> {
        repo::truncate(&mut *self.conn)
            .await
            .context("truncate recipes")?;
        warn!("recipes table truncated");
        Ok(())
    }
}

#[async_trait]
impl RecipeSink for PgRecipeSink {
    async fn write_batch(&mut self, batch: &[NewRecipe]) -> anyhow::Result<()> {
        // Rolled back on drop unless committed.
        let mut tx = self.conn.begin().await.context("begin batch")?;
        repo::insert_batch(&mut *tx, batch)
            .await
            .context("insert batch")?;
        tx.commit().await.context("commit batch")?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub failed: usize,
}

pub struct Loader<S> {
    sink: S,
    batch_size: usize,
}

impl<S: RecipeSink> Loader<S> {
    pub fn new(sink: S, batch_size: usize) -> Self {
        Self {
            sink,
            batch_size: batch_size.max(1),
        }
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub async fn load_file(&mut self, path: &Path) -> anyhow::Result<LoadReport> {
        let raw = tokio::fs::read(path)
            .await
            .with_context(|| format!("read {}", path.display()))?;
        let doc: Value = serde_json::from_slice(&raw)
            .with_context(|| format!("parse {} as JSON", path.display()))?;
        self.load_document(&doc).await
    }

    pub async fn load_document(&mut self, doc: &Value) -> anyhow::Result<LoadReport> {
        let Value::Object(entries) = doc else {
            bail!("top level of the recipe file must be a JSON object");
        };
        info!(entries = entries.len(), batch_size = self.batch_size, "loading recipes");

        let mut report = LoadReport::default();
        let mut buffer = Vec::with_capacity(self.batch_size);
        for (key, entry) in entries {
            match clean::parse_entry(entry) {
                Ok(row) => buffer.push(row),
                Err(e) => {
                    report.failed += 1;
                    warn!(key = %key, error = %e, "skipping entry");
                    continue;
                }
            }
            if buffer.len() >= self.batch_size {
                self.flush(&mut buffer, &mut report).await?;
            }
        }
        self.flush(&mut buffer, &mut report).await?;

        info!(loaded = report.loaded, failed = report.failed, "load finished");
        Ok(report)
    }

    async fn flush(
        &mut self,
        buffer: &mut Vec<NewRecipe>,
        report: &mut LoadReport,
    ) -> anyhow::Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }
        self.sink.write_batch(buffer.as_slice()).await?;
        report.loaded += buffer.len();
        info!(batch = buffer.len(), loaded = report.loaded, "batch committed");
        buffer.clear();
        Ok(())
    }
}
