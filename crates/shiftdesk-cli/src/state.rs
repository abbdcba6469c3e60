//! Application state wiring the draft lifecycle to SQLite.

use std::path::PathBuf;
use std::sync::Arc;

use shiftdesk_core::draft::{DraftLifecycle, DraftStore};
use shiftdesk_infra::config::load_drafts_config;
use shiftdesk_infra::filesystem::resolve_data_dir;
use shiftdesk_infra::sqlite::kv::SqliteKvStore;
use shiftdesk_infra::sqlite::pool::{DatabasePool, database_url};
use shiftdesk_types::config::DraftsConfig;

/// Lifecycle controller pinned to the SQLite key-value store.
pub type ConcreteDraftLifecycle = DraftLifecycle<SqliteKvStore>;

/// Shared state for CLI commands.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<ConcreteDraftLifecycle>,
    pub config: DraftsConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Resolve the data directory, load config and open the database.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        tokio::fs::create_dir_all(&data_dir).await?;

        let config = load_drafts_config(&data_dir).await;

        let db_url = format!("{}?mode=rwc", database_url(&data_dir));
        let db_pool = DatabasePool::new(&db_url).await?;

        let kv = SqliteKvStore::with_quota(db_pool, config.max_value_bytes);
        let lifecycle = DraftLifecycle::new(DraftStore::new(kv, config.storage_key.clone()));

        tracing::debug!(data_dir = %data_dir.display(), storage_key = %config.storage_key, "app state ready");

        Ok(Self {
            lifecycle: Arc::new(lifecycle),
            config,
            data_dir,
        })
    }
}
