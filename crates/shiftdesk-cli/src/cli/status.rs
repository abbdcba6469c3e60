//! Draft storage status command.

use anyhow::Result;
use console::style;

use shiftdesk_core::storage::kv_store::KvStore;
use shiftdesk_types::draft::ReportKind;

use crate::state::AppState;

/// Display draft counts, storage usage against the quota, and settings.
pub async fn status(state: &AppState, json: bool) -> Result<()> {
    let drafts = state.lifecycle.list(None).await;
    let by_kind: Vec<(ReportKind, usize)> = ReportKind::ALL
        .iter()
        .map(|&kind| (kind, drafts.iter().filter(|d| d.kind() == kind).count()))
        .collect();

    let store = state.lifecycle.store();
    let used_bytes = match store.kv().get(store.key()).await {
        Ok(value) => value.map_or(0, |v| v.len()),
        Err(e) => {
            tracing::warn!(error = %e, "could not read draft collection size");
            0
        }
    };
    let quota = state.config.max_value_bytes;

    if json {
        let kinds: serde_json::Map<String, serde_json::Value> = by_kind
            .iter()
            .map(|(kind, count)| (kind.to_string(), serde_json::json!(count)))
            .collect();
        let status = serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "data_dir": state.data_dir.display().to_string(),
            "drafts": {
                "total": drafts.len(),
                "by_kind": kinds,
            },
            "storage": {
                "key": state.config.storage_key,
                "used_bytes": used_bytes,
                "quota_bytes": quota,
            },
            "autosave_delay_ms": state.config.autosave_delay_ms,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!();
    println!("  {} ShiftDesk v{}", style("■").cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!();

    println!("  {}", style("── Drafts ──").dim());
    println!("  Total: {}", style(drafts.len()).bold());
    for (kind, count) in by_kind.iter().filter(|(_, c)| *c > 0) {
        println!("  {:<22} {}", kind.title(), count);
    }
    println!();

    println!("  {}", style("── Storage ──").dim());
    let percent = if quota == 0 {
        0.0
    } else {
        used_bytes as f64 * 100.0 / quota as f64
    };
    let usage = format!("{used_bytes} / {quota} bytes ({percent:.1}%)");
    if percent >= 90.0 {
        println!("  Used: {}", style(usage).red());
    } else {
        println!("  Used: {}", style(usage).green());
    }
    println!("  Key:  {}", style(&state.config.storage_key).dim());
    println!();

    println!("  {}", style("── System ──").dim());
    println!("  Data dir:  {}", style(state.data_dir.display()).dim());
    println!("  Autosave:  {} ms after last change", state.config.autosave_delay_ms);
    println!("  Database:  {}", style("SQLite (WAL mode)").dim());
    println!();

    Ok(())
}
