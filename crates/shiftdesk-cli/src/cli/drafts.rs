//! Draft management subcommands.
//!
//! Lists, inspects, deletes and exports the drafts that report forms have
//! autosaved. Exporting decodes stored attachments back into files.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use dialoguer::Confirm;

use shiftdesk_infra::filesystem::export_attachment;
use shiftdesk_types::attachment::Attachment;
use shiftdesk_types::draft::{DraftId, ReportKind};
use shiftdesk_types::report::{FormState, Report};

use crate::state::AppState;

/// Draft subcommands.
#[derive(Subcommand)]
pub enum DraftsCommand {
    /// List saved drafts, most recent first.
    #[command(alias = "ls")]
    List {
        /// Only show drafts of this report kind.
        #[arg(long)]
        kind: Option<ReportKind>,
    },

    /// Show one draft.
    Show {
        /// Draft id.
        id: String,
    },

    /// Delete one draft.
    #[command(alias = "rm")]
    Delete {
        /// Draft id.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Delete every draft.
    Purge {
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Write a draft's attachments to a directory.
    Export {
        /// Draft id.
        id: String,

        /// Target directory (created if missing).
        dir: PathBuf,
    },
}

/// Handle a drafts subcommand.
pub async fn handle_drafts_command(cmd: DraftsCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        DraftsCommand::List { kind } => list_drafts(state, kind, json).await,
        DraftsCommand::Show { id } => show_draft(state, &DraftId(id), json).await,
        DraftsCommand::Delete { id, force } => delete_draft(state, &DraftId(id), force, json).await,
        DraftsCommand::Purge { force } => purge_drafts(state, force, json).await,
        DraftsCommand::Export { id, dir } => export_draft(state, &DraftId(id), &dir, json).await,
    }
}

async fn list_drafts(state: &AppState, kind: Option<ReportKind>, json: bool) -> Result<()> {
    let summaries = state.lifecycle.list_summaries(kind).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.is_empty() {
        println!();
        println!("  {} No drafts saved.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Id").fg(Color::White),
        Cell::new("Report").fg(Color::White),
        Cell::new("Location").fg(Color::White),
        Cell::new("Updated").fg(Color::White),
    ]);

    for summary in &summaries {
        table.add_row(vec![
            Cell::new(&summary.id).fg(Color::DarkGrey),
            Cell::new(&summary.title).fg(Color::Cyan),
            Cell::new(&summary.location),
            Cell::new(format_relative_time(&summary.updated_at)),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!("  {} draft(s)", summaries.len());
    println!();

    Ok(())
}

async fn show_draft(state: &AppState, id: &DraftId, json: bool) -> Result<()> {
    let Some(draft) = state.lifecycle.store().get(id).await else {
        bail!("Draft '{id}' not found");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&draft)?);
        return Ok(());
    }

    let summary = draft.summary();
    println!();
    println!(
        "  {} {}",
        style(&summary.title).cyan().bold(),
        style(format!("({})", draft.id)).dim()
    );
    println!();
    println!("  {:<10} {}", style("Location").bold(), summary.location);
    println!("  {:<10} {}", style("Created").bold(), draft.created_at.format("%Y-%m-%d %H:%M"));
    println!(
        "  {:<10} {} ({})",
        style("Updated").bold(),
        draft.updated_at.format("%Y-%m-%d %H:%M"),
        format_relative_time(&draft.updated_at)
    );

    // Decoding tells us which attachments are still recoverable.
    if let Some(form) = state.lifecycle.load(id).await {
        let files = attachments(&form);
        if !files.is_empty() {
            let mut table = Table::new();
            table.load_preset(presets::UTF8_FULL_CONDENSED);
            table.set_header(vec!["Field", "File", "Type", "Size"]);
            for (field, file) in &files {
                table.add_row(vec![
                    Cell::new(field),
                    Cell::new(&file.name),
                    Cell::new(&file.mime_type),
                    Cell::new(format_size(file.size_bytes)),
                ]);
            }
            println!();
            println!("{table}");
        }
    }
    println!();

    Ok(())
}

async fn delete_draft(state: &AppState, id: &DraftId, force: bool, json: bool) -> Result<()> {
    let Some(draft) = state.lifecycle.store().get(id).await else {
        bail!("Draft '{id}' not found");
    };

    if !force && !json {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete draft '{}' ({})?",
                style(draft.kind().title()).red().bold(),
                draft.summary().location
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let deleted = state.lifecycle.discard(id).await;
    if !deleted {
        bail!("Draft '{id}' could not be deleted");
    }

    if json {
        println!("{}", serde_json::json!({ "deleted": true, "id": id }));
    } else {
        println!("  {} Draft '{}' deleted.", style("✓").red().bold(), id);
    }

    Ok(())
}

async fn purge_drafts(state: &AppState, force: bool, json: bool) -> Result<()> {
    if !force && !json {
        let count = state.lifecycle.list(None).await.len();
        if count == 0 {
            println!("  Nothing to purge.");
            return Ok(());
        }
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Delete all {} draft(s)? This cannot be undone.",
                style(count).red().bold()
            ))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("  Cancelled.");
            return Ok(());
        }
    }

    let removed = state.lifecycle.purge().await?;

    if json {
        println!("{}", serde_json::json!({ "purged": removed }));
    } else {
        println!("  {} {} draft(s) deleted.", style("✓").red().bold(), removed);
    }

    Ok(())
}

async fn export_draft(state: &AppState, id: &DraftId, dir: &Path, json: bool) -> Result<()> {
    let Some(form) = state.lifecycle.load(id).await else {
        bail!("Draft '{id}' not found");
    };

    let files = attachments(&form);
    let numbered = files.len() > 1;
    let mut written = Vec::with_capacity(files.len());
    for (index, (_, file)) in files.iter().enumerate() {
        let prefix = numbered.then(|| format!("{:02}", index + 1));
        written.push(export_attachment(dir, prefix.as_deref(), file).await?);
    }

    if json {
        let paths: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
        println!("{}", serde_json::json!({ "id": id, "files": paths }));
        return Ok(());
    }

    if written.is_empty() {
        println!("  {} Draft has no attachments.", style("i").blue().bold());
    } else {
        for path in &written {
            println!("  {} {}", style("✓").green(), path.display());
        }
    }

    Ok(())
}

/// Every attachment in a form, with the field it belongs to.
fn attachments(form: &FormState) -> Vec<(&'static str, &Attachment)> {
    match form {
        Report::Shift(shift) => shift.photo.iter().map(|p| ("photo", p)).collect(),
        Report::Receiving(log) => log.photos.iter().map(|p| ("photos", p)).collect(),
        Report::Inventory(_) | Report::Writeoff(_) | Report::Transfer(_) => Vec::new(),
    }
}

fn format_relative_time(dt: &chrono::DateTime<chrono::Utc>) -> String {
    let now = chrono::Utc::now();
    let diff = now - *dt;

    if diff.num_minutes() < 1 {
        "just now".to_string()
    } else if diff.num_hours() < 1 {
        format!("{}m ago", diff.num_minutes())
    } else if diff.num_days() < 1 {
        format!("{}h ago", diff.num_hours())
    } else {
        dt.format("%Y-%m-%d").to_string()
    }
}

/// Format bytes into a human-readable size string.
fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
