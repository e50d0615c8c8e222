//! Backup command implementations.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tabled::{Table, Tabled, settings::Style};

use crate::backup::{
    AssumeYes, LocalFiles, PickedFile, TerminalPrompt, export_snapshot, export_status,
    get_backup_dir, import_snapshot,
};
use crate::state::AppState;
use crate::store::{Collection, DocumentStore, JsonStore};

#[derive(Tabled)]
struct CountRow {
    #[tabled(rename = "Collection")]
    collection: String,
    #[tabled(rename = "Records")]
    records: String,
}

fn counts_table(counts: &BTreeMap<Collection, usize>) -> String {
    let mut rows: Vec<CountRow> = counts
        .iter()
        .map(|(collection, count)| CountRow {
            collection: collection.to_string(),
            records: count.to_string(),
        })
        .collect();
    rows.push(CountRow {
        collection: "Total".to_string(),
        records: counts.values().sum::<usize>().to_string(),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// Export every collection to a backup file.
pub async fn export(store_path: &Path, out: Option<PathBuf>) -> miette::Result<String> {
    let store = JsonStore::open(store_path)?;
    let state = AppState::load_from_store(&store).await?;

    let files = LocalFiles::new(out.unwrap_or_else(get_backup_dir));
    let result = export_snapshot(&state, &files);
    let status = export_status(&result);

    let icon = if status.success { "✓" } else { "✗" };
    let mut output = format!("{} {}\n", icon, status.message);
    if let Ok(receipt) = &result {
        output.push_str(&format!("Saved to: {}\n\n", receipt.path.display()));
        output.push_str(&counts_table(receipt.summary.counts()));
    }
    Ok(output)
}

/// Restore a backup file into the store.
pub async fn import(store_path: &Path, file: &Path, yes: bool) -> miette::Result<String> {
    let store = JsonStore::open(store_path)?;
    let mut state = AppState::load_from_store(&store).await?;
    let picked = PickedFile::read(file)?;

    let report = if yes {
        import_snapshot(&store, &mut state, &AssumeYes, picked).await
    } else {
        import_snapshot(&store, &mut state, &TerminalPrompt, picked).await
    };

    let icon = if report.status.success { "✓" } else { "✗" };
    let mut output = format!("{} {}\n", icon, report.status.message);
    if let Some(outcome) = &report.outcome {
        output.push('\n');
        output.push_str(&counts_table(outcome.summary.counts()));
    }
    Ok(output)
}

/// Show per-collection record counts for the store.
pub async fn status(store_path: &Path) -> miette::Result<String> {
    let store = JsonStore::open(store_path)?;

    let mut counts = BTreeMap::new();
    for collection in Collection::ALL {
        counts.insert(collection, store.list_all(collection).await?.len());
    }

    let mut output = format!("Store: {}\n\n", store.path().display());
    output.push_str(&counts_table(&counts));
    Ok(output)
}
