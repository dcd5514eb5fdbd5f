//! Terminal renderings of the grid, stats and collection views

use anyhow::{bail, Result};
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};
use tracing::warn;

use dexboard_core::{placeholder_or, AcquireOutcome, Engine, EntryId, Snapshot};

/// Table row for the catalog grid
#[derive(Tabled)]
struct GridRow {
    #[tabled(rename = "ID")]
    id: EntryId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Categories")]
    categories: String,
    #[tabled(rename = "State")]
    state: &'static str,
    #[tabled(rename = "Asset")]
    asset: String,
}

/// Table row for the category distribution
#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Color")]
    color: &'static str,
}

/// Table row for the collection
#[derive(Tabled)]
struct CollectionRow {
    #[tabled(rename = "ID")]
    id: EntryId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Categories")]
    categories: String,
    #[tabled(rename = "Asset")]
    asset: String,
}

fn render<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()))
        .to_string()
}

pub fn browse(snapshot: &Snapshot, json_output: bool) -> Result<()> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(&snapshot.items)?);
        return Ok(());
    }

    let rows: Vec<GridRow> = snapshot
        .items
        .iter()
        .map(|item| GridRow {
            id: item.id,
            name: item.name.clone(),
            categories: item.categories.join(", "),
            state: item.state.label(),
            asset: placeholder_or(item.asset.as_deref()),
        })
        .collect();

    println!("Progress: {}\n", snapshot.progress);
    println!("{}", render(&rows));
    Ok(())
}

pub fn stats(snapshot: &Snapshot, json_output: bool) -> Result<()> {
    let bars = snapshot.stats.bars();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&bars)?);
        return Ok(());
    }

    if bars.is_empty() {
        println!("No categories to show.");
        return Ok(());
    }

    let rows: Vec<StatsRow> = bars
        .into_iter()
        .map(|bar| StatsRow {
            category: bar.category,
            count: bar.count,
            color: bar.color,
        })
        .collect();

    println!("{}", render(&rows));
    println!(
        "\n{} categories across {} entries",
        snapshot.stats.len(),
        snapshot.items.len()
    );
    Ok(())
}

/// Start every requested acquisition, report completions as they land, then
/// show the collection
pub async fn acquire(engine: &mut Engine, ids: Vec<EntryId>, all: bool) -> Result<()> {
    let targets: Vec<EntryId> = if all {
        engine.snapshot().items.iter().map(|item| item.id).collect()
    } else {
        ids
    };

    if targets.is_empty() {
        bail!("Nothing to acquire. Pass entry ids or --all");
    }

    for id in targets {
        match engine.initiate_acquire(id) {
            AcquireOutcome::Started => println!("Acquiring #{id}..."),
            AcquireOutcome::AlreadyAcquiring => {}
            AcquireOutcome::AlreadyAcquired => println!("#{id} is already acquired"),
            AcquireOutcome::UnknownEntry => {
                warn!(entry_id = id, "Skipping id outside the catalog");
                println!("#{id} is not in the catalog, skipped");
            }
        }
    }

    let mut updates = engine.subscribe();
    while let Some(id) = engine.next_completion().await {
        let snapshot = updates.borrow_and_update().clone();
        let name = snapshot
            .item(id)
            .map(|item| item.name.clone())
            .unwrap_or_default();
        println!("Acquired #{id} {name} ({})", snapshot.progress);
    }

    collection(&engine.snapshot());
    Ok(())
}

pub fn collection(snapshot: &Snapshot) {
    println!("\nMy Collection - {}\n", snapshot.progress);

    if snapshot.collection.is_empty() {
        println!("Nothing acquired yet! Go acquire some!");
        return;
    }

    if snapshot.complete {
        println!("🎉 Collection complete! 🎉\n");
    }

    let rows: Vec<CollectionRow> = snapshot
        .collection
        .iter()
        .map(|item| CollectionRow {
            id: item.id,
            name: item.name.clone(),
            categories: item.categories.join(", "),
            asset: placeholder_or(item.asset.as_deref()),
        })
        .collect();

    println!("{}", render(&rows));
}
