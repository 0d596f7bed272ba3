//! List, search and presets commands

use colored::Colorize;
use regtune_catalog::{Catalog, Item, ItemClass};
use serde::Serialize;

use crate::context::Context;
use crate::error::Result;

/// One row of `list --json`
#[derive(Debug, Serialize)]
struct ItemRow<'a> {
    title: &'a str,
    class: ItemClass,
    category: &'a str,
    selected: bool,
    locked: bool,
}

impl<'a> From<&'a Item> for ItemRow<'a> {
    fn from(item: &'a Item) -> Self {
        Self {
            title: item.title(),
            class: item.class(),
            category: item.category(),
            selected: item.is_selected(),
            locked: item.is_locked(),
        }
    }
}

fn class_heading(class: ItemClass) -> &'static str {
    match class {
        ItemClass::Normal => "Optimizations",
        ItemClass::Legacy => "Legacy (read-only)",
        ItemClass::Script => "Scripts (read-only)",
    }
}

fn print_item(item: &Item) {
    let mark = if item.is_selected() {
        "✓".green().bold()
    } else {
        "·".dimmed()
    };
    let lock = if item.is_locked() {
        " [locked]".dimmed().to_string()
    } else {
        String::new()
    };
    println!(
        "   {} {} ({}){}",
        mark,
        item.title(),
        item.category().cyan(),
        lock
    );
}

/// Print the items of each class that `keep` accepts, skipping empty
/// groups. Returns how many items were shown.
fn print_grouped(
    catalog: &Catalog,
    classes: &[ItemClass],
    keep: impl Fn(&Item) -> bool,
) -> usize {
    let mut shown = 0;
    for &class in classes {
        let group: Vec<&Item> = catalog.by_class(class).filter(|item| keep(item)).collect();
        if group.is_empty() {
            continue;
        }

        println!("{}", class_heading(class).bold());
        for item in &group {
            print_item(item);
        }
        println!();
        shown += group.len();
    }
    shown
}

/// Run the list command
///
/// Selection mirrors the live checks run when the session loaded.
pub fn run_list(ctx: &Context, class: Option<ItemClass>, json: bool) -> Result<()> {
    let all = ItemClass::ALL;
    ctx.session.with_catalog(|catalog| -> Result<()> {
        let (classes, applied): (&[ItemClass], usize) = match &class {
            Some(class) => (
                std::slice::from_ref(class),
                catalog.by_class(*class).filter(|item| item.is_selected()).count(),
            ),
            None => (&all[..], catalog.count_selected()),
        };
        let items: Vec<&Item> = match class {
            Some(class) => catalog.by_class(class).collect(),
            None => catalog.iter().collect(),
        };

        if json {
            let rows: Vec<ItemRow> = items.iter().copied().map(ItemRow::from).collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if items.is_empty() {
            println!("{} No items loaded.", "=>".blue().bold());
            return Ok(());
        }

        print_grouped(catalog, classes, |_| true);
        println!("{} of {} items applied.", applied.to_string().green(), items.len());
        Ok(())
    })?
}

/// Run the search command
pub fn run_search(ctx: &Context, query: &[String]) -> Result<()> {
    let query = query.join(" ");
    ctx.session.with_catalog(|catalog| {
        if catalog.search(&query).is_empty() {
            println!("{} No items match '{}'.", "=>".blue().bold(), query);
            return;
        }
        let shown = print_grouped(catalog, &ItemClass::ALL, |item| item.matches(&query));
        println!("{} matching items.", shown);
    })?;
    Ok(())
}

/// Run the presets command
pub fn run_presets(ctx: &Context) -> Result<()> {
    println!("{}", "Available Presets".bold());
    for (key, preset) in ctx.session.presets().iter() {
        println!("   {} {}", key.cyan(), preset.label.dimmed());
    }
    Ok(())
}
