//! Search across the four pools
//!
//! Plain case-insensitive substring filtering over the loaded pools, on the
//! fields each list view searches (see [`Entity::matches_query`]).

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::output::Output;
use crate::domain::{ArticleCategory, Entity, Snapshot, Variant};
use crate::storage::Project;

#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search query (empty matches everything)
    #[arg(default_value = "")]
    pub query: String,

    /// Only search one pool
    #[arg(long = "type", short = 't')]
    pub variant: Option<Variant>,

    /// Only scripts with this tag
    #[arg(long)]
    pub tag: Option<String>,

    /// Only articles in this category
    #[arg(long)]
    pub category: Option<ArticleCategory>,

    /// Include drafts and archived articles
    #[arg(long)]
    pub all: bool,
}

/// One search hit
#[derive(Debug, Serialize)]
struct Hit {
    #[serde(rename = "type")]
    variant: Variant,
    id: String,
    title: String,
}

fn hits<'a, E: Entity + 'a>(entities: impl IntoIterator<Item = &'a E>, query: &str) -> Vec<Hit> {
    let query = query.to_lowercase();
    entities
        .into_iter()
        .filter(|e| query.is_empty() || e.matches_query(&query))
        .map(|e| Hit {
            variant: E::VARIANT,
            id: e.id().to_string(),
            title: e.surface_title().to_string(),
        })
        .collect()
}

fn search(snapshot: &Snapshot, args: &SearchArgs) -> Vec<Hit> {
    let wanted = |variant: Variant| args.variant.map_or(true, |v| v == variant);
    let mut results = Vec::new();

    if wanted(Variant::Procedure) {
        results.extend(hits(&snapshot.procedures, &args.query));
    }
    if wanted(Variant::System) {
        results.extend(hits(&snapshot.systems, &args.query));
    }
    if wanted(Variant::Script) {
        let scripts = snapshot
            .scripts
            .iter()
            .filter(|s| args.tag.as_deref().map_or(true, |tag| s.has_tag(tag)));
        results.extend(hits(scripts, &args.query));
    }
    if wanted(Variant::Article) {
        let articles = snapshot
            .articles
            .iter()
            .filter(|a| args.category.map_or(true, |c| a.category == c));
        results.extend(hits(articles, &args.query));
    }

    results
}

pub fn run(output: &Output, args: &SearchArgs) -> Result<()> {
    let project = Project::open_current()?;
    let snapshot = project.snapshot(args.all)?;
    output.verbose_ctx(
        "search",
        &format!("Searching {} entities for: {:?}", snapshot.len(), args.query),
    );

    let results = search(&snapshot, args);
    output.verbose_ctx("search", &format!("Found {} results", results.len()));

    if output.is_json() {
        output.data(&results);
    } else if results.is_empty() {
        println!("No results found for '{}'", args.query);
    } else {
        println!("{:<10} {:<12} TITLE", "TYPE", "ID");
        println!("{}", "-".repeat(60));
        for hit in &results {
            println!("{:<10} {:<12} {}", hit.variant, hit.id, hit.title);
        }
        println!();
        println!("Found {} result(s)", results.len());
    }

    Ok(())
}
