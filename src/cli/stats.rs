//! Knowledge-base overview
//!
//! Per-pool counts, with procedures and articles broken down by status.

use anyhow::Result;
use serde::Serialize;

use super::output::Output;
use crate::domain::{ArticleStatus, ProcedureStatus, Snapshot};
use crate::storage::Project;

#[derive(Debug, Default, PartialEq, Serialize)]
struct StatusCounts {
    total: usize,
    draft: usize,
    active: usize,
    published: usize,
    archived: usize,
}

#[derive(Debug, PartialEq, Serialize)]
struct Stats {
    procedures: StatusCounts,
    systems: usize,
    scripts: usize,
    articles: StatusCounts,
    /// Entities the cross-referencer links against
    linkable: usize,
}

fn stats(all: &Snapshot, linkable: &Snapshot) -> Stats {
    let mut procedures = StatusCounts {
        total: all.procedures.len(),
        ..StatusCounts::default()
    };
    for proc in &all.procedures {
        match proc.status {
            ProcedureStatus::Draft => procedures.draft += 1,
            ProcedureStatus::Active => procedures.active += 1,
            ProcedureStatus::Archived => procedures.archived += 1,
        }
    }

    let mut articles = StatusCounts {
        total: all.articles.len(),
        ..StatusCounts::default()
    };
    for article in &all.articles {
        match article.status {
            ArticleStatus::Draft => articles.draft += 1,
            ArticleStatus::Published => articles.published += 1,
            ArticleStatus::Archived => articles.archived += 1,
        }
    }

    Stats {
        procedures,
        systems: all.systems.len(),
        scripts: all.scripts.len(),
        articles,
        linkable: linkable.len(),
    }
}

pub fn run(output: &Output) -> Result<()> {
    let project = Project::open_current()?;
    let all = project.snapshot(true)?;
    let linkable = project.link_snapshot()?;
    output.verbose_ctx(
        "stats",
        &format!("Loaded {} entities from {}", all.len(), project.kb_dir().display()),
    );

    let stats = stats(&all, &linkable);

    if output.is_json() {
        output.data(&stats);
    } else {
        println!("Knowledge Base");
        println!("{}", "=".repeat(40));
        println!();
        println!(
            "Procedures: {} total ({} active, {} draft, {} archived)",
            stats.procedures.total,
            stats.procedures.active,
            stats.procedures.draft,
            stats.procedures.archived
        );
        println!("Systems:    {}", stats.systems);
        println!("Scripts:    {}", stats.scripts);
        println!(
            "Articles:   {} total ({} published, {} draft, {} archived)",
            stats.articles.total,
            stats.articles.published,
            stats.articles.draft,
            stats.articles.archived
        );
        println!();
        println!("Linkable entities: {}", stats.linkable);
    }

    Ok(())
}
