//! Entity CLI commands
//!
//! `kbx procedure|system|script|article add|list|show|edit|remove`

use anyhow::Result;
use chrono::Utc;
use clap::Subcommand;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::output::Output;
use crate::domain::{
    parse_keywords, ArticleCategory, ArticleStatus, ConversationScript, Entity, KnowledgeArticle,
    Procedure, ProcedureStatus, System,
};
use crate::storage::{PoolStore, Project};
use crate::xref;

/// How a record is shown in `list` and `show`
trait Card: Entity + Clone + Serialize + DeserializeOwned {
    /// Short label for the list's status column
    fn label(&self) -> String;

    /// Named fields for the text view of `show`, body excluded
    fn fields(&self) -> Vec<(&'static str, String)>;
}

impl Card for Procedure {
    fn label(&self) -> String {
        format!("{} v{}", self.status, self.version)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Description", self.description.clone()),
            ("Version", self.version.clone()),
            ("Status", self.status.to_string()),
        ]
    }
}

impl Card for System {
    fn label(&self) -> String {
        self.category.clone()
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Description", self.description.clone()),
            ("URL", self.url.clone()),
            ("Category", self.category.clone()),
            ("Keywords", self.keywords.join(", ")),
        ]
    }
}

impl Card for ConversationScript {
    fn label(&self) -> String {
        self.tags.join(",")
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Scenario", self.scenario.clone()),
            ("Tags", self.tags.join(", ")),
        ]
    }
}

impl Card for KnowledgeArticle {
    fn label(&self) -> String {
        format!("{}/{}", self.category, self.status)
    }

    fn fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Category", self.category.to_string()),
            ("Status", self.status.to_string()),
            ("Keywords", self.keywords.join(", ")),
        ]
    }
}

#[derive(Subcommand)]
pub enum ProcedureCommands {
    /// Create a procedure
    Add {
        /// Procedure title
        title: String,

        #[arg(long, short, default_value = "")]
        description: String,

        #[arg(long, short, default_value = "")]
        content: String,

        #[arg(long, default_value = "1.0")]
        version: String,

        /// draft, active or archived
        #[arg(long, short, default_value = "active")]
        status: ProcedureStatus,
    },

    /// List procedures, newest first
    List,

    /// Show a procedure and the items its content refers to
    Show { id: String },

    /// Update fields of a procedure
    Edit {
        id: String,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long, short)]
        content: Option<String>,

        #[arg(long)]
        version: Option<String>,

        #[arg(long, short)]
        status: Option<ProcedureStatus>,
    },

    /// Delete a procedure
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum SystemCommands {
    /// Register a system
    Add {
        /// System name
        name: String,

        #[arg(long, short, default_value = "")]
        description: String,

        #[arg(long, short, default_value = "")]
        url: String,

        #[arg(long, short, default_value = "general")]
        category: String,

        #[arg(long, short, default_value = "")]
        instructions: String,

        /// Comma-separated keywords
        #[arg(long, short, default_value = "")]
        keywords: String,
    },

    /// List systems by name
    List,

    /// Show a system and the items its instructions refer to
    Show { id: String },

    /// Update fields of a system
    Edit {
        id: String,

        #[arg(long, short)]
        name: Option<String>,

        #[arg(long, short)]
        description: Option<String>,

        #[arg(long, short)]
        url: Option<String>,

        #[arg(long, short)]
        category: Option<String>,

        #[arg(long, short)]
        instructions: Option<String>,

        /// Comma-separated keywords (replaces the list)
        #[arg(long, short)]
        keywords: Option<String>,
    },

    /// Delete a system
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum ScriptCommands {
    /// Create a conversation script
    Add {
        /// Script title
        title: String,

        #[arg(long, short, default_value = "")]
        scenario: String,

        #[arg(long, short, default_value = "")]
        content: String,

        /// Comma-separated tags
        #[arg(long, short, default_value = "")]
        tags: String,
    },

    /// List scripts, newest first
    List {
        /// Only scripts with this tag
        #[arg(long)]
        tag: Option<String>,
    },

    /// Show a script and the items it refers to
    Show { id: String },

    /// Update fields of a script
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long, short)]
        scenario: Option<String>,

        #[arg(long, short)]
        content: Option<String>,

        /// Comma-separated tags (replaces the list)
        #[arg(long, short)]
        tags: Option<String>,
    },

    /// Delete a script
    Remove { id: String },
}

#[derive(Subcommand)]
pub enum ArticleCommands {
    /// Write an article
    Add {
        /// Article title
        title: String,

        #[arg(long, short, default_value = "")]
        content: String,

        /// Comma-separated keywords
        #[arg(long, short, default_value = "")]
        keywords: String,

        /// products, procedures, faq, support or general
        #[arg(long, default_value = "general")]
        category: ArticleCategory,

        /// draft, published or archived
        #[arg(long, short, default_value = "published")]
        status: ArticleStatus,
    },

    /// List published articles, newest first
    List {
        /// Only articles in this category
        #[arg(long)]
        category: Option<ArticleCategory>,

        /// Include drafts and archived articles
        #[arg(long)]
        all: bool,
    },

    /// Show an article and the items it refers to
    Show { id: String },

    /// Update fields of an article
    Edit {
        id: String,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        content: Option<String>,

        /// Comma-separated keywords (replaces the list)
        #[arg(long, short)]
        keywords: Option<String>,

        #[arg(long)]
        category: Option<ArticleCategory>,

        #[arg(long, short)]
        status: Option<ArticleStatus>,
    },

    /// Delete an article
    Remove { id: String },
}

pub fn run_procedure(cmd: ProcedureCommands, output: &Output) -> Result<()> {
    let project = Project::open_current()?;

    match cmd {
        ProcedureCommands::Add {
            title,
            description,
            content,
            version,
            status,
        } => {
            let mut proc = Procedure::new(title);
            proc.description = description;
            proc.content = content;
            proc.version = version;
            proc.status = status;
            add(output, &project.procedures(), &proc)
        }
        ProcedureCommands::List => list(output, &project.snapshot(true)?.procedures),
        ProcedureCommands::Show { id } => show(output, &project, &project.procedures(), &id),
        ProcedureCommands::Edit {
            id,
            title,
            description,
            content,
            version,
            status,
        } => {
            let proc = project.procedures().update(&id, |p| {
                set(&mut p.title, title);
                set(&mut p.description, description);
                set(&mut p.content, content);
                set(&mut p.version, version);
                set(&mut p.status, status);
                p.updated_at = Utc::now();
            })?;
            edited(output, &proc)
        }
        ProcedureCommands::Remove { id } => remove(output, &project.procedures(), &id),
    }
}

pub fn run_system(cmd: SystemCommands, output: &Output) -> Result<()> {
    let project = Project::open_current()?;

    match cmd {
        SystemCommands::Add {
            name,
            description,
            url,
            category,
            instructions,
            keywords,
        } => {
            let mut system = System::new(name);
            system.description = description;
            system.url = url;
            system.category = category;
            system.instructions = instructions;
            system.keywords = parse_keywords(&keywords);
            add(output, &project.systems(), &system)
        }
        SystemCommands::List => list(output, &project.snapshot(true)?.systems),
        SystemCommands::Show { id } => show(output, &project, &project.systems(), &id),
        SystemCommands::Edit {
            id,
            name,
            description,
            url,
            category,
            instructions,
            keywords,
        } => {
            let system = project.systems().update(&id, |s| {
                set(&mut s.name, name);
                set(&mut s.description, description);
                set(&mut s.url, url);
                set(&mut s.category, category);
                set(&mut s.instructions, instructions);
                set(&mut s.keywords, keywords.as_deref().map(parse_keywords));
                s.updated_at = Utc::now();
            })?;
            edited(output, &system)
        }
        SystemCommands::Remove { id } => remove(output, &project.systems(), &id),
    }
}

pub fn run_script(cmd: ScriptCommands, output: &Output) -> Result<()> {
    let project = Project::open_current()?;

    match cmd {
        ScriptCommands::Add {
            title,
            scenario,
            content,
            tags,
        } => {
            let mut script = ConversationScript::new(title);
            script.scenario = scenario;
            script.script_content = content;
            script.tags = parse_keywords(&tags);
            add(output, &project.scripts(), &script)
        }
        ScriptCommands::List { tag } => {
            let mut scripts = project.snapshot(true)?.scripts;
            if let Some(tag) = tag {
                output.verbose_ctx("script", &format!("Filtering by tag: {}", tag));
                scripts.retain(|s| s.has_tag(&tag));
            }
            list(output, &scripts)
        }
        ScriptCommands::Show { id } => show(output, &project, &project.scripts(), &id),
        ScriptCommands::Edit {
            id,
            title,
            scenario,
            content,
            tags,
        } => {
            let script = project.scripts().update(&id, |s| {
                set(&mut s.title, title);
                set(&mut s.scenario, scenario);
                set(&mut s.script_content, content);
                set(&mut s.tags, tags.as_deref().map(parse_keywords));
                s.updated_at = Utc::now();
            })?;
            edited(output, &script)
        }
        ScriptCommands::Remove { id } => remove(output, &project.scripts(), &id),
    }
}

pub fn run_article(cmd: ArticleCommands, output: &Output) -> Result<()> {
    let project = Project::open_current()?;

    match cmd {
        ArticleCommands::Add {
            title,
            content,
            keywords,
            category,
            status,
        } => {
            let mut article = KnowledgeArticle::new(title);
            article.content = content;
            article.keywords = parse_keywords(&keywords);
            article.category = category;
            article.status = status;
            add(output, &project.articles(), &article)
        }
        ArticleCommands::List { category, all } => {
            let mut articles = project.snapshot(all)?.articles;
            if let Some(category) = category {
                articles.retain(|a| a.category == category);
            }
            list(output, &articles)
        }
        ArticleCommands::Show { id } => show(output, &project, &project.articles(), &id),
        ArticleCommands::Edit {
            id,
            title,
            content,
            keywords,
            category,
            status,
        } => {
            let article = project.articles().update(&id, |a| {
                set(&mut a.title, title);
                set(&mut a.content, content);
                set(&mut a.keywords, keywords.as_deref().map(parse_keywords));
                set(&mut a.category, category);
                set(&mut a.status, status);
                a.updated_at = Utc::now();
            })?;
            edited(output, &article)
        }
        ArticleCommands::Remove { id } => remove(output, &project.articles(), &id),
    }
}

fn set<T>(field: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *field = value;
    }
}

fn add<E: Card>(output: &Output, store: &PoolStore<E>, entity: &E) -> Result<()> {
    store.insert(entity)?;
    output.verbose_ctx(
        E::VARIANT.as_str(),
        &format!("Appended to {}", store.path().display()),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": entity.id(),
            "type": E::VARIANT,
            "title": entity.surface_title(),
        }));
    } else {
        output.success(&format!(
            "Created {}: {} ({})",
            E::VARIANT,
            entity.id(),
            entity.surface_title()
        ));
    }

    Ok(())
}

fn list<E: Card>(output: &Output, entities: &[E]) -> Result<()> {
    if output.is_json() {
        output.data(&entities);
    } else if entities.is_empty() {
        println!("No {}s found.", E::VARIANT);
    } else {
        println!("{:<12} {:<24} TITLE", "ID", "DETAILS");
        println!("{}", "-".repeat(70));
        for entity in entities {
            println!(
                "{:<12} {:<24} {}",
                entity.id(),
                entity.label(),
                entity.surface_title()
            );
        }
    }

    Ok(())
}

fn show<E: Card>(output: &Output, project: &Project, store: &PoolStore<E>, id: &str) -> Result<()> {
    let entity = store.require(id)?;

    let mut snapshot = project.link_snapshot()?;
    snapshot.exclude(E::VARIANT, id);
    let matcher = xref::compile(&snapshot, &project.config().project.xref);
    let referenced = matcher.referenced_items(entity.body());
    output.verbose_ctx(
        "show",
        &format!(
            "Scanned body against {} entities, {} referenced",
            snapshot.len(),
            referenced.len()
        ),
    );

    if output.is_json() {
        output.data(&serde_json::json!({
            "type": E::VARIANT,
            "entity": entity,
            "referenced_items": referenced,
        }));
    } else {
        println!("{}: {}", capitalize(E::VARIANT.as_str()), entity.id());
        println!("Title: {}", entity.surface_title());
        for (name, value) in entity.fields() {
            if !value.is_empty() {
                println!("{}: {}", name, value);
            }
        }
        println!("Created: {}", entity.created_at().format("%Y-%m-%d %H:%M"));

        if !entity.body().is_empty() {
            println!("\nContent:");
            println!("{}", entity.body());
        }

        if !referenced.is_empty() {
            println!("\nReferenced items ({}):", referenced.len());
            for item in &referenced {
                println!("  {:<10} {:<12} {}", item.variant, item.id, item.title);
            }
        }
    }

    Ok(())
}

fn edited<E: Card>(output: &Output, entity: &E) -> Result<()> {
    if output.is_json() {
        output.data(entity);
    } else {
        output.success(&format!("Updated {} {}", E::VARIANT, entity.id()));
    }
    Ok(())
}

fn remove<E: Card>(output: &Output, store: &PoolStore<E>, id: &str) -> Result<()> {
    let removed = store.remove(id)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": removed.id(),
            "type": E::VARIANT,
            "removed": true,
        }));
    } else {
        output.success(&format!(
            "Removed {} {} ({})",
            E::VARIANT,
            removed.id(),
            removed.surface_title()
        ));
    }

    Ok(())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
