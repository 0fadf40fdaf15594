//! Content command
//!
//! Register content items and open or close them for comments.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use serde::Serialize;

use cmod_core::comment::CommentStatus;
use cmod_core::content::{ContentItem, ContentItemMetadata, ContentManager};
use cmod_core::types::ContentId;

use super::{AppContext, GlobalOptions};

/// Content subcommands
#[derive(Debug, Subcommand)]
pub enum ContentCommand {
    /// Register (or replace) a content item
    Add {
        /// Content item ID
        id: ContentId,

        /// Content type, e.g. BlogPost
        #[arg(long = "type")]
        content_type: String,

        /// Title
        #[arg(long, default_value = "")]
        title: String,

        /// Container the item belongs to
        #[arg(long)]
        container: Option<ContentId>,
    },

    /// List registered content items
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a content item and its comment settings
    Show {
        /// Content item ID
        id: ContentId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Stop accepting comments on a content item
    Close {
        /// Content item ID
        id: ContentId,
    },

    /// Accept comments on a content item again
    Open {
        /// Content item ID
        id: ContentId,
    },
}

/// Summary printed by `content show`
#[derive(Debug, Serialize)]
struct ContentSummary {
    id: ContentId,
    metadata: Option<ContentItemMetadata>,
    container: Option<ContentId>,
    comments_closed: bool,
    comments: usize,
    pending: usize,
}

/// Execute the content command
pub fn execute(cmd: ContentCommand, opts: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::open(opts)?;

    match cmd {
        ContentCommand::Add {
            id,
            content_type,
            title,
            container,
        } => {
            let mut item = ContentItem::new(id, content_type).with_title(title);
            item.container = container;
            ctx.storage.content().register(item)?;
            println!("{} Registered content item {}", "✓".green(), id);
            Ok(())
        }
        ContentCommand::List { json } => list_content(&ctx, json),
        ContentCommand::Show { id, json } => show_content(&ctx, id, json),
        ContentCommand::Close { id } => {
            ctx.service.close_comments_for_commented_content(id)?;
            println!("{} Comments closed for {}", "✓".green(), id);
            Ok(())
        }
        ContentCommand::Open { id } => {
            ctx.service.enable_comments_for_commented_content(id)?;
            println!("{} Comments enabled for {}", "✓".green(), id);
            Ok(())
        }
    }
}

fn list_content(ctx: &AppContext, as_json: bool) -> Result<()> {
    let items = ctx.storage.content().list()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&items)?);
        return Ok(());
    }

    if items.is_empty() {
        println!("No content items registered.");
        return Ok(());
    }

    println!("{}", "Content items:".bold().underline());
    println!();
    for item in &items {
        let closed = ctx.service.comments_closed_for_commented_content(item.id)?;
        let meta = ctx.storage.content().item_metadata(item)?;
        println!(
            "  {} {} [{}]{}{}",
            item.id.to_string().green(),
            meta.display_text,
            item.content_type.cyan(),
            item.container
                .map(|c| format!(" in {}", c))
                .unwrap_or_default(),
            if closed { " (closed)".red().to_string() } else { String::new() }
        );
    }
    Ok(())
}

fn show_content(ctx: &AppContext, id: ContentId, as_json: bool) -> Result<()> {
    let comments = ctx
        .service
        .get_comments_for_commented_content(id)
        .context("Failed to load comments")?;

    let summary = ContentSummary {
        id,
        metadata: ctx.service.get_display_for_commented_content(id)?,
        container: ctx.storage.content().try_get_container_of(id)?,
        comments_closed: ctx.service.comments_closed_for_commented_content(id)?,
        comments: comments.len(),
        pending: comments
            .iter()
            .filter(|c| c.status == CommentStatus::Pending)
            .count(),
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", "Content Details".bold().underline());
    println!();
    println!("  ID: {}", summary.id.to_string().green());
    match &summary.metadata {
        Some(meta) => {
            println!("  Title: {}", meta.display_text);
            println!("  View: {}", meta.display_route);
            println!("  Edit: {}", meta.edit_route);
        }
        None => println!("  {}", "Not registered".yellow()),
    }
    if let Some(container) = summary.container {
        println!("  Container: {}", container);
    }
    println!(
        "  Comments: {} ({} pending)",
        summary.comments, summary.pending
    );
    println!(
        "  Accepting comments: {}",
        if summary.comments_closed {
            "no".red()
        } else {
            "yes".green()
        }
    );
    Ok(())
}
