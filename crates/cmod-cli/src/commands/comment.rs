//! Comment command
//!
//! List, create and moderate comments.

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;

use cmod_core::comment::{Comment, CommentBuilder, CommentStatus, CommentUpdate};
use cmod_core::types::{CommentId, ContentId};
use cmod_core::ModerationError;

use super::{AppContext, GlobalOptions};

/// Comment subcommands
#[derive(Debug, Subcommand)]
pub enum CommentCommand {
    /// List comments
    List {
        /// Only comments with this status (pending, approved, spam)
        #[arg(long, short)]
        status: Option<CommentStatus>,

        /// Only comments on this content item
        #[arg(long, conflicts_with = "container")]
        content: Option<ContentId>,

        /// Only comments on items inside this container
        #[arg(long)]
        container: Option<ContentId>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a comment
    Show {
        /// Comment ID
        id: CommentId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Submit a new comment
    Add {
        /// Content item the comment is on
        #[arg(long = "on")]
        commented_on: ContentId,

        /// Author name
        #[arg(long)]
        author: String,

        /// Comment text
        #[arg(long)]
        text: String,

        /// Author email
        #[arg(long, default_value = "")]
        email: String,

        /// Author web site
        #[arg(long = "site", default_value = "")]
        site_name: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace a comment's fields (unspecified fields keep their value)
    Update {
        /// Comment ID
        id: CommentId,

        /// Author name
        #[arg(long)]
        author: Option<String>,

        /// Author email
        #[arg(long)]
        email: Option<String>,

        /// Author web site
        #[arg(long = "site")]
        site_name: Option<String>,

        /// Comment text
        #[arg(long)]
        text: Option<String>,

        /// Status
        #[arg(long)]
        status: Option<CommentStatus>,
    },

    /// Approve a comment
    Approve {
        /// Comment ID
        id: CommentId,
    },

    /// Send a comment back to the moderation queue
    Pend {
        /// Comment ID
        id: CommentId,
    },

    /// Mark a comment as spam
    Spam {
        /// Comment ID
        id: CommentId,
    },

    /// Delete a comment
    Delete {
        /// Comment ID
        id: CommentId,

        /// Skip confirmation
        #[arg(long, short)]
        yes: bool,
    },

    /// Count comments per status
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Execute the comment command
pub fn execute(cmd: CommentCommand, opts: &GlobalOptions) -> Result<()> {
    let ctx = AppContext::open(opts)?;

    match cmd {
        CommentCommand::List {
            status,
            content,
            container,
            json,
        } => list_comments(&ctx, status, content, container, json),
        CommentCommand::Show { id, json } => show_comment(&ctx, id, json),
        CommentCommand::Add {
            commented_on,
            author,
            text,
            email,
            site_name,
            json,
        } => {
            let comment = CommentBuilder::new(commented_on)
                .author(author)
                .email(email)
                .site_name(site_name)
                .text(text)
                .build()?;
            add_comment(&ctx, comment, json)
        }
        CommentCommand::Update {
            id,
            author,
            email,
            site_name,
            text,
            status,
        } => {
            let current = ctx
                .service
                .get_comment(id)?
                .with_context(|| format!("Comment {} not found", id))?;
            let mut update = CommentUpdate::from(&current);
            if let Some(author) = author {
                update.author = author;
            }
            if let Some(email) = email {
                update.email = email;
            }
            if let Some(site_name) = site_name {
                update.site_name = site_name;
            }
            if let Some(text) = text {
                update.text = text;
            }
            if let Some(status) = status {
                update.status = status;
            }
            let updated = ctx.service.update_comment(id, update)?;
            println!("{} Updated comment {}", "✓".green(), updated.id);
            Ok(())
        }
        CommentCommand::Approve { id } => {
            let comment = ctx.service.approve_comment(id)?;
            print_status_change(&comment);
            Ok(())
        }
        CommentCommand::Pend { id } => {
            let comment = ctx.service.pend_comment(id)?;
            print_status_change(&comment);
            Ok(())
        }
        CommentCommand::Spam { id } => {
            let comment = ctx.service.mark_comment_as_spam(id)?;
            print_status_change(&comment);
            Ok(())
        }
        CommentCommand::Delete { id, yes } => delete_comment(&ctx, id, yes),
        CommentCommand::Stats { json } => show_stats(&ctx, json),
    }
}

fn list_comments(
    ctx: &AppContext,
    status: Option<CommentStatus>,
    content: Option<ContentId>,
    container: Option<ContentId>,
    as_json: bool,
) -> Result<()> {
    let service = &ctx.service;
    let comments = match (content, container, status) {
        (Some(id), _, Some(status)) => {
            service.get_comments_for_commented_content_by_status(id, status)?
        }
        (Some(id), _, None) => service.get_comments_for_commented_content(id)?,
        (None, Some(id), Some(status)) => service.get_comments_for_container_by_status(id, status)?,
        (None, Some(id), None) => service.get_comments_for_container(id)?,
        (None, None, Some(status)) => service.get_comments_by_status(status)?,
        (None, None, None) => service.get_comments()?,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&comments)?);
        return Ok(());
    }

    if comments.is_empty() {
        println!("No comments found.");
        return Ok(());
    }

    println!("{}", "Comments:".bold().underline());
    println!();
    for comment in &comments {
        println!(
            "  {} {} on {} by {} ({})",
            format!("#{}", comment.id).green(),
            colored_status(comment.status),
            comment.commented_on.to_string().cyan(),
            comment.author,
            comment.created_at.format("%Y-%m-%d %H:%M").to_string().dimmed()
        );
        println!("      {}", preview(&comment.text, 72));
    }

    Ok(())
}

fn show_comment(ctx: &AppContext, id: CommentId, as_json: bool) -> Result<()> {
    let comment = ctx
        .service
        .get_comment(id)?
        .with_context(|| format!("Comment {} not found", id))?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&comment)?);
        return Ok(());
    }

    let on = match ctx.service.get_display_for_commented_content(comment.commented_on)? {
        Some(meta) => format!("{} ({})", meta.display_text, comment.commented_on),
        None => format!("{} (content no longer exists)", comment.commented_on),
    };

    println!("{}", "Comment Details".bold().underline());
    println!();
    println!("  ID: {}", comment.id.to_string().green());
    println!("  Status: {}", colored_status(comment.status));
    println!("  On: {}", on);
    if let Some(container) = comment.commented_on_container {
        println!("  Container: {}", container);
    }
    println!("  Author: {}", comment.author);
    if !comment.email.is_empty() {
        println!("  Email: {}", comment.email);
    }
    if !comment.site_name.is_empty() {
        println!("  Site: {}", comment.site_name);
    }
    println!(
        "  Created: {}",
        comment.created_at.format("%Y-%m-%d %H:%M:%S")
    );
    println!();
    println!("{}", comment.text);

    Ok(())
}

fn add_comment(ctx: &AppContext, comment: Comment, as_json: bool) -> Result<()> {
    let commented_on = comment.commented_on;
    if ctx
        .service
        .comments_closed_for_commented_content(commented_on)?
    {
        return Err(ModerationError::CommentsClosed(commented_on).into());
    }

    let mut created = ctx.service.create_comment(comment)?;
    if ctx.config.moderation.auto_approve && created.status == CommentStatus::Pending {
        created = ctx.service.approve_comment(created.id)?;
    }

    if as_json {
        println!("{}", serde_json::to_string_pretty(&created)?);
        return Ok(());
    }

    match created.status {
        CommentStatus::Spam => println!(
            "{} Comment {} was classified as {}",
            "⚠".yellow(),
            created.id,
            colored_status(created.status)
        ),
        _ => println!(
            "{} Created comment {} ({})",
            "✓".green(),
            created.id,
            colored_status(created.status)
        ),
    }
    Ok(())
}

fn delete_comment(ctx: &AppContext, id: CommentId, yes: bool) -> Result<()> {
    if !yes {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("Delete comment {}?", id))
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Delete cancelled.");
            return Ok(());
        }
    }

    let deleted = ctx.service.delete_comment(id)?;
    println!(
        "{} Deleted comment {} on {}",
        "✓".green(),
        deleted.id,
        deleted.commented_on
    );
    Ok(())
}

fn show_stats(ctx: &AppContext, as_json: bool) -> Result<()> {
    let counts = ctx.service.count_by_status()?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    println!("{}", "Moderation queue:".bold().underline());
    for (status, count) in &counts {
        println!("  {:<10} {}", colored_status(*status), count);
    }
    let total: usize = counts.values().sum();
    println!("  {:<10} {}", "total", total);
    Ok(())
}

fn print_status_change(comment: &Comment) {
    println!(
        "{} Comment {} is now {}",
        "✓".green(),
        comment.id,
        colored_status(comment.status)
    );
}

fn colored_status(status: CommentStatus) -> colored::ColoredString {
    match status {
        CommentStatus::Pending => status.as_str().yellow(),
        CommentStatus::Approved => status.as_str().green(),
        CommentStatus::Spam => status.as_str().red(),
    }
}

/// First line of `text`, cut to `max` characters
fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or("").trim();
    if line.chars().count() > max {
        let cut: String = line.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("short", 10), "short");
        assert_eq!(preview("first\nsecond", 10), "first");
        assert_eq!(preview("abcdefghijkl", 5), "abcd…");
        assert_eq!(preview("", 5), "");
    }
}
