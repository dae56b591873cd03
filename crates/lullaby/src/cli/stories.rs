//! Story history command handlers.

use super::commands::{OutputFormat, StoriesCommands};
#[cfg(feature = "database")]
use lullaby::{JsonError, StoredStory};
use lullaby::LullabyResult;
use std::path::Path;

/// Handle `stories` subcommands against the database at `db_path`.
#[cfg(feature = "database")]
pub async fn handle_stories_command(cmd: StoriesCommands, db_path: &Path) -> LullabyResult<()> {
    use lullaby::{
        Category, StoryError, StoryErrorKind, StoryFilter, default_export_filename,
        delete_story, establish_connection, export_stories_json, filter_stories, get_story,
        list_stories, search_stories, story_statistics,
    };
    use std::str::FromStr;

    let mut conn = establish_connection(db_path)?;

    match cmd {
        StoriesCommands::List {
            limit,
            offset,
            format,
        } => {
            let stories = list_stories(&mut conn, limit, offset)?;
            print_stories(&stories, format, "Recent stories")?;
        }

        StoriesCommands::Show { id, format } => match get_story(&mut conn, id)? {
            Some(story) => match format {
                OutputFormat::Json => print_json(&story)?,
                OutputFormat::Human => print_story_detail(&story),
            },
            None => {
                eprintln!("Story #{} not found", id);
                std::process::exit(1);
            }
        },

        StoriesCommands::Search {
            query,
            limit,
            format,
        } => {
            let stories = search_stories(&mut conn, &query, limit)?;
            print_stories(&stories, format, &format!("Stories matching \"{}\"", query))?;
        }

        StoriesCommands::Filter {
            category,
            min_score,
            max_score,
            limit,
            format,
        } => {
            let category = category
                .map(|raw| {
                    Category::from_str(raw.trim()).map_err(|_| {
                        StoryError::new(StoryErrorKind::InvalidInput(format!(
                            "Unknown category: {}",
                            raw
                        )))
                    })
                })
                .transpose()?;
            let filter = StoryFilter::default()
                .with_category(category)
                .with_min_score(min_score)
                .with_max_score(max_score)
                .with_limit(limit);
            let stories = filter_stories(&mut conn, &filter)?;
            print_stories(&stories, format, "Filtered stories")?;
        }

        StoriesCommands::Delete { id } => {
            if delete_story(&mut conn, id)? {
                println!("Deleted story #{}", id);
            } else {
                eprintln!("Story #{} not found", id);
                std::process::exit(1);
            }
        }

        StoriesCommands::Export { output } => {
            let stories = list_stories(&mut conn, i64::MAX, 0)?;
            let json = export_stories_json(&stories)?;
            let path = output.unwrap_or_else(|| default_export_filename().into());
            std::fs::write(&path, json).map_err(|e| {
                StoryError::new(StoryErrorKind::Export(format!("{}: {}", path.display(), e)))
            })?;
            println!("Exported {} stories to {}", stories.len(), path.display());
        }

        StoriesCommands::Stats { format } => {
            let stats = story_statistics(&mut conn)?;
            match format {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Human => {
                    println!("📚 Story statistics");
                    println!("{:-<40}", "");
                    println!("Total stories:        {}", stats.total_stories);
                    println!("Average score:        {:.2}/10", stats.average_score);
                    println!("Meeting threshold:    {}", stats.stories_meeting_threshold);
                    println!("Average revisions:    {:.2}", stats.average_revisions);
                    if !stats.category_distribution.is_empty() {
                        println!("\nBy category:");
                        for (category, count) in &stats.category_distribution {
                            println!("  {:<12} {}", category, count);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(feature = "database")]
fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> LullabyResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| JsonError::new(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

#[cfg(feature = "database")]
fn print_stories(
    stories: &[StoredStory],
    format: OutputFormat,
    title: &str,
) -> LullabyResult<()> {
    if format == OutputFormat::Json {
        return print_json(stories);
    }

    println!("{} ({}):", title, stories.len());
    println!("{:-<80}", "");
    for story in stories {
        let request: String = story.user_request.chars().take(40).collect();
        println!(
            "#{:<5} {}  {:<10} {:>4.1}/10  rev {}  {}  {}",
            story.id,
            story.created_at.format("%Y-%m-%d %H:%M"),
            story.category,
            story.judge_score,
            story.revision_count,
            if story.meets_quality_threshold { "✓" } else { "✗" },
            request
        );
    }
    Ok(())
}

#[cfg(feature = "database")]
fn print_story_detail(story: &StoredStory) {
    println!("Story #{} ({})", story.id, story.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("{:-<80}", "");
    println!("Request:    {}", story.user_request);
    println!("Category:   {}", story.category);
    println!("Score:      {:.1}/10", story.judge_score);
    println!("Revisions:  {}", story.revision_count);
    println!("Valid:      {}", if story.is_valid { "Yes" } else { "No" });
    println!("Persona:    {}", story.parent_settings.persona);
    if let Some(feedback) = &story.user_feedback {
        println!("Feedback:   {}", feedback);
    }
    if !story.validation.all_issues.is_empty() {
        println!("Issues:     {}", story.validation.all_issues.join("; "));
    }
    println!("{:-<80}", "");
    println!("{}", story.story_text);
    if !story.judge_feedback.is_empty() {
        println!("{:-<80}", "");
        println!("{}", story.judge_feedback);
    }
}

#[cfg(not(feature = "database"))]
pub async fn handle_stories_command(_cmd: StoriesCommands, _db_path: &Path) -> LullabyResult<()> {
    eprintln!("Error: Database feature not enabled. Rebuild with --features database");
    std::process::exit(1);
}
