//! Story generation command handler.

use super::commands::GenerateArgs;
use super::settings::{apply_overrides, database_path, load_config};
use lullaby::{
    LullabyConfig, LullabyResult, OpenAIClient, ParentSettingsInput, StoryError, StoryErrorKind,
    StoryOrchestrator, StoryOutcome, parse_parent_settings,
};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const EXAMPLE_REQUEST: &str =
    "A story about a girl named Alice and her best friend Bob, who happens to be a cat.";

/// Generate one story, offer a change request, and print the result.
pub async fn run_generate(
    args: GenerateArgs,
    config_path: Option<&Path>,
    database_flag: Option<&Path>,
) -> LullabyResult<()> {
    let mut config = load_config(config_path)?;
    apply_overrides(&mut config, &args)?;

    if config.api_key().is_none() {
        let var = &config.api.api_key_env;
        println!("⚠️  ERROR: {var} not found in environment variables.");
        println!("Please create a .env file with your OpenAI API key:");
        println!("{var}=your_key_here");
        return Ok(());
    }

    print_welcome(&config);

    let parent_settings = parse_parent_settings(&ParentSettingsInput {
        persona: args.persona.clone(),
        values: args.values.clone(),
        interests: args.interests.clone(),
        child_name: args.child_name.clone(),
        custom_elements: args.custom_elements.clone(),
    })?;

    let client = Arc::new(OpenAIClient::from_config(&config)?);
    let orchestrator = StoryOrchestrator::new(client, &config, parent_settings)?;
    let orchestrator = attach_storage(orchestrator, &config, database_flag)?;

    let request = match args.request {
        Some(request) => request,
        None => prompt("What kind of story do you want to hear? ")?,
    };
    let request = if request.trim().is_empty() {
        println!("No input provided. Using example request...");
        EXAMPLE_REQUEST.to_string()
    } else {
        request
    };

    let mut outcome = orchestrator.generate_story_with_judge(&request).await?;

    if orchestrator.user_feedback_enabled() {
        print_banner("📖 YOUR STORY:");
        println!("{}", outcome.story);
        println!("{}", "=".repeat(60));
        println!("\n📊 Quality Score: {:.1}/10", outcome.judge_score);

        let answer = prompt("\n💬 Would you like to request changes? (yes/no): ")?;
        if matches!(answer.trim().to_lowercase().as_str(), "yes" | "y") {
            let changes = prompt("What would you like to change? ")?;
            outcome = revise_or_keep(&orchestrator, outcome, &changes).await;
        }
    }

    print_outcome(&outcome);
    Ok(())
}

/// Apply requested changes, keeping the already generated story if they are rejected.
async fn revise_or_keep<D: lullaby::LullabyDriver>(
    orchestrator: &StoryOrchestrator<D>,
    outcome: StoryOutcome,
    changes: &str,
) -> StoryOutcome {
    match orchestrator.apply_user_feedback(outcome.clone(), changes).await {
        Ok(revised) => revised,
        Err(e) => {
            tracing::warn!(error = %e, "Requested changes rejected");
            println!("\n⚠️  Could not apply your changes: {e}");
            println!("Keeping the original story.");
            outcome
        }
    }
}

#[cfg(feature = "database")]
fn attach_storage<D: lullaby::LullabyDriver>(
    orchestrator: StoryOrchestrator<D>,
    config: &LullabyConfig,
    database_flag: Option<&Path>,
) -> LullabyResult<StoryOrchestrator<D>> {
    if !config.storage.enabled {
        return Ok(orchestrator);
    }
    let path = database_path(config, database_flag);
    tracing::info!(path = %path.display(), "Saving stories");
    let repository = lullaby::SqliteStoryRepository::open(&path)?;
    Ok(orchestrator.with_storage(Box::new(repository)))
}

#[cfg(not(feature = "database"))]
fn attach_storage<D: lullaby::LullabyDriver>(
    orchestrator: StoryOrchestrator<D>,
    config: &LullabyConfig,
    database_flag: Option<&Path>,
) -> LullabyResult<StoryOrchestrator<D>> {
    if config.storage.enabled {
        tracing::warn!(
            path = %database_path(config, database_flag).display(),
            "Database feature not enabled, story will not be saved"
        );
    }
    Ok(orchestrator)
}

fn prompt(question: &str) -> LullabyResult<String> {
    print!("{question}");
    std::io::stdout().flush().ok();

    let mut input = String::new();
    std::io::stdin().read_line(&mut input).map_err(|e| {
        StoryError::new(StoryErrorKind::InvalidInput(format!(
            "Failed to read input: {e}"
        )))
    })?;
    Ok(input.trim().to_string())
}

fn print_banner(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

fn print_welcome(config: &LullabyConfig) {
    print_banner("🌙 BEDTIME STORY GENERATOR 🌙");
    println!(
        "Target Age: {}-{} years",
        config.story.target_age_min, config.story.target_age_max
    );
    println!(
        "Quality Threshold: {}/10",
        config.judge.minimum_acceptance_score
    );
    println!("Max Revisions: {}", config.judge.max_revision_attempts);
    println!("{}\n", "=".repeat(60));
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn print_outcome(outcome: &StoryOutcome) {
    print_banner("📖 FINAL STORY:");
    println!("{}", outcome.story);
    println!("{}", "=".repeat(60));

    println!("\n📊 Story Quality Score: {:.1}/10", outcome.judge_score);
    println!("📁 Category: {}", title_case(outcome.category.as_ref()));
    println!("🔄 Revisions: {}", outcome.revision_count);
    println!("✅ Passed Guardrails: {}", yes_no(outcome.is_valid));
    println!(
        "🎯 Meets Quality Threshold: {}",
        yes_no(outcome.meets_quality_threshold)
    );
    if outcome.user_feedback_applied {
        println!(
            "💬 User Feedback Applied: {}",
            outcome.user_requested_changes.as_deref().unwrap_or("N/A")
        );
    }
    if let Some(id) = outcome.story_id {
        println!("💾 Saved as story #{id}");
    }

    if !outcome.judge_feedback.is_empty() {
        println!("\n📝 Judge Feedback Summary:");
        for line in outcome
            .judge_feedback
            .lines()
            .filter(|line| !line.trim().is_empty())
            .take(5)
        {
            println!("   {line}");
        }
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
