//! Rendering.

use crate::app::{App, AppMode};
use lullaby_core::StoredStory;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Row, Table, Wrap},
};

const PREVIEW_CHARS: usize = 50;

/// Draw the whole dashboard.
#[tracing::instrument(skip_all)]
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Main content
            Constraint::Length(3), // Status bar
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);

    match app.mode {
        AppMode::List => draw_list_view(f, app, chunks[1]),
        AppMode::Detail => draw_detail_view(f, app, chunks[1]),
        AppMode::Statistics => draw_statistics_view(f, app, chunks[1]),
        AppMode::Search => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(3), Constraint::Min(0)])
                .split(chunks[1]);
            draw_search_input(f, app, parts[0]);
            draw_list_view(f, app, parts[1]);
        }
    }

    draw_status_bar(f, app, chunks[2]);
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let title = format!("Lullaby Story History - {}", app.query.label());
    let header = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center);
    f.render_widget(header, area);
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let help_text = match app.mode {
        AppMode::List => {
            "↑↓: Navigate | Enter: Detail | S: Stats | /: Search | C: Category | D: Delete | X: Export | R: Reload | Q: Quit"
        }
        AppMode::Detail => "↑↓: Previous/Next | D: Delete | Esc: Back | Q: Quit",
        AppMode::Statistics => "Esc: Back | Q: Quit",
        AppMode::Search => "Enter: Apply | Esc: Cancel",
    };

    let status = Paragraph::new(format!("{} | {}", app.status_message, help_text))
        .block(Block::default().borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(status, area);
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

fn draw_list_view(f: &mut Frame, app: &App, area: Rect) {
    let header = Row::new(vec!["ID", "Date", "Category", "Score", "Rev", "OK", "Request"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = app
        .stories
        .iter()
        .enumerate()
        .map(|(i, story)| {
            let style = if i == app.selected_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            Row::new(vec![
                story.id.to_string(),
                story.created_at.format("%Y-%m-%d %H:%M").to_string(),
                story.category.to_string(),
                format!("{:.1}", story.judge_score),
                story.revision_count.to_string(),
                if story.meets_quality_threshold { "✓" } else { "✗" }.to_string(),
                preview(&story.user_request),
            ])
            .style(style)
        })
        .collect();

    let title = if app.stories.is_empty() {
        "Stories (none)".to_string()
    } else {
        format!("Stories ({})", app.stories.len())
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(6),
            Constraint::Length(17),
            Constraint::Length(11),
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(20),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);
}

fn detail_lines(story: &StoredStory) -> Vec<String> {
    let mut lines = vec![
        format!("ID: {}", story.id),
        format!("Created: {}", story.created_at.format("%Y-%m-%d %H:%M:%S")),
        format!("Category: {}", story.category),
        format!(
            "Score: {:.1}/10 ({})",
            story.judge_score,
            if story.meets_quality_threshold {
                "meets threshold"
            } else {
                "below threshold"
            }
        ),
        format!("Revisions: {}", story.revision_count),
        format!("Persona: {}", story.parent_settings.persona),
        format!("Request: {}", story.user_request),
    ];
    if let Some(feedback) = &story.user_feedback {
        lines.push(format!("User feedback: {}", feedback));
    }
    if let Some(variety) = &story.variety_config {
        lines.push(format!(
            "Style: {} | {}",
            variety.narrative_style.name, variety.perspective.name
        ));
    }

    lines.push(String::new());
    if story.validation.all_issues.is_empty() {
        lines.push("Validation: passed".to_string());
    } else {
        lines.push("Validation issues:".to_string());
        lines.extend(story.validation.all_issues.iter().map(|i| format!("  - {}", i)));
    }

    lines.push(String::new());
    lines.push("Judge feedback:".to_string());
    lines.extend(story.judge_feedback.lines().map(String::from));

    lines.push(String::new());
    lines.push("Story:".to_string());
    lines.extend(story.story_text.lines().map(String::from));
    lines
}

fn draw_detail_view(f: &mut Frame, app: &App, area: Rect) {
    if let Some(story) = app.selected_story() {
        let detail = Paragraph::new(detail_lines(story).join("\n"))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Story #{}", story.id)),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(detail, area);
    }
}

fn draw_statistics_view(f: &mut Frame, app: &App, area: Rect) {
    let Some(stats) = &app.statistics else {
        return;
    };

    let mut lines = vec![
        format!("Total stories: {}", stats.total_stories),
        format!("Average score: {:.2}/10", stats.average_score),
        format!("Meeting quality threshold: {}", stats.stories_meeting_threshold),
        format!("Average revisions: {:.2}", stats.average_revisions),
        String::new(),
        "Stories by category:".to_string(),
    ];
    lines.extend(
        stats
            .category_distribution
            .iter()
            .map(|(category, count)| format!("  {:<12} {}", category, count)),
    );

    let view = Paragraph::new(lines.join("\n"))
        .block(Block::default().borders(Borders::ALL).title("Statistics"));
    f.render_widget(view, area);
}

fn draw_search_input(f: &mut Frame, app: &App, area: Rect) {
    let input = Paragraph::new(format!("{}_", app.search_input))
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title("Search"));
    f.render_widget(input, area);
}
