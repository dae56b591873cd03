//! Synchronous story queries.
//!
//! Each function takes a plain connection so the CLI and the dashboard can
//! use them without an async runtime.

use crate::schema::stories::{self, dsl};
use crate::{DatabaseResult, NewStoryRow, StoryRow};
use diesel::dsl::{avg, count_star, sql};
use diesel::prelude::*;
use diesel::sql_types::{Double, Nullable};
use diesel::sqlite::SqliteConnection;
use lullaby_core::{StoredStory, StoryFilter, StoryOutcome, StoryStatistics};
use tracing::{debug, info, instrument};

fn decode(rows: Vec<StoryRow>) -> DatabaseResult<Vec<StoredStory>> {
    rows.into_iter().map(StoryRow::into_stored).collect()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Save a finished story and return its id.
#[instrument(skip_all, fields(category = %outcome.category, score = outcome.judge_score))]
pub fn insert_story(conn: &mut SqliteConnection, outcome: &StoryOutcome) -> DatabaseResult<i32> {
    let row = NewStoryRow::from_outcome(outcome)?;
    let id = diesel::insert_into(stories::table)
        .values(&row)
        .returning(dsl::id)
        .get_result::<i32>(conn)?;
    info!(id, "Saved story");
    Ok(id)
}

/// Load one story by id.
#[instrument(skip(conn))]
pub fn get_story(conn: &mut SqliteConnection, id: i32) -> DatabaseResult<Option<StoredStory>> {
    stories::table
        .find(id)
        .select(StoryRow::as_select())
        .first(conn)
        .optional()?
        .map(StoryRow::into_stored)
        .transpose()
}

/// Most recent stories first.
#[instrument(skip(conn))]
pub fn list_stories(
    conn: &mut SqliteConnection,
    limit: i64,
    offset: i64,
) -> DatabaseResult<Vec<StoredStory>> {
    let rows = stories::table
        .select(StoryRow::as_select())
        .order((dsl::created_at.desc(), dsl::id.desc()))
        .limit(limit)
        .offset(offset)
        .load(conn)?;
    debug!(count = rows.len(), "Listed stories");
    decode(rows)
}

/// Stories whose request or text contains `query`.
#[instrument(skip(conn))]
pub fn search_stories(
    conn: &mut SqliteConnection,
    query: &str,
    limit: i64,
) -> DatabaseResult<Vec<StoredStory>> {
    let pattern = format!("%{}%", query);
    let rows = stories::table
        .select(StoryRow::as_select())
        .filter(
            dsl::user_request
                .like(&pattern)
                .or(dsl::story_text.like(&pattern)),
        )
        .order((dsl::created_at.desc(), dsl::id.desc()))
        .limit(limit)
        .load(conn)?;
    debug!(count = rows.len(), "Search matched stories");
    decode(rows)
}

/// Stories matching the filter's category and score bounds.
#[instrument(skip(conn))]
pub fn filter_stories(
    conn: &mut SqliteConnection,
    filter: &StoryFilter,
) -> DatabaseResult<Vec<StoredStory>> {
    let mut query = stories::table.select(StoryRow::as_select()).into_boxed();

    if let Some(category) = filter.category() {
        query = query.filter(dsl::category.eq(category.to_string()));
    }
    if let Some(min) = filter.min_score() {
        query = query.filter(dsl::judge_score.ge(*min));
    }
    if let Some(max) = filter.max_score() {
        query = query.filter(dsl::judge_score.le(*max));
    }

    let rows = query
        .order((dsl::created_at.desc(), dsl::id.desc()))
        .limit(*filter.limit())
        .load(conn)?;
    debug!(count = rows.len(), "Filtered stories");
    decode(rows)
}

/// Delete a story. Returns `false` if no row had that id.
#[instrument(skip(conn))]
pub fn delete_story(conn: &mut SqliteConnection, id: i32) -> DatabaseResult<bool> {
    let deleted = diesel::delete(stories::table.find(id)).execute(conn)?;
    if deleted > 0 {
        info!(id, "Deleted story");
    }
    Ok(deleted > 0)
}

/// Aggregate numbers across all stories.
///
/// The average score ignores unscored (zero) stories. An empty database
/// yields all zeros.
#[instrument(skip(conn))]
pub fn story_statistics(conn: &mut SqliteConnection) -> DatabaseResult<StoryStatistics> {
    let total_stories: i64 = stories::table.count().get_result(conn)?;

    let average_score: Option<f64> = stories::table
        .filter(dsl::judge_score.gt(0.0))
        .select(avg(dsl::judge_score))
        .first(conn)?;

    let mut category_distribution: Vec<(String, i64)> = stories::table
        .group_by(dsl::category)
        .select((dsl::category, count_star()))
        .load(conn)?;
    category_distribution.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let stories_meeting_threshold: i64 = stories::table
        .filter(dsl::meets_quality_threshold.eq(true))
        .count()
        .get_result(conn)?;

    let average_revisions: Option<f64> = stories::table
        .select(sql::<Nullable<Double>>("AVG(revision_count)"))
        .first(conn)?;

    Ok(StoryStatistics {
        total_stories,
        average_score: round2(average_score.unwrap_or_default()),
        category_distribution,
        stories_meeting_threshold,
        average_revisions: round2(average_revisions.unwrap_or_default()),
    })
}
