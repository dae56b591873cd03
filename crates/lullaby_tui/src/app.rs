//! Dashboard state.

use lullaby_core::{Category, StoredStory, StoryStatistics};
use strum::IntoEnumIterator;

/// Which view is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AppMode {
    /// Story history table
    List,
    /// One story with its metadata
    Detail,
    /// Aggregate numbers
    Statistics,
    /// Typing a search query
    Search,
}

/// What the story list currently shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StoryQuery {
    /// Every story, newest first
    #[default]
    All,
    /// Stories whose request or text contains the query
    Search(String),
    /// Stories of one category
    Category(Category),
}

impl StoryQuery {
    /// Header label for the active filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use lullaby_core::Category;
    /// use lullaby_tui::StoryQuery;
    ///
    /// assert_eq!(StoryQuery::All.label(), "All stories");
    /// assert_eq!(StoryQuery::Category(Category::Fantasy).label(), "Category: fantasy");
    /// ```
    pub fn label(&self) -> String {
        match self {
            StoryQuery::All => "All stories".to_string(),
            StoryQuery::Search(text) => format!("Search: \"{}\"", text),
            StoryQuery::Category(category) => format!("Category: {}", category),
        }
    }
}

/// Main application state.
#[derive(Debug, Clone)]
pub struct App {
    /// Current mode
    pub mode: AppMode,
    /// Active list query
    pub query: StoryQuery,
    /// Stories currently shown
    pub stories: Vec<StoredStory>,
    /// Selected row in the list
    pub selected_index: usize,
    /// Search text being typed
    pub search_input: String,
    /// Statistics, loaded when the statistics view opens
    pub statistics: Option<StoryStatistics>,
    /// Last status message
    pub status_message: String,
    /// Whether to leave the main loop
    pub should_quit: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    /// Fresh state showing all stories.
    pub fn new() -> Self {
        Self {
            mode: AppMode::List,
            query: StoryQuery::All,
            stories: Vec::new(),
            selected_index: 0,
            search_input: String::new(),
            statistics: None,
            status_message: String::from("Welcome to Lullaby"),
            should_quit: false,
        }
    }

    /// Replace the shown stories, keeping the selection in range.
    pub fn set_stories(&mut self, stories: Vec<StoredStory>) {
        self.stories = stories;
        if self.selected_index >= self.stories.len() {
            self.selected_index = self.stories.len().saturating_sub(1);
        }
    }

    /// Move selection up.
    pub fn select_previous(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    /// Move selection down.
    pub fn select_next(&mut self) {
        if self.selected_index < self.stories.len().saturating_sub(1) {
            self.selected_index += 1;
        }
    }

    /// The highlighted story, if any.
    pub fn selected_story(&self) -> Option<&StoredStory> {
        self.stories.get(self.selected_index)
    }

    /// Open the detail view for the highlighted story.
    pub fn enter_detail(&mut self) {
        if !self.stories.is_empty() {
            self.mode = AppMode::Detail;
        }
    }

    /// Open the statistics view with freshly loaded numbers.
    pub fn show_statistics(&mut self, statistics: StoryStatistics) {
        self.statistics = Some(statistics);
        self.mode = AppMode::Statistics;
    }

    /// Return to the list view.
    pub fn return_to_list(&mut self) {
        self.mode = AppMode::List;
    }

    /// Start typing a search query.
    pub fn begin_search(&mut self) {
        self.search_input.clear();
        self.mode = AppMode::Search;
    }

    /// Apply the typed query. An empty query shows every story.
    pub fn apply_search(&mut self) {
        let text = self.search_input.trim();
        self.query = if text.is_empty() {
            StoryQuery::All
        } else {
            StoryQuery::Search(text.to_string())
        };
        self.selected_index = 0;
        self.mode = AppMode::List;
    }

    /// Leave search mode without changing the query.
    pub fn cancel_search(&mut self) {
        self.search_input.clear();
        self.mode = AppMode::List;
    }

    /// Step the category filter: all, then each category in turn, then all again.
    ///
    /// A search query is replaced by the first category.
    pub fn cycle_category_filter(&mut self) {
        let categories: Vec<Category> = Category::iter().collect();
        self.query = match &self.query {
            StoryQuery::Category(current) => categories
                .iter()
                .position(|c| c == current)
                .and_then(|i| categories.get(i + 1))
                .map_or(StoryQuery::All, |next| StoryQuery::Category(*next)),
            _ => categories
                .first()
                .map_or(StoryQuery::All, |first| StoryQuery::Category(*first)),
        };
        self.selected_index = 0;
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }
}
