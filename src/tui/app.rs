use crate::controller::RenderTarget;
use crate::models::AnswerResponse;

/// Presentation state for the TUI.
///
/// Owns the search input buffer and a view of whatever the controller last
/// asked to be rendered. `App` is the TUI's `RenderTarget` implementation:
/// the controller's render calls record into these fields and the frame loop
/// paints from them.
#[derive(Debug, Clone, Default)]
pub struct App {
    /// Search input buffer
    input: String,
    /// Whether a query is in flight (spinner visible)
    loading: bool,
    /// The last rendered answer, with the query it echoed
    results: Option<(String, AnswerResponse)>,
    /// Active error toast text, if any
    error: Option<String>,
    /// Scroll offset for the results surface
    results_scroll: u16,
}

impl App {
    /// Creates an App with an empty input and no surface content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the search input buffer.
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns whether the spinner should be visible.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns the last rendered (query, response) pair.
    pub fn results(&self) -> Option<(&str, &AnswerResponse)> {
        self.results.as_ref().map(|(q, r)| (q.as_str(), r))
    }

    /// Returns the active error toast text.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns the results surface scroll offset.
    pub fn results_scroll(&self) -> u16 {
        self.results_scroll
    }

    /// Adds a character to the input buffer.
    pub fn push_input_char(&mut self, c: char) {
        self.input.push(c);
    }

    /// Removes the last character from the input buffer.
    pub fn pop_input_char(&mut self) {
        self.input.pop();
    }

    /// Empties the input buffer (after a successful dispatch, and Ctrl+K).
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Scrolls the results surface down by the specified amount.
    pub fn scroll_results_down(&mut self, amount: u16) {
        self.results_scroll = self.results_scroll.saturating_add(amount);
    }

    /// Scrolls the results surface up by the specified amount.
    pub fn scroll_results_up(&mut self, amount: u16) {
        self.results_scroll = self.results_scroll.saturating_sub(amount);
    }

    /// Clears the error toast (called when the controller dismisses it).
    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

impl RenderTarget for App {
    fn render_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    fn render_results(&mut self, query: &str, response: &AnswerResponse) {
        self.loading = false;
        self.error = None;
        self.results = Some((query.to_string(), response.clone()));
        self.results_scroll = 0;
    }

    fn render_error(&mut self, message: &str) {
        self.loading = false;
        self.error = Some(message.to_string());
    }
}
