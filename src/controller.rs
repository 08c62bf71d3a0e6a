//! Query-dispatch and response-rendering state machine.
//!
//! `QueryController` owns the display state and the session history, talks to
//! the backend through the `BackendClientTrait` seam, and degrades to the
//! offline responder when the backend fails. It knows nothing about any
//! concrete render target: the presentation layer passes a `RenderTarget`
//! into `dispatch` and draws from whatever that call recorded.

use std::sync::Arc;
use std::time::Instant;

use crate::backend::{BackendClientTrait, BackendError};
use crate::fallback::FallbackResponder;
use crate::models::{AnswerResponse, HistoryEntry};

/// How long the error toast stays up before auto-dismissal.
pub const ERROR_TOAST_MS: u64 = 5000;

/// The mutually exclusive set of visible surfaces at any instant.
///
/// Invariant: showing results implies chat is hidden, and vice versa. The
/// controller is the only writer, so the invariant holds by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayState {
    /// No surface active
    Idle,
    /// Query in flight, spinner visible
    Loading,
    /// Chat surface (session history) visible
    ShowingChat,
    /// Results surface (latest answer) visible
    ShowingResults,
    /// Error toast visible
    Error,
}

/// What a call to `dispatch` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Empty query: nothing happened, no state change
    Ignored,
    /// An answer was rendered; the presentation should clear its input buffer
    Answered,
    /// Both the backend and the fallback failed; an error toast was rendered
    Failed,
}

/// Capability interface the presentation layer hands to `dispatch`.
///
/// Contract: `render_results` and `render_error` supersede any earlier
/// `render_loading` for the same dispatch, so implementations must retire
/// their loading indicator before showing either.
pub trait RenderTarget {
    /// Shows the in-flight indicator.
    fn render_loading(&mut self);

    /// Hides chat and loading, shows the results surface for this answer.
    fn render_results(&mut self, query: &str, response: &AnswerResponse);

    /// Hides loading, shows a transient error toast.
    fn render_error(&mut self, message: &str);
}

/// Owns the dispatch state machine, the history, and the fallback path.
pub struct QueryController {
    client: Arc<dyn BackendClientTrait>,
    fallback: FallbackResponder,
    history: Vec<HistoryEntry>,
    state: DisplayState,
    error_shown_at: Option<Instant>,
}

impl QueryController {
    /// Creates a controller with the default fallback responder.
    pub fn new(client: Arc<dyn BackendClientTrait>) -> Self {
        Self::with_fallback(client, FallbackResponder::new())
    }

    /// Creates a controller with a custom fallback responder.
    ///
    /// Tests use `FallbackResponder::with_delay(Duration::ZERO)` to skip the
    /// simulated latency.
    pub fn with_fallback(client: Arc<dyn BackendClientTrait>, fallback: FallbackResponder) -> Self {
        Self {
            client,
            fallback,
            history: Vec::new(),
            state: DisplayState::Idle,
            error_shown_at: None,
        }
    }

    /// Returns the current display state.
    pub fn state(&self) -> DisplayState {
        self.state
    }

    /// Returns the session history, oldest first.
    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    /// Submits a query: the primary entry point.
    ///
    /// A whitespace-only query is a no-op. Otherwise the controller
    /// transitions to `Loading`, fetches an answer (backend first, offline
    /// fallback on any transport failure), renders the result, and appends
    /// the user/assistant pair to the history.
    ///
    /// The presentation resolves "dispatch with no argument" by reading its
    /// own input buffer before calling; on `Answered` it clears that buffer.
    pub fn dispatch(&mut self, query: &str, render: &mut dyn RenderTarget) -> DispatchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return DispatchOutcome::Ignored;
        }

        self.state = DisplayState::Loading;
        render.render_loading();

        match self.fetch_answer(query) {
            Ok(response) => {
                self.state = DisplayState::ShowingResults;
                render.render_results(query, &response);
                self.history.push(HistoryEntry::user(query));
                self.history.push(HistoryEntry::assistant(response.answer()));
                DispatchOutcome::Answered
            }
            Err(error) => {
                self.show_error(
                    "Sorry, I encountered an error. Please try again.",
                    render,
                );
                // The fallback is infallible, so this arm is only reachable
                // if it is broken; keep the cause visible for diagnostics.
                eprintln!("query dispatch failed: {error}");
                DispatchOutcome::Failed
            }
        }
    }

    /// Fetches an answer: one backend attempt, then the offline fallback.
    ///
    /// Graceful-degradation contract: transport failures (network, non-2xx,
    /// decode) never propagate; the only error this can return is one the
    /// fallback itself produced, which it does not by design.
    fn fetch_answer(&self, query: &str) -> Result<AnswerResponse, BackendError> {
        match self.client.query(query) {
            Ok(response) => Ok(response),
            Err(_) => Ok(self.fallback.respond(query)),
        }
    }

    /// Shows the chat surface. Results are hidden by the exclusivity
    /// invariant: the state machine has a single active surface.
    pub fn show_chat(&mut self) {
        self.state = DisplayState::ShowingChat;
    }

    /// Hides the chat surface; no effect if chat is not showing.
    pub fn hide_chat(&mut self) {
        if self.state == DisplayState::ShowingChat {
            self.state = DisplayState::Idle;
        }
    }

    /// Dismisses whichever surface is active (Esc binding).
    pub fn reset_view(&mut self) {
        self.state = DisplayState::Idle;
        self.error_shown_at = None;
    }

    /// Enters the error state and renders a toast, stamping the dismissal
    /// timer. Also used by the presentation for faults of its own.
    pub fn show_error(&mut self, message: &str, render: &mut dyn RenderTarget) {
        self.state = DisplayState::Error;
        self.error_shown_at = Some(Instant::now());
        render.render_error(message);
    }

    /// Returns whether the error toast has been up for at least `timeout_ms`.
    pub fn should_dismiss_error(&self, timeout_ms: u64) -> bool {
        if self.state != DisplayState::Error {
            return false;
        }
        match self.error_shown_at {
            Some(shown_at) => shown_at.elapsed().as_millis() >= u128::from(timeout_ms),
            None => false,
        }
    }

    /// Clears the error toast and returns to an idle, re-enterable state.
    pub fn dismiss_error(&mut self) {
        if self.state == DisplayState::Error {
            self.state = DisplayState::Idle;
            self.error_shown_at = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    struct MockBackend {
        result: fn() -> Result<AnswerResponse, BackendError>,
    }

    impl BackendClientTrait for MockBackend {
        fn query(&self, _query: &str) -> Result<AnswerResponse, BackendError> {
            (self.result)()
        }
    }

    fn ok_backend() -> Arc<dyn BackendClientTrait> {
        Arc::new(MockBackend {
            result: || Ok(AnswerResponse::new("backend answer", vec!["doc.md".into()], 0.9)),
        })
    }

    fn failing_backend() -> Arc<dyn BackendClientTrait> {
        Arc::new(MockBackend {
            result: || Err(BackendError::Http { status: 500 }),
        })
    }

    /// Records render calls in order, for asserting the dispatch sequence.
    #[derive(Default)]
    struct RecordingTarget {
        calls: Vec<String>,
    }

    impl RenderTarget for RecordingTarget {
        fn render_loading(&mut self) {
            self.calls.push("loading".to_string());
        }

        fn render_results(&mut self, query: &str, response: &AnswerResponse) {
            self.calls.push(format!("results:{}:{}", query, response.answer()));
        }

        fn render_error(&mut self, message: &str) {
            self.calls.push(format!("error:{}", message));
        }
    }

    fn test_controller(client: Arc<dyn BackendClientTrait>) -> QueryController {
        QueryController::with_fallback(client, FallbackResponder::with_delay(Duration::ZERO))
    }

    #[test]
    fn dispatch_success_renders_loading_then_results() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        let outcome = controller.dispatch("what are the principles?", &mut target);

        assert_eq!(outcome, DispatchOutcome::Answered);
        assert_eq!(controller.state(), DisplayState::ShowingResults);
        assert_eq!(
            target.calls,
            vec!["loading", "results:what are the principles?:backend answer"]
        );
    }

    #[test]
    fn dispatch_trims_query_before_use() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.dispatch("  padded query  \n", &mut target);

        assert_eq!(controller.history()[0].message(), "padded query");
        assert!(target.calls[1].starts_with("results:padded query:"));
    }

    #[test]
    fn empty_dispatch_is_a_no_op() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        for query in ["", "   ", "\t\n"] {
            let outcome = controller.dispatch(query, &mut target);
            assert_eq!(outcome, DispatchOutcome::Ignored);
        }

        assert_eq!(controller.state(), DisplayState::Idle);
        assert!(controller.history().is_empty());
        assert!(target.calls.is_empty());
    }

    #[test]
    fn dispatch_leaves_loading_exactly_once() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.dispatch("q", &mut target);

        let loading_calls = target.calls.iter().filter(|c| *c == "loading").count();
        assert_eq!(loading_calls, 1);
        assert_ne!(controller.state(), DisplayState::Loading);
    }

    #[test]
    fn backend_failure_falls_back_and_still_answers() {
        let mut controller = test_controller(failing_backend());
        let mut target = RecordingTarget::default();

        let outcome = controller.dispatch("What are the EA principles?", &mut target);

        // Transport failure never surfaces; the fallback answer renders
        assert_eq!(outcome, DispatchOutcome::Answered);
        assert_eq!(controller.state(), DisplayState::ShowingResults);
        assert!(target.calls[1].contains("Business Alignment"));
    }

    #[test]
    fn successful_dispatch_appends_user_then_assistant() {
        use crate::models::Sender;

        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.dispatch("my question", &mut target);

        let history = controller.history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].sender(), Sender::User);
        assert_eq!(history[0].message(), "my question");
        assert_eq!(history[1].sender(), Sender::Assistant);
        assert_eq!(history[1].message(), "backend answer");
    }

    #[test]
    fn history_accumulates_across_dispatches() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.dispatch("first", &mut target);
        controller.dispatch("second", &mut target);

        assert_eq!(controller.history().len(), 4);
        assert_eq!(controller.history()[0].message(), "first");
        assert_eq!(controller.history()[2].message(), "second");
    }

    #[test]
    fn show_chat_hides_results() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.dispatch("q", &mut target);
        assert_eq!(controller.state(), DisplayState::ShowingResults);

        controller.show_chat();
        assert_eq!(controller.state(), DisplayState::ShowingChat);
    }

    #[test]
    fn hide_chat_only_leaves_chat_state() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.show_chat();
        controller.hide_chat();
        assert_eq!(controller.state(), DisplayState::Idle);

        // Not showing chat: hide_chat must not disturb the results surface
        controller.dispatch("q", &mut target);
        controller.hide_chat();
        assert_eq!(controller.state(), DisplayState::ShowingResults);
    }

    #[test]
    fn reset_view_returns_to_idle_from_any_surface() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.dispatch("q", &mut target);
        controller.reset_view();
        assert_eq!(controller.state(), DisplayState::Idle);

        controller.show_chat();
        controller.reset_view();
        assert_eq!(controller.state(), DisplayState::Idle);
    }

    #[test]
    fn show_error_renders_toast_and_enters_error_state() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.show_error("boom", &mut target);

        assert_eq!(controller.state(), DisplayState::Error);
        assert_eq!(target.calls, vec!["error:boom"]);
    }

    #[test]
    fn error_toast_dismisses_after_timeout() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.show_error("boom", &mut target);

        // Not yet with the real 5s timeout, immediately with a zero timeout
        assert!(!controller.should_dismiss_error(ERROR_TOAST_MS));
        assert!(controller.should_dismiss_error(0));

        controller.dismiss_error();
        assert_eq!(controller.state(), DisplayState::Idle);
        assert!(!controller.should_dismiss_error(0));
    }

    #[test]
    fn dismiss_error_outside_error_state_is_harmless() {
        let mut controller = test_controller(ok_backend());
        let mut target = RecordingTarget::default();

        controller.dispatch("q", &mut target);
        controller.dismiss_error();
        assert_eq!(controller.state(), DisplayState::ShowingResults);
    }
}
