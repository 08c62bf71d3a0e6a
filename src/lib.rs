pub mod backend;
pub mod controller;
pub mod fallback;
pub mod models;
pub mod tui;

pub use backend::{BackendClient, BackendClientBuilder, BackendClientTrait, BackendError};
pub use controller::{
    DispatchOutcome, DisplayState, ERROR_TOAST_MS, QueryController, RenderTarget,
};
pub use fallback::FallbackResponder;
pub use models::{AnswerResponse, HistoryEntry, RESULT_LIMIT, Sender};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn types_accessible_from_crate_root() {
        let response = AnswerResponse::new("answer", vec!["doc.md".to_string()], 0.9);
        assert_eq!(response.confidence_percent(), 90);

        let entry = HistoryEntry::user("question");
        assert_eq!(entry.sender(), Sender::User);

        assert_eq!(RESULT_LIMIT, 5);
    }

    #[test]
    fn controller_constructible_from_crate_root() {
        use std::sync::Arc;

        struct NoopBackend;
        impl BackendClientTrait for NoopBackend {
            fn query(&self, _query: &str) -> Result<AnswerResponse, BackendError> {
                Err(BackendError::Http { status: 503 })
            }
        }

        let controller = QueryController::new(Arc::new(NoopBackend));
        assert_eq!(controller.state(), DisplayState::Idle);
        assert!(controller.history().is_empty());
    }
}
