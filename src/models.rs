mod answer;
mod history;

pub use answer::{AnswerResponse, RESULT_LIMIT};
pub use history::{HistoryEntry, Sender};
