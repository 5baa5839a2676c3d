use serde::{Deserialize, Serialize};

/// One interview question with its time budget.
///
/// `time` is an opaque duration token (e.g. "4m30s") displayed as-is. `answer` starts
/// empty and is written exactly once by the session controller when the candidate
/// advances past the question; after the session completes it is never touched again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewQuestion {
    pub question: String,
    pub time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl InterviewQuestion {
    pub fn new(question: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            time: time.into(),
            answer: None,
        }
    }

    pub fn is_answered(&self) -> bool {
        self.answer.as_deref().is_some_and(|a| !a.trim().is_empty())
    }
}
