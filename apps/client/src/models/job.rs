use serde::{Deserialize, Serialize};

/// A job listing as it arrives from the listing source.
///
/// The core passes these fields through unmodified; only `description` and
/// `requirements` are read (and required non-empty) before a gateway call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: String,
    pub description: String,
    pub requirements: Vec<String>,
    pub salary: String,
    #[serde(rename = "postedDate")]
    pub posted_date: String,
}

impl Job {
    /// Requirements joined by newline, the shape the generation endpoint expects.
    pub fn requirements_text(&self) -> String {
        self.requirements.join("\n")
    }
}
