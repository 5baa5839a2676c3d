pub mod job;
pub mod question;

pub use job::Job;
pub use question::InterviewQuestion;
