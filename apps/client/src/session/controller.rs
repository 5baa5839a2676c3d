//! Interview session controller.
//!
//! Phases cycle `Browsing → AwaitingUpload → Interviewing → Complete → Browsing`; no
//! other transition exists. An operation invoked from the wrong phase logs and does
//! nothing rather than erroring, matching the tolerant posture of the rest of the
//! client. Gateway and validation failures leave the phase exactly where it was, so
//! the candidate can always retry.
//!
//! Locking discipline: the phase lives behind a mutex taken only for short critical
//! sections and never across an await. The two gateway calls are the only suspension
//! points, guarded by an atomic in-flight flag so a second request cannot race its
//! response into the same state slot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::SessionError;
use crate::gateway::{InterviewGateway, ResumeFile};
use crate::models::{InterviewQuestion, Job};
use crate::questions::parse_question_blocks;

/// The session's current phase, with the data owned by that phase. Phase data is
/// created on entry and discarded on the transition back to `Browsing`; nothing leaks
/// across sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum SessionPhase {
    Browsing,
    AwaitingUpload {
        job: Job,
    },
    Interviewing {
        job: Job,
        user_id: String,
        questions: Vec<InterviewQuestion>,
        current_index: usize,
    },
    Complete {
        questions: Vec<InterviewQuestion>,
    },
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Browsing => "browsing",
            SessionPhase::AwaitingUpload { .. } => "awaiting_upload",
            SessionPhase::Interviewing { .. } => "interviewing",
            SessionPhase::Complete { .. } => "complete",
        }
    }
}

/// Clears the in-flight flag when the request finishes, on every exit path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns one candidate's session and exposes the transition operations the UI layer
/// drives. Sole owner and sole mutator of the phase.
pub struct SessionController {
    gateway: Arc<dyn InterviewGateway>,
    phase: Mutex<SessionPhase>,
    in_flight: AtomicBool,
}

impl SessionController {
    pub fn new(gateway: Arc<dyn InterviewGateway>) -> Self {
        Self {
            gateway,
            phase: Mutex::new(SessionPhase::Browsing),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current phase and its data.
    pub fn phase(&self) -> SessionPhase {
        self.phase.lock().clone()
    }

    /// The question currently awaiting an answer, if interviewing.
    pub fn current_question(&self) -> Option<InterviewQuestion> {
        match &*self.phase.lock() {
            SessionPhase::Interviewing {
                questions,
                current_index,
                ..
            } => questions.get(*current_index).cloned(),
            _ => None,
        }
    }

    /// Zero-based position and total count, if interviewing.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match &*self.phase.lock() {
            SessionPhase::Interviewing {
                questions,
                current_index,
                ..
            } => Some((*current_index, questions.len())),
            _ => None,
        }
    }

    /// Stores the chosen job and enters `AwaitingUpload`. Valid only from `Browsing`.
    pub fn select_job(&self, job: Job) {
        let mut phase = self.phase.lock();
        match &*phase {
            SessionPhase::Browsing => {
                info!(job_id = %job.id, title = %job.title, "job selected");
                *phase = SessionPhase::AwaitingUpload { job };
            }
            other => {
                warn!(phase = other.name(), "select_job ignored outside browsing");
            }
        }
    }

    /// Uploads the resume, requests question generation, and on success enters
    /// `Interviewing` at the first question. Valid only from `AwaitingUpload`.
    ///
    /// Missing inputs fail fast with `Validation` before any network call. On any
    /// gateway or parse failure the phase stays `AwaitingUpload` and the candidate may
    /// retry. At most one call runs at a time; a concurrent second call gets
    /// `RequestInFlight` without touching session state.
    pub async fn submit_resume_and_user(
        &self,
        file: ResumeFile,
        user_id: &str,
    ) -> Result<(), SessionError> {
        // The flag is taken before the phase is read. A caller racing a pending
        // request is rejected here; once the flag is free again the winner's phase
        // write is already visible, so a late caller reads `Interviewing` below and
        // no-ops instead of re-running the upload from a stale phase snapshot.
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .is_err()
        {
            warn!("rejecting concurrent request for this session");
            return Err(SessionError::RequestInFlight);
        }
        let _guard = InFlightGuard(&self.in_flight);

        let job = {
            let phase = self.phase.lock();
            match &*phase {
                SessionPhase::AwaitingUpload { job } => job.clone(),
                other => {
                    warn!(
                        phase = other.name(),
                        "submit_resume_and_user ignored outside awaiting_upload"
                    );
                    return Ok(());
                }
            }
        };

        if file.file_name.trim().is_empty() || file.bytes.is_empty() {
            return Err(SessionError::Validation(
                "a resume file is required".to_string(),
            ));
        }
        if user_id.trim().is_empty() {
            return Err(SessionError::Validation(
                "user_id cannot be empty".to_string(),
            ));
        }

        let uploaded = self
            .gateway
            .submit_resume(&file)
            .await
            .map_err(SessionError::Upload)?;
        info!(file_name = %uploaded.file_name, "resume uploaded and parsed");

        let questions = self.request_questions(user_id, &job).await?;
        info!(count = questions.len(), "questions generated, interview starting");

        // Commit only if the session is still waiting on this upload. With the flag
        // held no other operation can have moved the phase, but the write must never
        // clobber a live interview.
        let mut phase = self.phase.lock();
        match &*phase {
            SessionPhase::AwaitingUpload { .. } => {
                *phase = SessionPhase::Interviewing {
                    job,
                    user_id: user_id.to_string(),
                    questions,
                    current_index: 0,
                };
                Ok(())
            }
            other => {
                warn!(
                    phase = other.name(),
                    "discarding generated questions, phase moved during upload"
                );
                Ok(())
            }
        }
    }

    /// Calls the generation endpoint and parses the raw text. An empty parse result is
    /// a failure (`NoQuestionsGenerated`), never a zero-question interview.
    async fn request_questions(
        &self,
        user_id: &str,
        job: &Job,
    ) -> Result<Vec<InterviewQuestion>, SessionError> {
        let raw = self
            .gateway
            .generate_questions(user_id, &job.description, &job.requirements_text())
            .await
            .map_err(SessionError::Generation)?;

        let questions = parse_question_blocks(&raw);
        if questions.is_empty() {
            warn!("generation succeeded but no question blocks were found");
            return Err(SessionError::NoQuestionsGenerated);
        }
        Ok(questions)
    }

    /// Records the answer for the current question and advances. On the last question
    /// this transitions to `Complete`; otherwise the index moves forward by exactly
    /// one. No skipping, no backward navigation. Valid only from `Interviewing`.
    pub fn submit_answer(&self, answer: &str) -> Result<(), SessionError> {
        let mut phase = self.phase.lock();
        match &mut *phase {
            SessionPhase::Interviewing {
                questions,
                current_index,
                ..
            } => {
                if answer.trim().is_empty() {
                    return Err(SessionError::Validation(
                        "answer cannot be empty".to_string(),
                    ));
                }

                questions[*current_index].answer = Some(answer.to_string());

                if *current_index + 1 == questions.len() {
                    debug_assert!(questions.iter().all(|q| q.is_answered()));
                    info!(total = questions.len(), "final answer recorded, interview complete");
                    *phase = SessionPhase::Complete {
                        questions: std::mem::take(questions),
                    };
                } else {
                    *current_index += 1;
                    info!(index = *current_index, "advanced to next question");
                }
                Ok(())
            }
            other => {
                warn!(phase = other.name(), "submit_answer ignored outside interviewing");
                Ok(())
            }
        }
    }

    /// Discards all session data and returns to `Browsing`. Valid only from
    /// `Complete`; the reset is unconditional, so the next session starts clean.
    pub fn finish(&self) {
        let mut phase = self.phase.lock();
        match &*phase {
            SessionPhase::Complete { .. } => {
                info!("session finished, returning to job browsing");
                *phase = SessionPhase::Browsing;
            }
            other => {
                warn!(phase = other.name(), "finish ignored outside complete");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayError, UploadedResume};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Notify;

    /// Scriptable gateway: configurable results, call counting, and an optional gate
    /// that holds `submit_resume` open until the test releases it.
    struct MockGateway {
        resume_result: Mutex<Result<UploadedResume, String>>,
        questions_text: Mutex<String>,
        resume_calls: AtomicUsize,
        generate_calls: AtomicUsize,
        entered: Notify,
        release: Option<Notify>,
    }

    impl MockGateway {
        fn with_questions(text: &str) -> Self {
            Self {
                resume_result: Mutex::new(Ok(UploadedResume {
                    file_name: "cv.pdf".to_string(),
                    resume_data: "extracted text".to_string(),
                })),
                questions_text: Mutex::new(text.to_string()),
                resume_calls: AtomicUsize::new(0),
                generate_calls: AtomicUsize::new(0),
                entered: Notify::new(),
                release: None,
            }
        }

        fn gated(text: &str) -> Self {
            let mut mock = Self::with_questions(text);
            mock.release = Some(Notify::new());
            mock
        }

        fn failing_upload(message: &str) -> Self {
            let mock = Self::with_questions("");
            *mock.resume_result.lock() = Err(message.to_string());
            mock
        }
    }

    #[async_trait]
    impl InterviewGateway for MockGateway {
        async fn submit_resume(&self, _file: &ResumeFile) -> Result<UploadedResume, GatewayError> {
            self.resume_calls.fetch_add(1, Ordering::SeqCst);
            self.entered.notify_one();
            if let Some(release) = &self.release {
                release.notified().await;
            }
            self.resume_result
                .lock()
                .clone()
                .map_err(|message| GatewayError::Api {
                    status: 500,
                    message,
                })
        }

        async fn generate_questions(
            &self,
            _user_id: &str,
            _job_description: &str,
            _job_requirements: &str,
        ) -> Result<String, GatewayError> {
            self.generate_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.questions_text.lock().clone())
        }
    }

    fn sample_job() -> Job {
        Job {
            id: "1".to_string(),
            title: "Senior Rust Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            job_type: "Full-time".to_string(),
            description: "Build backend services.".to_string(),
            requirements: vec!["Rust".to_string(), "Tokio".to_string()],
            salary: "$180k".to_string(),
            posted_date: "2025-11-02".to_string(),
        }
    }

    fn sample_file() -> ResumeFile {
        ResumeFile {
            file_name: "cv.pdf".to_string(),
            bytes: b"%PDF-1.4 fake".to_vec(),
        }
    }

    const TWO_QUESTIONS: &str = "Q1: Explain recursion, T1: 3m0s Q2: What is a closure? T2: 2m30s";

    #[tokio::test]
    async fn test_full_cycle_browsing_to_complete_and_back() {
        let controller = SessionController::new(Arc::new(MockGateway::with_questions(
            TWO_QUESTIONS,
        )));
        assert_eq!(controller.phase(), SessionPhase::Browsing);

        controller.select_job(sample_job());
        assert_eq!(controller.phase().name(), "awaiting_upload");

        controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap();
        assert_eq!(controller.phase().name(), "interviewing");
        assert_eq!(controller.progress(), Some((0, 2)));
        assert_eq!(
            controller.current_question().unwrap().question,
            "Explain recursion"
        );

        controller.submit_answer("Base case plus self-call.").unwrap();
        assert_eq!(controller.progress(), Some((1, 2)));

        controller.submit_answer("A function capturing its environment.").unwrap();
        match controller.phase() {
            SessionPhase::Complete { questions } => {
                assert_eq!(questions.len(), 2);
                assert!(questions.iter().all(|q| q.is_answered()));
            }
            other => panic!("expected complete, got {}", other.name()),
        }

        controller.finish();
        assert_eq!(controller.phase(), SessionPhase::Browsing);
    }

    #[tokio::test]
    async fn test_wrong_phase_operations_are_noops() {
        let controller =
            SessionController::new(Arc::new(MockGateway::with_questions(TWO_QUESTIONS)));

        // All of these are invalid from Browsing: logged, ignored, phase unchanged.
        controller.submit_answer("ignored").unwrap();
        controller.finish();
        controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap();
        assert_eq!(controller.phase(), SessionPhase::Browsing);

        // select_job outside Browsing keeps the first selection.
        controller.select_job(sample_job());
        let mut other_job = sample_job();
        other_job.id = "2".to_string();
        controller.select_job(other_job);
        match controller.phase() {
            SessionPhase::AwaitingUpload { job } => assert_eq!(job.id, "1"),
            other => panic!("expected awaiting_upload, got {}", other.name()),
        }
    }

    #[tokio::test]
    async fn test_missing_inputs_fail_fast_without_network() {
        let gateway = Arc::new(MockGateway::with_questions(TWO_QUESTIONS));
        let controller = SessionController::new(gateway.clone());
        controller.select_job(sample_job());

        let err = controller
            .submit_resume_and_user(sample_file(), "   ")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert!(!err.retryable());

        let empty_file = ResumeFile {
            file_name: String::new(),
            bytes: Vec::new(),
        };
        let err = controller
            .submit_resume_and_user(empty_file, "user-42")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));

        assert_eq!(gateway.resume_calls.load(Ordering::SeqCst), 0);
        assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 0);
        assert_eq!(controller.phase().name(), "awaiting_upload");
    }

    #[tokio::test]
    async fn test_empty_parse_is_no_questions_generated_and_retryable() {
        let gateway = Arc::new(MockGateway::with_questions("nothing that matches"));
        let controller = SessionController::new(gateway.clone());
        controller.select_job(sample_job());

        let err = controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::NoQuestionsGenerated));
        assert!(err.retryable());
        assert_eq!(controller.phase().name(), "awaiting_upload");

        // Retry from the same phase after the generator behaves.
        *gateway.questions_text.lock() = TWO_QUESTIONS.to_string();
        controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap();
        assert_eq!(controller.phase().name(), "interviewing");
    }

    #[tokio::test]
    async fn test_upload_failure_leaves_phase_untouched() {
        let controller =
            SessionController::new(Arc::new(MockGateway::failing_upload("backend down")));
        controller.select_job(sample_job());

        let err = controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::Upload(_)));
        assert!(err.retryable());
        assert_eq!(controller.phase().name(), "awaiting_upload");
    }

    #[tokio::test]
    async fn test_final_answer_completes_exactly_once() {
        let controller = SessionController::new(Arc::new(MockGateway::with_questions(
            "Q1: Only question T1: 1m0s",
        )));
        controller.select_job(sample_job());
        controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap();

        controller.submit_answer("first").unwrap();
        assert_eq!(controller.phase().name(), "complete");

        // Further submissions are wrong-phase no-ops; the recorded answer stands.
        controller.submit_answer("second").unwrap();
        controller.submit_answer("third").unwrap();
        match controller.phase() {
            SessionPhase::Complete { questions } => {
                assert_eq!(questions.len(), 1);
                assert_eq!(questions[0].answer.as_deref(), Some("first"));
            }
            other => panic!("expected complete, got {}", other.name()),
        }
    }

    #[tokio::test]
    async fn test_empty_answer_is_rejected_without_advancing() {
        let controller =
            SessionController::new(Arc::new(MockGateway::with_questions(TWO_QUESTIONS)));
        controller.select_job(sample_job());
        controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap();

        let err = controller.submit_answer("   ").unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)));
        assert_eq!(controller.progress(), Some((0, 2)));
    }

    #[tokio::test]
    async fn test_finish_discards_all_prior_session_data() {
        let controller =
            SessionController::new(Arc::new(MockGateway::with_questions(TWO_QUESTIONS)));
        controller.select_job(sample_job());
        controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap();
        controller.submit_answer("one").unwrap();
        controller.submit_answer("two").unwrap();
        controller.finish();

        // Next session starts from a clean slate: no job, no questions, no answers.
        assert_eq!(controller.phase(), SessionPhase::Browsing);
        controller.select_job(sample_job());
        match controller.phase() {
            SessionPhase::AwaitingUpload { job } => assert_eq!(job.id, "1"),
            other => panic!("expected awaiting_upload, got {}", other.name()),
        }
        assert!(controller.current_question().is_none());
        assert!(controller.progress().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_submission_is_rejected_not_raced() {
        let gateway = Arc::new(MockGateway::gated(TWO_QUESTIONS));
        let controller = Arc::new(SessionController::new(gateway.clone()));
        controller.select_job(sample_job());

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .submit_resume_and_user(sample_file(), "user-42")
                    .await
            })
        };

        // Wait until the first call is parked inside the gateway, then issue a second.
        gateway.entered.notified().await;
        let err = controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap_err();
        assert!(matches!(err, SessionError::RequestInFlight));
        assert!(!err.retryable());

        gateway.release.as_ref().unwrap().notify_one();
        first.await.unwrap().unwrap();

        // Exactly one transition happened, driven by the first call alone.
        assert_eq!(controller.phase().name(), "interviewing");
        assert_eq!(gateway.resume_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 1);
        assert_eq!(controller.progress(), Some((0, 2)));
    }

    #[tokio::test]
    async fn test_submission_after_interview_started_cannot_clobber_it() {
        let gateway = Arc::new(MockGateway::gated(TWO_QUESTIONS));
        let controller = Arc::new(SessionController::new(gateway.clone()));
        controller.select_job(sample_job());

        let winner = {
            let controller = controller.clone();
            tokio::spawn(async move {
                controller
                    .submit_resume_and_user(sample_file(), "user-42")
                    .await
            })
        };
        gateway.entered.notified().await;
        gateway.release.as_ref().unwrap().notify_one();
        winner.await.unwrap().unwrap();

        // The interview is live and has recorded an answer.
        controller.submit_answer("Base case plus self-call.").unwrap();
        assert_eq!(controller.progress(), Some((1, 2)));

        // A straggler submission arriving now must not re-run the cycle or reset
        // the session: the in-flight flag is free, so it reaches the phase check
        // and no-ops against the live interview.
        controller
            .submit_resume_and_user(sample_file(), "user-42")
            .await
            .unwrap();

        assert_eq!(controller.progress(), Some((1, 2)));
        match controller.phase() {
            SessionPhase::Interviewing { questions, .. } => {
                assert_eq!(
                    questions[0].answer.as_deref(),
                    Some("Base case plus self-call.")
                );
            }
            other => panic!("expected interviewing, got {}", other.name()),
        }
        assert_eq!(gateway.resume_calls.load(Ordering::SeqCst), 1);
        assert_eq!(gateway.generate_calls.load(Ordering::SeqCst), 1);
    }
}
