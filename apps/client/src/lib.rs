//! Core library for the interview-practice client.
//!
//! The logic lives in two places: `questions::parser` turns the generator's raw text
//! blob into an ordered question list, and `session` owns the phase state machine that
//! sequences job selection, resume upload, question generation, and answer capture.
//! Everything network-shaped goes through the `gateway::InterviewGateway` trait.

pub mod config;
pub mod errors;
pub mod gateway;
pub mod models;
pub mod questions;
pub mod session;

pub use errors::SessionError;
pub use gateway::{GatewayError, HttpGateway, InterviewGateway};
pub use models::{InterviewQuestion, Job};
pub use session::{SessionController, SessionPhase};
