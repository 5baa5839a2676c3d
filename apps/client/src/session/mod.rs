// Session: the phase state machine that owns all mutable interview state. The
// controller is the sole mutator; the parser and the UI layer only ever see clones.

pub mod controller;

pub use controller::{SessionController, SessionPhase};
