// Visitor sessions: login state and flash messages

pub mod session;

pub use session::*;
