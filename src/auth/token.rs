//! Bearer credential wrappers persisted by the session.

pub mod pair;
pub mod secret;
