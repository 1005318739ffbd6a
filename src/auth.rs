//! Session lifecycle, single-flight token refresh, and token models.

pub mod refresh;
pub mod session;
pub mod token;

pub use refresh::*;
pub use session::*;
pub use token::{pair::*, secret::*};
