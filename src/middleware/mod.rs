mod request_log;
mod token_gate;

pub use request_log::request_log;
pub use token_gate::{Authenticated, TokenGateLayer};
