pub mod digest;
pub mod rank;
pub mod sanitize;

pub use digest::{analyze, build_outcome};
pub use rank::rank_digest;
pub use sanitize::{extract_reply_text, parse_reply, sanitize_reply};
