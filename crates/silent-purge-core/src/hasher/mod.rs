pub mod path_digest;

pub use path_digest::{identify, identify_str};
