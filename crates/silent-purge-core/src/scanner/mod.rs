pub mod batch;
pub mod walk;

pub use batch::{Batch, Batches, BATCH_SIZE};
pub use walk::{has_media_extension, MediaFiles};
