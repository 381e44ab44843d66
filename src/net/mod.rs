pub mod payload;

pub use payload::{PayloadError, PlayRequest, MAX_PATH_LEN};
