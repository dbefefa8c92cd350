mod retry;
mod singleflight;

pub use retry::RetryOptions;
pub use retry::retry;
pub use singleflight::Singleflight;
