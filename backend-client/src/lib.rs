mod blame;
mod client;
mod error;
mod site;
pub mod types;

pub use blame::BlameRequest;
pub use blame::Hunk;
pub use blame::Person;
pub use blame::Signature;
pub use client::Client;
pub use client::ClientOptions;
pub use client::data_or_errors;
pub use client::operation_name;
pub use error::BackendError;
pub use error::Result;
pub use site::SiteConfiguration;
pub use site::patch_json_config;
pub use types::GraphQlResult;
pub use types::TreeEntry;
