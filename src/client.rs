//! Envelope-aware request executor.
//!
//! Keep the public surface small and predictable. Implementation details are
//! split into submodules under `src/client/`.

pub mod builder;
pub mod core;
mod execution;
pub mod options;

pub use builder::ApiClientBuilder;
pub use self::core::ApiClient;
pub use options::RequestOptions;
