//! Application-level configuration.
//!
//! - [`LoaderParams`]: how documents are fetched (retries, languages, timeouts)
//! - [`ChatParams`]: how the chat model is called (persona, sampling)

pub mod chat_params;
pub mod loader_params;

pub use chat_params::ChatParams;
pub use loader_params::LoaderParams;
