pub mod providers;

pub use providers::{ProviderError, TextProvider, Turn};
