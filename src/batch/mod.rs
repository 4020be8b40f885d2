pub mod config;
pub mod loader;
pub mod sink;
pub mod stream;
pub mod types;

pub use config::{Config, ConfigBuilder, ConfigBuilderError};
pub use loader::{load, load_with_retry, BatchLoader};
pub use sink::BatchSink;
pub use stream::BatchStream;
pub use types::LoadError;
