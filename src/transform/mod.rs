pub mod transformer;
pub mod types;

pub use transformer::transform;
pub use types::{TargetRecord, ValidationError};
