pub mod executor;
pub mod policy;

pub use executor::retry_on_failure;
pub use policy::{RetryPolicy, RetryPolicyBuilder};
