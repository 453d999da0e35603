mod auth_extractor;
mod session_layer;
mod tracing_layer;
mod metrics_layer;

pub use auth_extractor::*;
pub use session_layer::*;
pub use tracing_layer::*;
pub use metrics_layer::*;
