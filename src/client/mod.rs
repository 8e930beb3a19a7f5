// Client-side session cache and permission-gated UI reconciliation
pub mod reconciler;
pub mod session_context;

pub use reconciler::{FallbackPolicy, GatedElement, UiReconciler};
pub use session_context::SessionContext;
