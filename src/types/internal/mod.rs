// Internal types - not exposed over the API
pub mod session;

pub use session::Claims;
