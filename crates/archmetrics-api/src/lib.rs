pub mod docs;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use docs::ApiDoc;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
