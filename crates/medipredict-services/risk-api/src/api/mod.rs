pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use extract::ValidatedVitals;
pub use routes::{create_router, ApiDoc};
pub use state::AppState;
