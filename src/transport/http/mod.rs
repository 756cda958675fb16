pub mod router;
pub mod types;
pub mod handlers {
    pub mod authority;
    pub mod health;
    pub mod root;
}

pub use router::{create_router, ApiDoc};
pub use types::AppState;
