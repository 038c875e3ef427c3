pub mod health;
pub mod predict;
pub mod root;

pub use health::health_check;
pub use predict::predict_risk;
pub use root::service_info;
