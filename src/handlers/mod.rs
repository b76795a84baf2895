// handlers/mod.rs - HTTP handlers
//
// system:    / and /health, no authentication
// app_info:  /paas/api/app_info/ and /paas/api/v2/app_info/, gateway authenticated
// light_app: /paas/api/v2/light_app/*, gateway authenticated

pub mod app_info;
pub mod light_app;
pub mod system;

pub use app_info::{app_info, app_info_v2};
pub use light_app::method_not_allowed;
pub use system::{health, root};
