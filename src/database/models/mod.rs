pub mod app;
pub mod useful_link;

pub use app::App;
pub use useful_link::{LinkType, NewUsefulLink, UsefulLink};
