mod health;
mod link;
mod redirect;

pub use health::health_handler;
pub use link::{delete_link_handler, get_link_handler, save_link_handler};
pub use redirect::redirect_handler;
