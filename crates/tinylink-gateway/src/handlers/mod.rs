mod health;
mod url;
mod web;

pub use health::health_handler;
pub use url::{
    create_url_handler, delete_url_handler, get_url_handler, list_urls_handler, stats_handler,
    update_url_handler,
};
pub use web::{home_handler, redirect_handler, shorten_form_handler};
