//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.
//! Handlers that need a permission receive the request's
//! [`Principal`](crate::domain::entities::Principal) as an argument and check
//! it through [`AuthService::authorize`](crate::application::services::AuthService::authorize)
//! before doing anything else.

pub mod fallback;
pub mod health;
pub mod redirect;
pub mod shortenings;
pub mod tokens;
pub mod users;

pub use fallback::{method_not_allowed_handler, not_found_handler};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use shortenings::{
    create_shortening_handler, delete_shortening_handler, list_my_shortenings_handler,
    list_shortenings_handler, show_shortening_handler, update_shortening_handler,
};
pub use tokens::create_authentication_token_handler;
pub use users::{activate_user_handler, register_user_handler};
