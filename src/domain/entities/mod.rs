//! Core domain entities.
//!
//! Entities are plain data; persistence rows are mapped into them by the
//! infrastructure layer.
//!
//! # Entity Types
//!
//! - [`Link`] - A shortened URL mapping with version and visit counter
//! - [`User`] - A registered account
//! - [`AuthToken`] - An activation or authentication token
//! - [`Principal`] - The identity a request runs as
//! - [`LinkFilter`] / [`Metadata`] - Listing controls and pagination summary

pub mod filters;
pub mod link;
pub mod principal;
pub mod token;
pub mod user;

pub use filters::{LinkFilter, Metadata, Sort, SortField};
pub use link::{Link, NewLink};
pub use principal::{Permissions, Principal, SHORTENINGS_READ, SHORTENINGS_WRITE};
pub use token::{AuthToken, TokenScope};
pub use user::{Credential, NewUser, User};
