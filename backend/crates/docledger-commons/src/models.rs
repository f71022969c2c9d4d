//! Records stored in the world state.

mod document;
mod user;

pub use document::Document;
pub use user::User;
