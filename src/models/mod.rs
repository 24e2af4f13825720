pub mod reflection;
pub mod user;
