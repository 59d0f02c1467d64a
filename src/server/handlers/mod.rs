pub mod interactions;
pub mod sessions;
