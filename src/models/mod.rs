pub mod asset;
pub mod page;
pub mod related;
pub mod settings;
