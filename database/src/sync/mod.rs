pub mod client;
pub mod driver;
pub mod options;
pub mod upsert;
