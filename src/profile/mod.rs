//! Profile persistence: the single-row SQLite store and its CSV mirror.

pub mod csv_export;
pub mod store;

pub use csv_export::write_profile_csv;
pub use store::{Biodata, Profile, ProfileStore, STANDARD_FIELDS};
