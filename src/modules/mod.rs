pub mod contacts;
pub mod data_import;
