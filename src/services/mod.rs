pub mod metadata_table;
pub mod object_metadata;
