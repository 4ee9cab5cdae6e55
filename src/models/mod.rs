//! Data models for the recorder.
//!
//! `event` is what arrives from S3, `record` is what lands in the metadata
//! table, and `response` is what the invocation returns.

pub mod event;
pub mod record;
pub mod response;
