//! vehiclix-storage
//!
//! Report and fleet persistence. The store traits are implemented by an
//! in-process [`memory::MemoryStore`] and by [`s3::S3Store`], a thin layer
//! over the AWS S3 SDK.

pub mod client;
pub mod error;
pub mod memory;
pub mod objects;
pub mod s3;
pub mod state;
pub mod store;
