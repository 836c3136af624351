//! Asset providers for the plated render pipeline.
//!
//! This crate provides platform-specific implementations of the
//! `ResourceProvider` trait from plated-traits.
//!
//! ## Available Providers
//!
//! - [`FilesystemResourceProvider`]: uploaded images on the local filesystem
//! - [`HttpResourceProvider`]: remote images, bounded by a fetch timeout
//! - [`InMemoryResourceProvider`]: re-exported from plated-traits

mod filesystem;
mod http;

pub use filesystem::FilesystemResourceProvider;
pub use http::{HttpResourceProvider, DEFAULT_FETCH_TIMEOUT};

pub use plated_traits::InMemoryResourceProvider;
