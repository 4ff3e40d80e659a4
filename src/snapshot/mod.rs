//! Capture of the host state and its publication to the store.
//!
//! A [`HostSnapshot`] lives for exactly one refresh cycle: the [`Producer`] builds it from the
//! host and the [`Publisher`] writes it to two keys, after which it is dropped.
mod error;
mod models;
mod producer;
mod publisher;

pub use error::{Error, Result};
pub use models::{ContainerInfo, HostSnapshot, NetDev, NetworkInfo};
pub use producer::Producer;
pub use publisher::{Publisher, containers_key, networks_key};
