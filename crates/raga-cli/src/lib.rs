//! Shared pieces of the `ragaid` and `ragaserve` binaries

pub mod output;
pub mod server;
