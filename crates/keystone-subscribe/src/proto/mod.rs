//! Protobuf messages and gRPC client for `subscribe.v1`.
//!
//! `subscribe.v1.rs` is generated from `proto/subscribe/v1/subscribe.proto`
//! with `tonic-build` and checked in, so building this crate does not
//! require `protoc`. Regenerate it after editing the `.proto` file.

#![allow(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]

/// `subscribe.v1` package.
pub mod v1 {
    include!("subscribe.v1.rs");
}
