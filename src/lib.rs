//! Parapet is client-side plumbing for terminal apps that talk to an AI chat
//! proxy: an HTTP chat client with retry and streaming, and a fault boundary
//! that keeps a broken view from taking the whole interface down.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`api`] defines chat payloads and implements [`api::ChatClient`], the
//!   retrying, cancellable client for the proxy's chat endpoint.
//! - [`auth`] holds the session and key-store seams the client calls through,
//!   so hosts decide where tokens and provider keys come from.
//! - [`boundary`] provides [`boundary::FaultBoundary`] and the [`boundary::Guarded`]
//!   wrapper that isolate rendering faults to one subtree.
//! - [`core`] owns configuration loading and the builtin provider catalog.
//! - [`utils`] carries URL, header, and logging helpers shared by the rest.
//!
//! Hosts construct a [`core::config::ProxyConfig`] at startup, build a
//! [`api::ChatClient`] from it, and wrap fallible views in a
//! [`boundary::FaultBoundary`] before entering their draw loop.

pub mod api;
pub mod auth;
pub mod boundary;
pub mod core;
pub mod utils;
