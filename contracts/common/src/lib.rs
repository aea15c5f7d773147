//! Shared helpers for the patient records contract suite.
//!
//! This crate provides:
//! - [`ttl`]: the storage time-to-live policy applied to every persistent write.
//! - [`text`]: bounded inspection of `soroban_sdk::String` values (token
//!   normalisation, printable-ASCII checks) without an allocator.
//! - [`digest`]: canonical byte messages and sha256 digests used for
//!   transaction ids and the audit hash chain.

#![no_std]

pub mod digest;
pub mod text;
pub mod ttl;

pub use digest::*;
pub use text::*;
pub use ttl::*;
