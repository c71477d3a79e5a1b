//! Shared test helpers for `certgate-core` integration tests.
//!
//! Spy transports record every request they receive so tests can assert on
//! both the envelope and what (if anything) reached the wire.

#![allow(dead_code)]

pub mod transports;
