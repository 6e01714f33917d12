//! Client library for Hue Entertainment streaming.
//!
//! A streaming session couples two network boundaries: the CLIP v2
//! control plane, which must be told over HTTPS when streaming starts
//! and stops, and a secured datagram transport carrying the actual
//! color updates to the bridge. This crate owns the session lifecycle
//! between them:
//!
//! - [`session::StreamClient`] starts a session (control-plane start
//!   action, then transport handshake) and hands back a [`session::Session`]
//! - every accepted update is written by a single background worker, in
//!   acceptance order, off the caller's critical path
//! - [`session::Session::close`] tears down exactly once no matter how
//!   many callers race it
//!
//! The transport itself (DTLS handshake, encryption) is injected through
//! the [`transport`] seam, so the session logic runs identically against
//! a bridge or an in-memory fake. Delivery is not guaranteed: the stream
//! is lossy by design and nothing here retries.
//!
//! # Modules
//!
//! - [`config`] - Bridge host and credential configuration
//! - [`control`] - CLIP v2 control-plane boundary
//! - [`errors`] - Error types
//! - [`session`] - Session lifecycle and send pipeline
//! - [`transport`] - Secured datagram transport seam

#![warn(clippy::pedantic)]

pub mod config;
pub mod control;
pub mod errors;
pub mod session;
pub mod transport;
