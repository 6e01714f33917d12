//! Binary wire protocol for Hue Entertainment streaming.
//!
//! This crate implements the HueStream v2 message format used to push
//! real-time color updates to the lighting channels of an entertainment
//! area over a secured datagram transport.

#![warn(clippy::pedantic)]

pub mod codec;
pub mod color;
pub mod update;
