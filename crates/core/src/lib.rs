//! Core library for Relayboard
//!
//! This crate contains the board domain: the data model and the
//! authoritative in-memory store the realtime engine synchronizes against.

pub mod board;
