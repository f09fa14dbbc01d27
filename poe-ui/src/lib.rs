//! Iced panels for the proof-of-existence client.

pub mod screens;
