//! Shared input models for `portaudit`: scan targets, port sets, address
//! ranges and the rendering configuration.

pub mod config;
pub mod network;
pub mod ports;
