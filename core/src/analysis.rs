//! Static knowledge applied to open ports: service names, protocol-level
//! findings and the host risk score.

pub mod risk;
pub mod services;
pub mod vulns;
