//! League domain types and the JSON wire format of the league service.

pub mod domain;
pub mod error;
pub mod protocol;
