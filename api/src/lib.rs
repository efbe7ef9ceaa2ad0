pub extern crate tensorgate_common as common;

pub mod client;
pub mod config;

pub use self::{client::TensorgateClient, config::ClientConfig};
