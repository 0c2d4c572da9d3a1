//! Common functionality for urbs2.
//!
//! urbs2 reads the input tables of an intertemporal energy-system model and derives the index
//! sets and parameters over which an optimisation problem is declared.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod balance;
pub mod cli;
pub mod commodity;
pub mod dsm;
pub mod entity;
pub mod error;
pub mod finance;
pub mod global;
pub mod id;
pub mod index;
pub mod input;
pub mod log;
pub mod model;
pub mod output;
pub mod pairing;
pub mod price;
pub mod process;
pub mod settings;
pub mod storage;
pub mod time_frame;
pub mod transmission;

#[cfg(test)]
mod fixture;

/// Get the folder where the program's configuration files are stored
pub fn get_urbs2_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push("urbs2");

    path
}
