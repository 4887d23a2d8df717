#[macro_use]
extern crate derive_more;

pub mod agent;
pub mod basic;
pub mod error;
pub mod game;
pub mod grid;
pub mod prefs;
pub mod search;
pub mod territory;
