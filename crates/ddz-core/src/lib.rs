#![deny(warnings)]
pub mod belief;
pub mod error;
pub mod eval;
pub mod game;
pub mod model;
pub mod movegen;
