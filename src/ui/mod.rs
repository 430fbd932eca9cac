//! egui rendering. Every function here reads or drives [`crate::state::AppState`].

pub mod panels;
pub mod plot;
pub mod table;
