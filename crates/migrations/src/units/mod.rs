//! Migration units, grouped by the FreeCAD release that introduced each format change.
//!
//! Adding a unit: drop a file with a `#[migration(...)]` struct into the matching release
//! directory, declare it here, and run `cargo xtask codegen migrations`.

pub mod freecad_1_0;
pub mod freecad_1_1;
