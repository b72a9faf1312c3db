//! # Kinder Core
//!
//! Domain types and the weekly-calendar scheduling engine.
//!
//! A class's timetable is a grid of time slots × activities × teachers. The
//! engine takes one "template week" of that grid and copies it forward over
//! a date range:
//!
//! - [`pattern`] turns the template week into a per-weekday, per-slot pattern
//! - [`expand`] enumerates the target dates for a range and weekday selection
//! - [`reconcile`] crosses both into bulk directives and submits them
//! - [`editor`] handles single ad hoc entries
//!
//! Persistence is reached only through the traits in [`store`].

pub mod catalog;
pub mod conflict;
pub mod editor;
pub mod errors;
pub mod expand;
pub mod models;
pub mod pattern;
pub mod reconcile;
pub mod store;
