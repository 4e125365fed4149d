//! Menu layout engine: deterministic grid packing, pagination and style binding for
//! restaurant menus, plus the thin HTTP service that exposes it.

pub mod config;
pub mod errors;
pub mod layout;
pub mod menu;
pub mod presets;
pub mod routes;
pub mod state;
