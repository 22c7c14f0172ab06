//! Middleware
//!
//! Capas transversales del router. La autorización por claims vive en
//! los controllers; acá solo queda CORS.

pub mod cors;
