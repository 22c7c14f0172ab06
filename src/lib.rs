//! Platform Core - backend multi-tenant de acceso y licenciamiento
//!
//! Núcleo de la plataforma: cascada de acceso por jerarquía de empresas,
//! ciclo de vida de licencias y facturación por partner. Expuesto como
//! librería para que los tests de integración armen el router completo.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
