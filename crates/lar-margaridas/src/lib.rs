//! Volunteer intake, course enrollment and catalog listings backing the Lar de Margaridas site.

pub mod config;
pub mod error;
pub mod session;
pub mod store;
pub mod telemetry;
pub mod workflows;

#[cfg(test)]
mod test_support;
