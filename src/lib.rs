//! Clubgate - content gateway for a fitness club website
//!
//! This service sits between the site's page layer and a headless WordPress
//! backend: it fetches and caches upstream content, decorates raw records
//! into page-ready entities, and proxies origin media assets through an
//! authenticated endpoint so that pages never reference the origin directly.

pub mod api;
pub mod application;
pub mod config;
pub mod content;
pub mod error;

pub use application::Application;
pub use error::{Error, Result};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_functionality() {
        // Basic smoke test to ensure the library compiles and basic types work
        let result: Result<()> = Ok(());
        assert!(result.is_ok());
    }
}
