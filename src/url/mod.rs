//! URL helpers for host comparison
//!
//! The crawler only follows links on the seed's hostname and paces requests
//! per host, so both need a consistent notion of "host".

mod domain;

pub use domain::{extract_domain, host_key, is_same_host};
