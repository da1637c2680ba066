//! Domain models

pub mod customer;

pub use customer::Customer;
