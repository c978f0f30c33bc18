//! Storage domain - persistence provider abstraction

mod repository;

pub use repository::{Persistence, UnitOfWork};

#[cfg(test)]
pub use repository::mock;
