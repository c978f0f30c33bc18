//! Message infrastructure module

mod service;

pub use service::FeedService;
