//! Host notification delivery and the backend global-notification feed.

pub mod feed;
pub mod service;
