//! Vision service adapter

pub mod client;

pub use client::HttpVisionClient;
