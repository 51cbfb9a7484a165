//! HTTP request / response bodies.

pub mod chat;
