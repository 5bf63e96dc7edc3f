//! Client-side data layer for the EV-charging management platform.
//!
//! - [`api`]: typed endpoint definitions and the endpoint registry
//! - [`cache`]: normalized query cache with request de-duplication
//! - [`auth`]: anonymous/authenticated session slice
//! - [`store`]: composition root applying typed intents through reducers
//! - [`client`]: the [`EvChargingApi`] façade tying it all together

pub mod api;
pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod logging;
pub mod mvi;
pub mod store;
pub mod transport;

pub use client::{ClientError, EvChargingApi, QueryHandle, QueryResult};
