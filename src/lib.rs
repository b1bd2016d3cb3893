//! Core library exports for the receipts service.
//!
//! With only the `data` feature the crate provides the receipt domain, the
//! Diesel and in-memory repositories, the receipt store, the list view-model,
//! the capture flow and the price-history lookup. The `server` feature adds
//! configuration, recognition clients, forms, services and Actix routes.

pub mod capture;
pub mod db;
pub mod domain;
pub mod history;
pub mod listing;
pub mod models;
pub mod repository;
pub mod schema;
pub mod store;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod error_conversions;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod recognition;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
