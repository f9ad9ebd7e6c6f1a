//! # Duka payment server
//!
//! This crate hosts the HTTP surface of the payment reconciliation subsystem. It is responsible for:
//! * Receiving status-change webhooks from the SwiftPesa gateway (push channel).
//! * Serving client-driven status polls (pull channel).
//! * Accepting payment initiation requests.
//! * Running the background order-sync sweep.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! * `/health`: a health check route that returns a 200 OK response.
//! * `/gateway/webhook` (GET and POST): status-change notifications from the gateway.
//! * `/payments/{id}/status`: the current best-known state of a payment.
//! * `/payments` (POST): initiate a new payment.

pub mod config;
pub mod data_objects;
pub mod errors;
pub mod hooks;
pub mod integrations;
pub mod routes;
pub mod server;
pub mod sync_worker;

#[cfg(test)]
mod endpoint_tests;
