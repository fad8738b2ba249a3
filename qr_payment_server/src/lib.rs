//! # QPG server
//! This module hosts the server code for the QR payment gateway. It is responsible for:
//! Listening for incoming webhook requests from the SePay and Casso payment notification providers.
//! Parsing the request bodies and folding them into the canonical transaction store.
//! Answering confirmation queries from checkout pages that are waiting for a bank transfer to land.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/webhook`: The SePay webhook (POST) and a transaction listing (GET).
//! * `/webhook-casso`: The Casso batch webhook (POST) and the same listing (GET).
//! * `/check-transaction`: Polled by checkout pages to see whether a payment code has been paid.

pub mod casso_routes;
pub mod cli;
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod integrations;
pub mod routes;
pub mod sepay_routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
