//! login-gate - a session-based authentication gateway
//!
//! This crate provides a small web application that registers users, verifies
//! credentials, establishes and tears down authenticated sessions, and keeps
//! anonymous callers away from protected views.

pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod models;
pub mod server;
