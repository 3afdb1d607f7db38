//! Use-case services.
//!
//! # Responsibility
//! - Orchestrate repository, policy and calendar calls into use-case APIs.
//! - Keep CLI and other front ends decoupled from storage details.

pub mod post_service;
