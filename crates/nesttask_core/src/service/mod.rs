//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine, stores and reconciler into user-facing actions.
//! - Keep CLI/UI layers decoupled from storage details.

pub mod demo;
pub mod reconcile;
pub mod task_service;
