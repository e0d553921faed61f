//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce cross-record rules (slot uniqueness, parent existence).
//! - Keep the CLI decoupled from storage details.

pub mod lesson_item_service;
pub mod lesson_service;
pub mod settings_service;
pub mod subject_service;
