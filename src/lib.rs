//! docreview - document review system.
//!
//! Extracts text from uploaded documents and asks a language model for
//! grammar, formatting and style suggestions, always returning a
//! well-formed result even when extraction or the model fails.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extraction;
pub mod llm;
pub mod models;
pub mod repository;
pub mod services;
pub mod utils;
