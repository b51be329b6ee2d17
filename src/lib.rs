//! gamegen — agentic arcade game generator.
//!
//! A director drives design, level and asset agents over a Gemini-backed
//! content generator, then packages the result as runnable pygame files
//! plus JSON metadata.

pub mod agent;
pub mod director;
pub mod generator;
pub mod llm;
pub mod model;
pub mod packager;
pub mod sanitize;
