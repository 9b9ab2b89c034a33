//! Playdex Gateway - Conversational gateway for the Playdex game-discovery app
//!
//! Decides whether a user message may reach the remote assistant, classifies
//! its intent, keeps the per-room server context synchronized, assembles
//! bounded prompts, and normalizes the backend's response payloads.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
