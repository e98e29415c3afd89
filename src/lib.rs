//! Call Intake - phone-call intake dialog driven by telephony webhooks
//!
//! A caller is asked four questions (first name, last name, age, residency)
//! across independent webhook callbacks. Answers are persisted per call, then
//! handed to a generative-text assistant whose reply is spoken back. Call
//! recordings are logged and later transcribed by a batch sweep.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
