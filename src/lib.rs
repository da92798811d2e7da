//! Volna Landing Library
//!
//! This library provides the client-side behaviour of the landing page:
//! overlay and header interactivity, reveal animations, the timed callback
//! popup, and the lead-capture pipeline that posts leads to the intake
//! endpoint.
//!
//! # Modules
//!
//! - `config`: Configuration management.
//! - `errors`: Error handling types.
//! - `lead_client`: Intake endpoint client and the `LeadSink` seam.
//! - `models`: Site configuration, lead payload and wire record.
//! - `normalize`: Field clamping, UTM resolution and quiz flattening.
//! - `page`: Location of the page a lead is captured on.
//! - `session`: Session-scoped flags.
//! - `site_config`: Page-lifetime cache of `site.config.json`.
//! - `ui`: Page controller, DOM surface and event loop.

pub mod config;
pub mod errors;
pub mod lead_client;
pub mod models;
pub mod normalize;
pub mod page;
pub mod session;
pub mod site_config;
pub mod ui;
