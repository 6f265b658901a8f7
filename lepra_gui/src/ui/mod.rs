//! UI module for the Lepra Screen GUI
//!
//! # Panel Structure
//! - `header` - Title, dark-mode toggle and progress bar
//! - `section_panel` - Center: active form section plus Previous / Next / Submit
//! - `results_panel` - Bottom: latest prediction and the Download Report button
//! - `status_bar` - Endpoint and status messages
//!
//! # Overlays
//! - `modal` - Blocking notices over a backdrop
//! - `welcome_overlay` - Startup splash that fades out

// Top-level panels
pub mod header;
pub mod section_panel;
pub mod results_panel;
pub mod status_bar;

// Overlays
pub mod modal;
pub mod welcome_overlay;
