// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for camera capture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               Capture Session               │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                  │
//! │  ┌──────────────────┐  ┌─────────────────┐  │
//! │  │      Camera      │  │ Virtual Camera  │  │
//! │  │ (V4L2, manager)  │  │ (pattern, file) │  │
//! │  └──────────────────┘  └─────────────────┘  │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: Device trait, stream manager and the V4L2 backend
//! - [`virtual_camera`]: Hardware-free sources for demos and tests

pub mod camera;
pub mod virtual_camera;
