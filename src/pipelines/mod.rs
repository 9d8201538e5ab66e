// SPDX-License-Identifier: GPL-3.0-only

//! Processing pipelines for capture and export
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │  CapturedImage   │
//! │ (RGBA/YUYV)  │     │  - → RGB          │     │  (JPEG, in RAM)  │
//! │              │     │  - JPEG encoding  │     │                  │
//! └──────────────┘     └───────────────────┘     └────────┬─────────┘
//!                                                         │
//!                      ┌───────────────────┐              │
//!                      │  Export Pipeline  │ ◀────────────┘
//!                      │  - native share   │
//!                      │  - file download  │
//!                      │  - PDF document   │
//!                      └───────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: Frame capture and JPEG encoding
//! - [`export`]: Channel resolution, fallback and export actions

pub mod export;
pub mod photo;
