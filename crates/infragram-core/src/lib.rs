//! Infragram Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Infragram
//! engine and its export backends:
//!
//! - **Geometry**: points, sizes and bounds in canvas units, y down ([`geometry`])
//! - **Colors**: CSS color handling with alpha ([`color::Color`])
//! - **Draw**: stroke and text styles, draw commands and surfaces ([`draw`])

pub mod color;
pub mod draw;
pub mod geometry;
