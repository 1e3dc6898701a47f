//! Valnet Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Valnet process
//! graph crates. It includes:
//!
//! - **Identifiers**: String-interned node identities ([`identifier::Id`])
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Points, sizes, bounds and the layout axis mask ([`geometry`] module)
//! - **Draw**: Stroke definitions for edges ([`draw`] module)

pub mod color;
pub mod draw;
pub mod geometry;
pub mod identifier;
