//! Small cross-cutting helpers that don't belong to a single component.

pub mod base64;
