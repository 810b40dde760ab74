//! Shared data types for the BlurGuard redaction pipeline.
//!
//! This crate holds the pure value types exchanged between the detection,
//! redaction and batch layers: pixel rectangles, per-call policies and the
//! `MediaJob` unit of work. It has no OpenCV dependency so the types stay
//! usable from tooling and tests that never touch a frame buffer.

pub mod job;
pub mod policy;
pub mod rect;

pub use job::{blurred_output_path, MediaJob, MediaKind};
pub use policy::{DetectionPolicy, RedactionPolicy};
pub use rect::Rect;
