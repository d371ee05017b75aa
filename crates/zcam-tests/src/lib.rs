//! Integration tests for the ZCAM gamut crates.
//!
//! End-to-end checks against the real model: color attributes, the fitted
//! sRGB boundary, and the queries built on it.
