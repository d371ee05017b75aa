//! # zcam-cache
//!
//! Bounded, high-density hash table of `u32 -> f64`.
//!
//! The gamut engine memoizes the maximal chroma for every quantized
//! (hue, lightness) pair it has solved. A general-purpose map would grow
//! without limit; [`Float64Table`] keeps a fixed memory ceiling and drops
//! about half of its entries whenever it hits it.
//!
//! # Usage
//!
//! ```rust
//! use zcam_cache::{Float64Table, HashSeed};
//!
//! let mut cache = Float64Table::with_seed(128, 1 << 16, HashSeed::fixed(1));
//! cache.set(0x1234_0042, 23.5);
//! assert_eq!(cache.get(0x1234_0042), Some(23.5));
//! assert_eq!(cache.get(7), None);
//! ```
//!
//! # Dependencies
//!
//! - [`rand`] - process-wide hash seed
//! - [`tracing`] - resize and purge events
//!
//! # Used By
//!
//! - `zcam-gamut` - maximal-chroma memo

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod seed;
mod table;

pub use seed::HashSeed;
pub use table::{
    BYTES_PER_SLOT, DEFAULT_MAX_SIZE, DEFAULT_SIZE, Float64Table, Iter, MIN_MAX_SIZE,
};
