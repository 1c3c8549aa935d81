//! # Scanline
//!
//! Byte layouts and allocated buffers for packed raster image data.
//!
//! Raster images at sub-byte depths (1, 2 or 4 bits per pixel) pack several
//! pixels into each byte while depths wider than a byte spread one pixel over
//! several. This crate computes the exact byte length of such scanlines and
//! whole images, rounds scanlines up to even (word) byte counts and widths up
//! to 16 pixel multiples, and allocates maximally aligned buffers for the
//! resulting layouts. It performs no decoding, color handling or pixel
//! processing; it only answers how many bytes an image occupies and hands out
//! memory of that size.
//!
//! ## Usage
//!
//! ```
//! use image_scanline::{Depth, RasterBuf};
//!
//! # fn main() -> Result<(), image_scanline::LayoutError> {
//! // A 100×50 bitonal image packs 8 pixels per byte, 13 bytes per line.
//! let image = RasterBuf::with_dimensions(100, 50, Depth::from_bits(1)?)?;
//!
//! assert_eq!(image.byte_len(), 13 * 50);
//! assert!(image.as_bytes().iter().all(|&b| b == 0));
//! # Ok(()) }
//! ```
// Be std for doctests, avoids a weird warning about missing allocator.
#![cfg_attr(not(doctest), no_std)]
#![forbid(unsafe_code)]
extern crate alloc;

mod buf;
pub mod layout;
mod raster;

pub use self::buf::Buffer;
pub use self::layout::{width_16, Depth, LayoutError, PackedDepth, ScanlineLayout};
pub use self::raster::RasterBuf;
