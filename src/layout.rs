//! Scanline layouts for packed pixel depths.
//!
//! The arithmetic in this module is pure. Sizes are computed with checked
//! integer operations and validated layouts carry their total byte length as
//! proof of calculation, so accessors on a constructed [`ScanlineLayout`]
//! never fail.
use core::fmt;

/// A pixel depth that packs into bytes at a fixed density.
///
/// The density is exactly `8/bits` pixels per byte, fractional for the depths
/// wider than one byte. The unpacked RGB case of 24 bits per pixel is not a
/// packing depth, see [`Depth`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PackedDepth {
    /// Bitonal, 8 pixels per byte.
    B1,
    /// 2 bits per pixel.
    B2,
    /// 4 bits per pixel.
    B4,
    /// One byte per pixel.
    B8,
    /// Two bytes per pixel.
    B16,
    /// Four bytes per pixel.
    B32,
    /// Eight bytes per pixel.
    B64,
}

/// Bits per pixel of a raster image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Depth {
    /// One of the power-of-two packing depths.
    Packed(PackedDepth),
    /// Unpacked RGB, three bytes per pixel.
    Rgb24,
}

/// A validated layout of packed scanlines.
///
/// The invariants are that width and height are at least one pixel each and
/// that the full image byte length is representable in memory. All indices
/// derived from the layout are therefore valid for a buffer of
/// [`Self::byte_len`] bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScanlineLayout {
    width: usize,
    height: usize,
    depth: Depth,
    /// The total number of bytes, as proof of calculation basically.
    total: usize,
}

/// Error of rejected dimensions, unsupported depths, or a failed allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutError {
    kind: ErrorKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ErrorKind {
    Dimension { name: &'static str, value: usize },
    Depth { bits: u32 },
    TooLarge,
    Allocation,
}

impl PackedDepth {
    /// All packing depths, in increasing bit order.
    pub const ALL: [Self; 7] = [
        PackedDepth::B1,
        PackedDepth::B2,
        PackedDepth::B4,
        PackedDepth::B8,
        PackedDepth::B16,
        PackedDepth::B32,
        PackedDepth::B64,
    ];

    /// Get the packing depth for a number of bits per pixel.
    ///
    /// Anything but a power of two between 1 and 64 is unsupported and
    /// reported as an error, there is no fallback density.
    pub fn from_bits(bits: u32) -> Result<Self, LayoutError> {
        Ok(match bits {
            1 => PackedDepth::B1,
            2 => PackedDepth::B2,
            4 => PackedDepth::B4,
            8 => PackedDepth::B8,
            16 => PackedDepth::B16,
            32 => PackedDepth::B32,
            64 => PackedDepth::B64,
            _ => return Err(LayoutError::depth(bits)),
        })
    }

    /// The number of bits per pixel.
    pub const fn bits(self) -> u32 {
        match self {
            PackedDepth::B1 => 1,
            PackedDepth::B2 => 2,
            PackedDepth::B4 => 4,
            PackedDepth::B8 => 8,
            PackedDepth::B16 => 16,
            PackedDepth::B32 => 32,
            PackedDepth::B64 => 64,
        }
    }

    /// The number of pixels that fit into one byte.
    ///
    /// Exact for every packing depth, the divisor is a power of two. Sizing
    /// no longer goes through this quotient, see [`Self::scanline_bytes`] for
    /// the equivalent integer form.
    pub const fn pix_per_byte(self) -> f32 {
        8.0 / self.bits() as f32
    }

    /// Byte length of one unaligned scanline of `width` pixels.
    ///
    /// A trailing partially filled byte counts as a whole byte. `None` when
    /// the bit count of the line is not representable.
    pub fn scanline_bytes(self, width: usize) -> Option<usize> {
        let line_bits = width.checked_mul(self.bits() as usize)?;
        Some(line_bits.checked_add(7)? / 8)
    }

    /// The pixel width of a scanline padded to an even number of bytes.
    ///
    /// Returns the smallest width at least `width` whose packed byte length
    /// is even. The final division is exact: an even byte count covers a
    /// whole number of pixels at every packing depth.
    pub fn aligned_width(self, width: usize) -> Option<usize> {
        let mut bytes = self.scanline_bytes(width)?;
        if bytes % 2 != 0 {
            bytes = bytes.checked_add(1)?;
        }
        Some(bytes.checked_mul(8)? / self.bits() as usize)
    }
}

impl Depth {
    /// Get the depth for a number of bits per pixel.
    ///
    /// Supported are the packing depths and the unpacked 24 bit RGB case.
    pub fn from_bits(bits: u32) -> Result<Self, LayoutError> {
        if bits == 24 {
            Ok(Depth::Rgb24)
        } else {
            PackedDepth::from_bits(bits).map(Depth::Packed)
        }
    }

    /// The number of bits per pixel.
    pub const fn bits(self) -> u32 {
        match self {
            Depth::Packed(depth) => depth.bits(),
            Depth::Rgb24 => 24,
        }
    }

    /// Byte length of one unaligned scanline of `width` pixels.
    pub fn scanline_bytes(self, width: usize) -> Option<usize> {
        match self {
            Depth::Packed(depth) => depth.scanline_bytes(width),
            Depth::Rgb24 => width.checked_mul(3),
        }
    }

    /// Byte length of a whole unpadded image.
    pub fn byte_len(self, width: usize, height: usize) -> Option<usize> {
        self.scanline_bytes(width)?.checked_mul(height)
    }
}

/// The smallest multiple of 16 at least as large as `width`.
///
/// `None` when that multiple is not representable. Widths are not otherwise
/// validated here, callers reject zero dimensions before padding.
pub fn width_16(width: usize) -> Option<usize> {
    width.checked_next_multiple_of(16)
}

impl ScanlineLayout {
    /// Validate dimensions and compute the total byte length.
    ///
    /// Errors name the offending dimension when width or height is zero, and
    /// reject layouts whose byte length overflows the possible allocation
    /// size.
    pub fn new(width: usize, height: usize, depth: Depth) -> Result<Self, LayoutError> {
        if width < 1 {
            return Err(LayoutError::dimension("width", width));
        }

        if height < 1 {
            return Err(LayoutError::dimension("height", height));
        }

        let total = depth
            .byte_len(width, height)
            .filter(|&total| total <= isize::MAX as usize)
            .ok_or(LayoutError::TOO_LARGE)?;

        Ok(ScanlineLayout {
            width,
            height,
            depth,
            total,
        })
    }

    /// Validate dimensions and a raw bit count in one step.
    pub fn from_bits(width: usize, height: usize, bits: u32) -> Result<Self, LayoutError> {
        Self::new(width, height, Depth::from_bits(bits)?)
    }

    /// Get the width in pixels.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Get the height in pixels.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Get the depth of each pixel.
    pub const fn depth(&self) -> Depth {
        self.depth
    }

    /// Get the required bytes for this layout.
    pub const fn byte_len(&self) -> usize {
        self.total
    }

    /// Byte length of one unaligned scanline.
    pub fn scanline_bytes(&self) -> usize {
        // Does not overflow, construction validated the full product.
        match self.depth {
            Depth::Packed(depth) => (self.width * depth.bits() as usize + 7) / 8,
            Depth::Rgb24 => self.width * 3,
        }
    }

    /// Pad the width so every scanline occupies an even number of bytes.
    ///
    /// Defined for packing depths only, the 24 bit RGB case has no packing
    /// density and is reported as an unsupported depth.
    pub fn word_aligned(self) -> Result<Self, LayoutError> {
        let Depth::Packed(depth) = self.depth else {
            return Err(LayoutError::depth(self.depth.bits()));
        };

        let width = depth
            .aligned_width(self.width)
            .ok_or(LayoutError::TOO_LARGE)?;

        ScanlineLayout::new(width, self.height, self.depth)
    }
}

impl LayoutError {
    pub(crate) const TOO_LARGE: Self = LayoutError {
        kind: ErrorKind::TooLarge,
    };

    pub(crate) const ALLOCATION: Self = LayoutError {
        kind: ErrorKind::Allocation,
    };

    pub(crate) fn dimension(name: &'static str, value: usize) -> Self {
        LayoutError {
            kind: ErrorKind::Dimension { name, value },
        }
    }

    pub(crate) fn depth(bits: u32) -> Self {
        LayoutError {
            kind: ErrorKind::Depth { bits },
        }
    }

    /// Was a zero width or height rejected?
    pub fn is_invalid_dimension(&self) -> bool {
        matches!(self.kind, ErrorKind::Dimension { .. })
    }

    /// Was an unsupported bit count rejected?
    pub fn is_unsupported_depth(&self) -> bool {
        matches!(self.kind, ErrorKind::Depth { .. })
    }

    /// Did the byte length overflow the possible allocation size?
    pub fn is_too_large(&self) -> bool {
        matches!(self.kind, ErrorKind::TooLarge)
    }

    /// Did the underlying memory request fail?
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self.kind, ErrorKind::Allocation)
    }
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ErrorKind::Dimension { name, value } => {
                write!(f, "invalid dimension: {} = {}", name, value)
            }
            ErrorKind::Depth { bits } => {
                write!(f, "unsupported depth: {} bits per pixel", bits)
            }
            ErrorKind::TooLarge => f.write_str("layout exceeds the possible allocation size"),
            ErrorKind::Allocation => f.write_str("buffer allocation failed"),
        }
    }
}

impl core::error::Error for LayoutError {}

#[test]
fn density_is_exact() {
    for depth in PackedDepth::ALL {
        assert_eq!(depth.pix_per_byte(), 8.0 / depth.bits() as f32);
    }

    assert_eq!(PackedDepth::B1.pix_per_byte(), 8.0);
    assert_eq!(PackedDepth::B64.pix_per_byte(), 0.125);
}

#[test]
fn unsupported_depths() {
    for bits in [0, 3, 5, 7, 12, 24, 48, 128] {
        let err = PackedDepth::from_bits(bits).unwrap_err();
        assert!(err.is_unsupported_depth());
    }

    assert_eq!(Depth::from_bits(24), Ok(Depth::Rgb24));
    assert!(Depth::from_bits(3).unwrap_err().is_unsupported_depth());
}

#[test]
fn scanline_rounds_up() {
    // 10 bitonal pixels straddle into a second byte.
    assert_eq!(PackedDepth::B1.scanline_bytes(10), Some(2));
    assert_eq!(PackedDepth::B1.scanline_bytes(8), Some(1));
    assert_eq!(PackedDepth::B4.scanline_bytes(3), Some(2));
    assert_eq!(PackedDepth::B16.scanline_bytes(3), Some(6));
    assert_eq!(PackedDepth::B64.scanline_bytes(1), Some(8));
    assert_eq!(PackedDepth::B1.scanline_bytes(usize::MAX), None);
}

#[test]
fn byte_len_contract() {
    assert_eq!(Depth::Rgb24.byte_len(5, 7), Some(5 * 7 * 3));
    assert_eq!(Depth::Packed(PackedDepth::B8).byte_len(5, 7), Some(35));
    assert_eq!(Depth::Packed(PackedDepth::B1).byte_len(10, 2), Some(4));
}

#[test]
fn aligned_width_is_even_and_monotone() {
    for depth in PackedDepth::ALL {
        for width in 1..512usize {
            let aligned = depth.aligned_width(width).expect("small widths fit");
            assert!(aligned >= width, "{:?} shrank {}", depth, width);

            let bytes = depth.scanline_bytes(aligned).expect("aligned width fits");
            assert_eq!(bytes % 2, 0, "{:?} at {} gave odd {}", depth, width, bytes);
        }
    }

    // A lone bitonal pixel still pads to a full 16 pixel word.
    assert_eq!(PackedDepth::B1.aligned_width(1), Some(16));
    assert_eq!(PackedDepth::B8.aligned_width(3), Some(4));
    assert_eq!(PackedDepth::B16.aligned_width(3), Some(3));
}

#[test]
fn width_16_rounding() {
    assert_eq!(width_16(1), Some(16));
    assert_eq!(width_16(16), Some(16));
    assert_eq!(width_16(17), Some(32));
    assert_eq!(width_16(usize::MAX - 3), None);
}

#[test]
fn layout_validation() {
    let depth = Depth::Packed(PackedDepth::B1);

    assert!(ScanlineLayout::new(0, 1, depth)
        .unwrap_err()
        .is_invalid_dimension());
    assert!(ScanlineLayout::new(1, 0, depth)
        .unwrap_err()
        .is_invalid_dimension());
    assert!(ScanlineLayout::from_bits(1, 1, 0)
        .unwrap_err()
        .is_unsupported_depth());
    assert!(ScanlineLayout::new(usize::MAX, 2, Depth::Rgb24)
        .unwrap_err()
        .is_too_large());

    let layout = ScanlineLayout::new(10, 2, depth).expect("valid layout");
    assert_eq!(layout.scanline_bytes(), 2);
    assert_eq!(layout.byte_len(), 4);
}

#[test]
fn word_aligned_layout() {
    let layout = ScanlineLayout::from_bits(17, 10, 1).expect("valid layout");
    let aligned = layout.word_aligned().expect("packing depth");

    assert_eq!(aligned.width(), 32);
    assert_eq!(aligned.byte_len(), 40);

    let rgb = ScanlineLayout::new(17, 10, Depth::Rgb24).expect("valid layout");
    assert!(rgb.word_aligned().unwrap_err().is_unsupported_depth());
}

#[test]
fn error_display() {
    use alloc::string::ToString;

    let err = ScanlineLayout::from_bits(0, 4, 8).unwrap_err();
    assert_eq!(err.to_string(), "invalid dimension: width = 0");

    let err = Depth::from_bits(3).unwrap_err();
    assert_eq!(err.to_string(), "unsupported depth: 3 bits per pixel");
}
