//! Owned raster buffers and the allocation variants over them.
use core::mem;

use bytemuck::Pod;

use crate::buf::Buffer;
use crate::layout::{width_16, Depth, LayoutError, PackedDepth, ScanlineLayout};

/// An owned raster image buffer together with its scanline layout.
///
/// Every constructor allocates exactly one buffer sized by the layout and
/// hands ownership to the caller; dropping the value frees the memory. The
/// buffer is maximally aligned so its bytes may be viewed as wider texels,
/// see [`Self::as_texels`].
#[derive(Clone, Debug)]
pub struct RasterBuf {
    buffer: Buffer,
    layout: ScanlineLayout,
}

impl RasterBuf {
    /// Allocate a zero-filled buffer for an already validated layout.
    ///
    /// Panics when the allocator refuses the request, use [`Self::try_new`]
    /// to observe the failure instead.
    pub fn new(layout: ScanlineLayout) -> Self {
        RasterBuf {
            buffer: Buffer::new(layout.byte_len()),
            layout,
        }
    }

    /// Allocate a zero-filled buffer for a layout, reporting failure.
    pub fn try_new(layout: ScanlineLayout) -> Result<Self, LayoutError> {
        Ok(RasterBuf {
            buffer: Buffer::try_new(layout.byte_len())?,
            layout,
        })
    }

    /// Validate dimensions and allocate a zero-filled image buffer.
    ///
    /// Use this when the caller reads before fully writing or relies on the
    /// background being zero.
    pub fn with_dimensions(
        width: usize,
        height: usize,
        depth: Depth,
    ) -> Result<Self, LayoutError> {
        Self::try_new(ScanlineLayout::new(width, height, depth)?)
    }

    /// Validate dimensions and allocate a buffer with unspecified contents.
    ///
    /// Identical sizing to [`Self::with_dimensions`] for callers that
    /// guarantee to overwrite every byte, see [`Buffer::try_new_unzeroed`]
    /// for the exact contract.
    pub fn with_dimensions_unzeroed(
        width: usize,
        height: usize,
        depth: Depth,
    ) -> Result<Self, LayoutError> {
        let layout = ScanlineLayout::new(width, height, depth)?;

        Ok(RasterBuf {
            buffer: Buffer::try_new_unzeroed(layout.byte_len())?,
            layout,
        })
    }

    /// Allocate a zero-filled buffer of one byte per pixel.
    pub fn with_u8(width: usize, height: usize) -> Result<Self, LayoutError> {
        Self::with_dimensions(width, height, Depth::Packed(PackedDepth::B8))
    }

    /// Allocate a zero-filled buffer of one 16 bit element per pixel.
    pub fn with_u16(width: usize, height: usize) -> Result<Self, LayoutError> {
        Self::with_dimensions(width, height, Depth::Packed(PackedDepth::B16))
    }

    /// Allocate a flat, zero-filled buffer of `width * height` 32 bit
    /// elements.
    ///
    /// The size is computed directly as an element count instead of through
    /// the scanline arithmetic. At this depth one pixel occupies exactly one
    /// element so the two computations agree.
    pub fn with_u32_elements(width: usize, height: usize) -> Result<Self, LayoutError> {
        let layout = ScanlineLayout::new(width, height, Depth::Packed(PackedDepth::B32))?;

        // Validated above, the element count fits alongside the byte length.
        let elements = width * height;
        debug_assert_eq!(elements * mem::size_of::<u32>(), layout.byte_len());

        Ok(RasterBuf {
            buffer: Buffer::try_new(elements * mem::size_of::<u32>())?,
            layout,
        })
    }

    /// Allocate a zero-filled buffer padded to a 16 pixel width multiple and
    /// offer it for re-packing to true word alignment.
    ///
    /// The padded buffer is handed to `repack` by reference. When the
    /// collaborator produces a re-packed replacement, possibly smaller and of
    /// a different final width, the replacement becomes the result and the
    /// padded original is released here. When it declines, the common case
    /// where no re-packing is needed, the padded buffer itself is returned.
    /// The final pixel width and byte length are those of the returned
    /// buffer's [`Self::layout`].
    pub fn with_aligned<F>(
        width: usize,
        height: usize,
        depth: PackedDepth,
        repack: F,
    ) -> Result<Self, LayoutError>
    where
        F: FnOnce(&RasterBuf) -> Option<RasterBuf>,
    {
        if width < 1 {
            return Err(LayoutError::dimension("width", width));
        }

        if height < 1 {
            return Err(LayoutError::dimension("height", height));
        }

        let width16 = width_16(width).ok_or(LayoutError::TOO_LARGE)?;
        let padded = Self::with_dimensions(width16, height, Depth::Packed(depth))?;

        // On replacement the padded original goes out of scope right here.
        Ok(match repack(&padded) {
            Some(repacked) => repacked,
            None => padded,
        })
    }

    /// Get the layout describing this buffer.
    pub const fn layout(&self) -> ScanlineLayout {
        self.layout
    }

    /// Get the width in pixels, after any padding.
    pub const fn width(&self) -> usize {
        self.layout.width()
    }

    /// Get the height in pixels.
    pub const fn height(&self) -> usize {
        self.layout.height()
    }

    /// Get the depth of each pixel.
    pub const fn depth(&self) -> Depth {
        self.layout.depth()
    }

    /// Get the image byte length described by the layout.
    pub const fn byte_len(&self) -> usize {
        self.layout.byte_len()
    }

    /// View the image as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_bytes()[..self.layout.byte_len()]
    }

    /// View the image as mutable bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        let len = self.layout.byte_len();
        &mut self.buffer.as_bytes_mut()[..len]
    }

    /// View the image as a slice of texels.
    ///
    /// Panics when the image byte length is not a multiple of the texel
    /// size. It always is when the texel matches the layout's depth.
    pub fn as_texels<T: Pod>(&self) -> &[T] {
        bytemuck::cast_slice(self.as_bytes())
    }

    /// View the image as a mutable slice of texels.
    ///
    /// Panics when the image byte length is not a multiple of the texel
    /// size.
    pub fn as_texels_mut<T: Pod>(&mut self) -> &mut [T] {
        bytemuck::cast_slice_mut(self.as_bytes_mut())
    }

    /// Discard the layout, keeping the raw allocation.
    pub fn into_buffer(self) -> Buffer {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_dimensions() {
        let depth = Depth::Packed(PackedDepth::B8);

        assert!(RasterBuf::with_dimensions(0, 4, depth)
            .unwrap_err()
            .is_invalid_dimension());
        assert!(RasterBuf::with_dimensions(4, 0, depth)
            .unwrap_err()
            .is_invalid_dimension());
        assert!(RasterBuf::with_dimensions_unzeroed(0, 4, depth)
            .unwrap_err()
            .is_invalid_dimension());
        assert!(RasterBuf::with_u8(4, 0).unwrap_err().is_invalid_dimension());
        assert!(RasterBuf::with_u16(0, 4).unwrap_err().is_invalid_dimension());
        assert!(RasterBuf::with_u32_elements(4, 0)
            .unwrap_err()
            .is_invalid_dimension());
        assert!(
            RasterBuf::with_aligned(0, 4, PackedDepth::B1, |_| None)
                .unwrap_err()
                .is_invalid_dimension()
        );
    }

    #[test]
    fn bitonal_allocation() {
        let image = RasterBuf::with_dimensions(100, 50, Depth::Packed(PackedDepth::B1))
            .expect("valid dimensions");

        assert_eq!(image.byte_len(), 13 * 50);
        assert_eq!(image.as_bytes().len(), 650);
        assert!(image.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn unzeroed_matches_sizing() {
        let zeroed = RasterBuf::with_dimensions(33, 3, Depth::Rgb24).expect("valid");
        let unzeroed = RasterBuf::with_dimensions_unzeroed(33, 3, Depth::Rgb24).expect("valid");

        assert_eq!(zeroed.byte_len(), 33 * 3 * 3);
        assert_eq!(unzeroed.byte_len(), zeroed.byte_len());
    }

    #[test]
    fn typed_views() {
        let mut shorts = RasterBuf::with_u16(5, 3).expect("valid");
        assert_eq!(shorts.byte_len(), 5 * 3 * 2);
        assert_eq!(shorts.as_texels::<u16>(), &[0u16; 15][..]);

        shorts.as_texels_mut::<u16>()[14] = 0xabcd;
        assert_eq!(shorts.as_texels::<u16>()[14], 0xabcd);

        let ints = RasterBuf::with_u32_elements(5, 3).expect("valid");
        assert_eq!(ints.byte_len(), 5 * 3 * 4);
        assert_eq!(ints.as_texels::<u32>(), &[0u32; 15][..]);
    }

    #[test]
    fn aligned_keeps_padded_buffer_when_declined() {
        let image = RasterBuf::with_aligned(17, 10, PackedDepth::B1, |_| None)
            .expect("valid dimensions");

        assert_eq!(image.width(), 32);
        assert_eq!(image.byte_len(), 40);
        assert!(image.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn aligned_adopts_repacked_buffer() {
        let image = RasterBuf::with_aligned(17, 10, PackedDepth::B1, |padded| {
            assert_eq!(padded.width(), 32);
            assert_eq!(padded.byte_len(), 40);

            // Re-pack to the narrower word aligned width.
            let narrow = ScanlineLayout::from_bits(24, 10, 1).expect("valid layout");
            Some(RasterBuf::new(narrow))
        })
        .expect("valid dimensions");

        assert_eq!(image.width(), 24);
        assert_eq!(image.byte_len(), 30);
    }

    #[test]
    fn buffers_move_between_threads() {
        fn assert_send<T: Send>() {}
        assert_send::<RasterBuf>();
        assert_send::<Buffer>();
    }
}
