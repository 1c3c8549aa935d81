//! Benchmarks size arithmetic and the allocation variants.
use brunch::Bench;

use image_scanline::{Depth, PackedDepth, RasterBuf, ScanlineLayout};

fn main() {
    let mut benches = brunch::Benches::default();

    benches.extend([
        Bench::new("image_scanline::scanline_bytes(4096, 1bpp)")
            .run(|| PackedDepth::B1.scanline_bytes(4096)),
        Bench::new("image_scanline::aligned_width(4095, 4bpp)")
            .run(|| PackedDepth::B4.aligned_width(4095)),
        Bench::new("image_scanline::layout(1920x1080, rgb24)")
            .run(|| ScanlineLayout::new(1920, 1080, Depth::Rgb24)),
        Bench::new("image_scanline::with_dimensions(640x480, 1bpp)").run(|| {
            RasterBuf::with_dimensions(640, 480, Depth::Packed(PackedDepth::B1))
        }),
        Bench::new("image_scanline::with_aligned(633x480, 1bpp)")
            .run(|| RasterBuf::with_aligned(633, 480, PackedDepth::B1, |_| None)),
    ]);

    benches.finish();
}
