//! Blur every face in an image file using the SeetaFace backend.
//!
//! Usage:
//!   cargo run --example blur_image --features rustface -- \
//!       <model.bin> <input> <output> [blur_strength]
//!
//! Set `RUST_LOG=faceblur=debug` to see per-detection decisions.

use faceblur::{FaceBlurPipeline, RustfaceDetector, DEFAULT_BLUR_STRENGTH};
use std::fmt::Display;
use tracing_subscriber::EnvFilter;

fn fail(message: impl Display) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: blur_image <model.bin> <input> <output> [blur_strength]");
        std::process::exit(2);
    }

    let strength = args
        .get(3)
        .map(|s| {
            s.parse::<u32>()
                .unwrap_or_else(|_| fail(format!("invalid blur_strength: {s}")))
        })
        .unwrap_or(DEFAULT_BLUR_STRENGTH);

    let detector = RustfaceDetector::from_model_path(&args[0]).unwrap_or_else(|e| fail(e));
    let input = image::open(&args[1])
        .unwrap_or_else(|e| fail(format!("failed to open {}: {e}", args[1])))
        .to_rgb8();

    let pipeline = FaceBlurPipeline::new(Box::new(detector)).blur_strength(strength);
    println!(
        "=== {} ({}x{}, kernel {}) ===",
        args[1],
        input.width(),
        input.height(),
        pipeline.kernel_size().get()
    );

    match pipeline.run(&input) {
        Ok(result) => {
            println!("  Blurred {} face(s):", result.face_count);
            for (i, region) in result.regions.iter().enumerate() {
                println!(
                    "    face {i}: ({}, {}, {}x{})",
                    region.x, region.y, region.width, region.height
                );
            }
            if let Err(e) = result.image.save(&args[2]) {
                fail(format!("failed to write {}: {e}", args[2]));
            }
        }
        Err(e) => fail(format!("  blur failed: {e}")),
    }
    println!("  → wrote {}", args[2]);
}
