/// Diagnostic tool: place pseudo-random word-sized rectangles and report cloud shape
use std::time::Instant;

use tagcloud_rs::geometry::{Point, Size};
use tagcloud_rs::layout::stats::find_overlap;
use tagcloud_rs::layout::{CircularCloudLayouter, CloudLayouter, LayoutStats, SpiralPointsGenerator};

/// Word-like boxes (wide, short), largest first like a sorted cloud.
fn word_like_sizes(count: usize, seed: u64) -> Vec<Size> {
    let mut state = seed;
    let mut next = move |lo: i32, hi: i32| {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        lo + ((state >> 33) % (hi - lo) as u64) as i32
    };
    let mut sizes: Vec<Size> = (0..count)
        .map(|_| {
            let h = next(8, 48);
            Size::new(h * next(2, 7), h)
        })
        .collect();
    sizes.sort_by_key(|s| std::cmp::Reverse(s.area()));
    sizes
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tagcloud_rs=debug".parse()?),
        )
        .init();

    let count: usize = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 300,
    };
    let seed: u64 = match std::env::args().nth(2) {
        Some(arg) => arg.parse()?,
        None => 7,
    };

    println!("=== DIAGNOSTIC: Spiral Layout ===");
    println!("Rectangles: {count} (seed {seed})");

    let center = Point::new(0, 0);
    let sizes = word_like_sizes(count, seed);
    let mut layouter = CircularCloudLayouter::new(SpiralPointsGenerator::new(center));

    let started = Instant::now();
    for (i, size) in sizes.iter().enumerate() {
        let rect = layouter.place_next_rectangle(*size)?;
        if i < 5 {
            println!(
                "    [{}] {}x{} at ({}, {})",
                i, rect.w, rect.h, rect.x, rect.y
            );
        }
    }
    let elapsed = started.elapsed();
    println!(
        "\n[1] Placed {} rectangles in {:.1} ms ({:.1} µs each)",
        count,
        elapsed.as_secs_f64() * 1e3,
        elapsed.as_secs_f64() * 1e6 / count.max(1) as f64
    );

    let stats = LayoutStats::compute(center, layouter.rectangles());
    println!("\n[2] Shape:");
    if let Some(b) = stats.bounds {
        println!("    Bounds:       {}x{} at ({}, {})", b.w, b.h, b.x, b.y);
    }
    println!("    Covered area: {}px²", stats.covered_area);
    println!("    Density:      {:.1}%", stats.density * 100.0);
    println!("    Max radius:   {:.1}px", stats.max_radius);
    println!("    Mean radius:  {:.1}px", stats.mean_radius);
    println!("    Aspect ratio: {:.2}", stats.aspect_ratio);

    // Radius of a disk with the same area as the covered rectangles.
    let disk_radius = (stats.covered_area as f64 / std::f64::consts::PI).sqrt();
    println!(
        "    Max radius / equal-area disk radius: {:.2}",
        stats.max_radius / disk_radius.max(1.0)
    );

    println!("\n[3] Checking for overlaps:");
    match find_overlap(layouter.rectangles()) {
        Some((a, b)) => {
            let rects = layouter.rectangles();
            println!("    OVERLAP between [{a}] {:?} and [{b}] {:?}", rects[a], rects[b]);
            anyhow::bail!("layout produced overlapping rectangles");
        }
        None => println!("    none"),
    }

    Ok(())
}
