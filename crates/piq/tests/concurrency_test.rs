//! Sharing one processor between threads.

use std::sync::Arc;
use std::thread;

use piq::{ErrorKind, ImageFormat, PerformanceConfig, PixelBuffer, Processor};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn test_types_are_send_sync() {
    assert_send_sync::<Processor>();
    assert_send_sync::<piq::Error>();
    assert_send_sync::<PixelBuffer>();
    assert_send_sync::<PerformanceConfig>();
}

#[test]
fn test_concurrent_readers() {
    let p = Processor::new(PixelBuffer::filled(64, 64, [40, 80, 120, 255]));
    p.grayscale();
    let expected = p.to_bytes(ImageFormat::Png).unwrap();

    thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for _ in 0..10 {
                    let image = p.image().unwrap();
                    assert_eq!(image.dimensions(), (64, 64));
                    assert_eq!(p.to_bytes(ImageFormat::Png).unwrap(), expected);
                    assert!(p.last_error().is_none());
                }
            });
        }
    });
}

#[test]
fn test_readers_and_writers_see_consistent_states() {
    let p = Arc::new(Processor::with_performance(
        PixelBuffer::filled(256, 256, [200, 10, 30, 255]),
        PerformanceConfig::default().with_min_parallel_pixels(0),
    ));

    thread::scope(|s| {
        let writer = Arc::clone(&p);
        s.spawn(move || {
            for size in [128, 64, 32, 16] {
                writer.resize(size, size).grayscale_fast();
            }
        });

        for _ in 0..4 {
            let reader = Arc::clone(&p);
            s.spawn(move || {
                for _ in 0..50 {
                    let (image, error) = reader.snapshot();
                    assert!(error.is_none());
                    let (w, h) = image.unwrap().dimensions();
                    assert_eq!(w, h);
                    assert!([256, 128, 64, 32, 16].contains(&w), "unexpected size {w}");
                }
            });
        }
    });

    let image = p.image().unwrap();
    assert_eq!(image.dimensions(), (16, 16));
    let px = image.pixel(8, 8);
    assert!(px[0] == px[1] && px[1] == px[2]);
}

#[test]
fn test_concurrent_writers_serialize() {
    let src = PixelBuffer::filled(40, 40, [12, 200, 99, 180]);
    let p = Processor::new(src.clone());

    // Grayscale is idempotent, so any interleaving ends at the same pixels.
    thread::scope(|s| {
        for i in 0..8 {
            let p = &p;
            s.spawn(move || {
                for _ in 0..10 {
                    if i % 2 == 0 {
                        p.grayscale();
                    } else {
                        p.grayscale_fast();
                    }
                }
            });
        }
    });

    let expected = Processor::new(src);
    expected.grayscale();
    assert_eq!(
        p.image().unwrap().to_packed(),
        expected.image().unwrap().to_packed()
    );
}

#[test]
fn test_first_failure_among_threads_is_latched_once() {
    let p = Processor::new(PixelBuffer::new(1000, 10));

    thread::scope(|s| {
        for _ in 0..10 {
            s.spawn(|| {
                for _ in 0..10 {
                    p.crop(1, 0, i32::MAX, 10);
                }
            });
        }
    });

    assert_eq!(p.last_error().unwrap().kind(), ErrorKind::OutOfBounds);
    assert_eq!(p.snapshot().0.unwrap().dimensions(), (1000, 10));
}

#[test]
fn test_latched_error_shared_across_threads() {
    let p = Processor::new(PixelBuffer::new(10, 10));
    p.resize(0, 0);
    let first = p.last_error().unwrap();

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                p.grayscale().crop(0, 0, 1, 1);
                assert!(Arc::ptr_eq(&first, &p.image().unwrap_err()));
            });
        }
    });
}
