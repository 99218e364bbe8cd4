use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use quadwarp_geometry::{Homography, Point2d};
use quadwarp_image::{Image, RgbImage};
use quadwarp_imgproc::{
    interpolation::InterpolationMode,
    warp::{warp_full, warp_perspective, warp_to_template},
    WarpConfig,
};

fn bench_warp_perspective(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpPerspective");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        group.throughput(criterion::Throughput::Elements((*width * *height) as u64));

        let parameter_string = format!("{}x{}", width, height);

        // input image
        let image_size = [*width, *height].into();
        let image = Image::<u8, 3>::new(image_size, vec![0u8; width * height * 3]).unwrap();

        // output image
        let output = Image::<u8, 3>::from_size_val(image_size, 0).unwrap();
        let m = Homography::from_rows([
            [0.9, 0.05, 10.0],
            [-0.02, 1.1, -5.0],
            [1e-4, 2e-4, 1.0],
        ]);

        for (name, interpolation) in [
            ("bilinear", InterpolationMode::Bilinear),
            ("nearest", InterpolationMode::Nearest),
        ] {
            group.bench_with_input(
                BenchmarkId::new(name, &parameter_string),
                &(&image, &output, m),
                |b, i| {
                    let (src, mut dst, m) = (i.0.clone(), i.1.clone(), i.2);
                    b.iter(|| {
                        warp_perspective(
                            black_box(&src),
                            black_box(&mut dst),
                            black_box(&m),
                            black_box(interpolation),
                            black_box([255, 255, 255]),
                        )
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_warp_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("WarpModes");

    for (width, height) in [(512, 448), (1024, 896)].iter() {
        let parameter_string = format!("{}x{}", width, height);

        let image = RgbImage::from_size_val([*width, *height].into(), 0).unwrap();
        let (w, h) = (*width as f64, *height as f64);
        let source = [
            Point2d::new(0.1 * w, 0.05 * h),
            Point2d::new(0.95 * w, 0.1 * h),
            Point2d::new(0.9 * w, 0.9 * h),
            Point2d::new(0.05 * w, 0.95 * h),
        ];
        let destination = [
            Point2d::new(0.0, 0.0),
            Point2d::new(w, 0.0),
            Point2d::new(w, h),
            Point2d::new(0.0, h),
        ];
        let config = WarpConfig::default();

        group.bench_with_input(
            BenchmarkId::new("template", &parameter_string),
            &image,
            |b, image| {
                b.iter(|| {
                    warp_to_template(
                        black_box(image),
                        black_box(&source),
                        black_box(image.size()),
                        black_box(&config),
                    )
                })
            },
        );

        group.bench_with_input(
            BenchmarkId::new("full", &parameter_string),
            &image,
            |b, image| {
                b.iter(|| {
                    warp_full(
                        black_box(image),
                        black_box(&source),
                        black_box(&destination),
                        black_box(&config),
                    )
                })
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_warp_perspective, bench_warp_modes);
criterion_main!(benches);
