use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use idv_document::DocumentStructureValidator;
use idv_imaging::RgbBuffer;
use idv_nullables::fixtures;
use idv_types::{Image, PixelFormat};

fn scaled(image: &Image, width: u32, height: u32) -> Image {
    let rgb = RgbBuffer::from_image(image).resize(width as usize, height as usize);
    Image::new(width, height, PixelFormat::Rgb8, rgb.as_slice().to_vec()).unwrap()
}

fn bench_assess(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_assess");
    let validator = DocumentStructureValidator::new(0.60);
    let card = fixtures::id_card();

    for width in [400u32, 800, 1600, 3200] {
        let image = scaled(&card, width, width * 13 / 20);
        group.bench_with_input(BenchmarkId::new("assess", width), &width, |b, _| {
            b.iter(|| black_box(validator.assess(black_box(&image))));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_assess);
criterion_main!(benches);
