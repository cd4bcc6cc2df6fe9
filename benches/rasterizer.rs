use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fixrast::bench::{
    EdgeFunctionRasterizer, FrameBuffer, Rasterizer, SampleCount, ScreenTriangle, ScreenVertex,
};
use fixrast::math::fixed::Fixed;
use fixrast::prelude::*;

const BUFFER_WIDTH: u32 = 800;
const BUFFER_HEIGHT: u32 = 600;
const COLOR: u32 = 0xFFFF0000;

fn vertex(x: f32, y: f32) -> ScreenVertex {
    ScreenVertex::new(Fixed::from_f32(x), Fixed::from_f32(y), Fixed::HALF)
}

fn triangle(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> ScreenTriangle {
    [vertex(a.0, a.1), vertex(b.0, b.1), vertex(c.0, c.1)]
}

fn small_triangle() -> ScreenTriangle {
    triangle((100.0, 100.0), (120.0, 100.0), (110.0, 120.0))
}

fn medium_triangle() -> ScreenTriangle {
    triangle((100.0, 100.0), (300.0, 100.0), (200.0, 300.0))
}

fn large_triangle() -> ScreenTriangle {
    triangle((50.0, 50.0), (750.0, 50.0), (400.0, 550.0))
}

fn thin_triangle() -> ScreenTriangle {
    triangle((100.0, 100.0), (700.0, 110.0), (100.0, 105.0))
}

fn benchmark_single_triangle(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_triangle");
    let rasterizer = EdgeFunctionRasterizer::with_backface_culling(false);

    let triangles = [
        ("small", small_triangle()),
        ("medium", medium_triangle()),
        ("large", large_triangle()),
        ("thin", thin_triangle()),
    ];

    for samples in [SampleCount::One, SampleCount::Four] {
        for (name, tri) in &triangles {
            let id = format!("{}_{}x", name, samples.count());
            group.bench_with_input(BenchmarkId::new("edge_function", id), tri, |b, tri| {
                let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT, samples);
                b.iter(|| {
                    fb.clear(0);
                    rasterizer.fill_triangle(black_box(tri), &mut fb, COLOR)
                });
            });
        }
    }

    group.finish();
}

fn benchmark_many_triangles(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_triangles");
    let rasterizer = EdgeFunctionRasterizer::with_backface_culling(false);

    // 20x20 grid of small triangles
    let triangles: Vec<ScreenTriangle> = (0..20)
        .flat_map(|row| {
            (0..20).map(move |col| {
                let x = col as f32 * 40.0;
                let y = row as f32 * 30.0;
                triangle((x, y), (x + 35.0, y), (x + 17.5, y + 25.0))
            })
        })
        .collect();

    group.bench_function("edge_function_400_triangles", |b| {
        let mut fb = FrameBuffer::new(BUFFER_WIDTH, BUFFER_HEIGHT, SampleCount::One);
        b.iter(|| {
            fb.clear(0);
            for tri in &triangles {
                rasterizer.fill_triangle(black_box(tri), &mut fb, COLOR);
            }
        });
    });

    group.finish();
}

fn benchmark_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    let mut scene = Scene::new();
    let cubes = scene
        .add_meshes(vec![unit_cube()])
        .expect("cube fits an empty scene");
    scene.add_instance(cubes.first).expect("instance fits");
    let camera = Camera::default();

    for samples in [SampleCount::One, SampleCount::Four] {
        let id = format!("cube_1024x768_{}x", samples.count());
        group.bench_function(id, |b| {
            let mut renderer = Renderer::with_samples(1024, 768, samples);
            b.iter(|| renderer.render_scene(black_box(&scene), &camera));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_single_triangle,
    benchmark_many_triangles,
    benchmark_frame
);
criterion_main!(benches);
