use std::path::PathBuf;

use fixrast::colors;
use fixrast::config::ViewerConfig;
use fixrast::prelude::*;
use fixrast::scene::{Table, MAX_INSTANCES};
use fixrast::SceneError;

const WIDTH: u32 = 1024;
const HEIGHT: u32 = 768;

fn asset(path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(path)
}

fn cube_scene() -> Scene {
    let mut scene = Scene::new();
    let cubes = scene.add_meshes(vec![unit_cube()]).unwrap();
    scene.add_instance(cubes.first).unwrap();
    scene
}

fn render(scene: &Scene, samples: SampleCount) -> Renderer {
    let mut renderer = Renderer::with_samples(WIDTH, HEIGHT, samples);
    renderer.render_scene(scene, &Camera::default());
    renderer
}

fn packed(renderer: &Renderer, format: PixelFormat) -> Vec<u8> {
    let fb = renderer.framebuffer();
    let mut out = vec![0u8; (fb.width() * fb.height()) as usize * format.bytes_per_pixel()];
    fb.pack(0, 0, fb.width(), fb.height(), format, &mut out)
        .unwrap();
    out
}

#[test]
fn default_cube_is_a_centered_convex_silhouette() {
    let renderer = render(&cube_scene(), SampleCount::One);
    let fb = renderer.framebuffer();
    assert!(fb.covered_pixels(colors::BACKGROUND) > 0);
    assert_eq!(fb.color_at(WIDTH / 2, HEIGHT / 2), Some(colors::FILL));

    let (mut min_x, mut max_x, mut min_y, mut max_y) = (u32::MAX, 0, u32::MAX, 0);
    for y in 0..HEIGHT {
        let covered: Vec<u32> = (0..WIDTH)
            .filter(|&x| fb.color_at(x, y) != Some(colors::BACKGROUND))
            .collect();
        let (Some(&first), Some(&last)) = (covered.first(), covered.last()) else {
            continue;
        };
        // Convex outline and watertight faces: one unbroken span per row.
        assert_eq!(
            (last - first + 1) as usize,
            covered.len(),
            "row {} has a gap",
            y
        );
        min_x = min_x.min(first);
        max_x = max_x.max(last);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    // Symmetric about the vertical plane through the eye and the origin.
    let center_x = (min_x + max_x) as i64 / 2;
    assert!((center_x - WIDTH as i64 / 2).abs() <= 2, "center x {}", center_x);
    assert!(min_y < HEIGHT / 2 && HEIGHT / 2 < max_y);
    assert!(min_x > 0 && max_x < WIDTH - 1);
    assert!(min_y > 0 && max_y < HEIGHT - 1);
}

#[test]
fn frame_packs_into_rgba_bytes() {
    let renderer = render(&cube_scene(), SampleCount::One);
    let rgba = packed(&renderer, PixelFormat::Rgba8Unorm);
    assert_eq!(rgba.len(), (WIDTH * HEIGHT * 4) as usize);

    let [a, r, g, b] = colors::channels(colors::BACKGROUND);
    assert_eq!(&rgba[..4], &[r, g, b, a]);

    let center = ((HEIGHT / 2 * WIDTH + WIDTH / 2) * 4) as usize;
    let [a, r, g, b] = colors::channels(colors::FILL);
    assert_eq!(&rgba[center..center + 4], &[r, g, b, a]);

    let bgra = packed(&renderer, PixelFormat::Bgra8Unorm);
    assert_eq!(&bgra[center..center + 4], &[b, g, r, a]);
}

#[test]
fn repeated_frames_are_bit_identical() {
    let scene = cube_scene();
    for samples in [SampleCount::One, SampleCount::Four] {
        let first = packed(&render(&scene, samples), PixelFormat::Rgba8Unorm);
        let mut renderer = render(&scene, samples);
        renderer.render_scene(&scene, &Camera::default());
        assert_eq!(first, packed(&renderer, PixelFormat::Rgba8Unorm));
    }
}

#[test]
fn multisampling_only_changes_edge_pixels() {
    let scene = cube_scene();
    let single = render(&scene, SampleCount::One);
    let multi = render(&scene, SampleCount::Four);
    let (a, b) = (single.framebuffer(), multi.framebuffer());
    assert_eq!(a.color_at(WIDTH / 2, HEIGHT / 2), b.color_at(WIDTH / 2, HEIGHT / 2));
    assert_eq!(a.color_at(0, 0), b.color_at(0, 0));

    let blended = b
        .resolved_colors()
        .iter()
        .filter(|&&c| c != colors::FILL && c != colors::BACKGROUND)
        .count();
    assert!(blended > 0);
    assert!(blended < b.covered_pixels(colors::BACKGROUND));
}

#[test]
fn obj_cube_matches_built_in_cube() {
    let mut scene = Scene::new();
    let range = scene
        .add_models(asset("assets/cube/cube.obj"), asset("assets/cube"))
        .unwrap();
    assert_eq!(range.count, 1);
    let model = scene.model(range.first).unwrap();
    assert_eq!(model.vertex_count(), 8);
    assert_eq!(model.triangle_count(), 12);
    scene.add_instance(range.first).unwrap();

    let from_obj = render(&scene, SampleCount::One);
    let built_in = render(&cube_scene(), SampleCount::One);
    assert_eq!(
        packed(&from_obj, PixelFormat::Rgba8Unorm),
        packed(&built_in, PixelFormat::Rgba8Unorm)
    );
}

#[test]
fn sample_config_describes_the_default_view() {
    let config = ViewerConfig::load(asset("assets/cube/cube.toml")).unwrap();
    assert_eq!(config.sample_count().unwrap(), SampleCount::Four);
    let camera = config.camera().unwrap();
    assert_eq!(camera.view_projection(), Camera::default().view_projection());
}

#[test]
fn instance_table_rejects_overflow_without_side_effects() {
    let mut scene = Scene::new();
    let cubes = scene.add_meshes(vec![unit_cube()]).unwrap();
    for _ in 0..MAX_INSTANCES {
        scene.add_instance(cubes.first).unwrap();
    }
    let err = scene.add_instance(cubes.first).unwrap_err();
    assert_eq!(
        err,
        SceneError::CapacityExceeded {
            table: Table::Instances,
            capacity: MAX_INSTANCES,
        }
    );
    assert_eq!(scene.instance_count(), MAX_INSTANCES);

    // All instances overlap exactly; the frame matches a single cube.
    let mut renderer = Renderer::new(256, 192);
    let stats = renderer.render_scene(&scene, &Camera::default());
    assert_eq!(stats.instances, MAX_INSTANCES as u32);
    let mut single = Renderer::new(256, 192);
    single.render_scene(&cube_scene(), &Camera::default());
    assert_eq!(
        renderer.framebuffer().resolved_colors(),
        single.framebuffer().resolved_colors()
    );
}

#[test]
fn model_table_rejects_batches_that_do_not_fit() {
    let mut scene = Scene::with_capacity(2, 4);
    scene.add_meshes(vec![unit_cube()]).unwrap();
    let err = scene
        .add_meshes(vec![unit_cube(), unit_cube()])
        .unwrap_err();
    assert!(matches!(
        err,
        SceneError::CapacityExceeded {
            table: Table::Models,
            capacity: 2
        }
    ));
    assert_eq!(scene.model_count(), 1);
}
