use std::path::PathBuf;

use anyhow::Context;
use fixrast::config::ViewerConfig;
use fixrast::mesh;
use fixrast::renderer::Renderer;
use fixrast::scene::Scene;
use fixrast::transform::Transform;

struct Args {
    config: Option<PathBuf>,
    window: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: None,
        window: false,
    };
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--window" => args.window = true,
            flag if flag.starts_with("--") => anyhow::bail!("unknown option '{}'", flag),
            path if args.config.is_none() => args.config = Some(PathBuf::from(path)),
            extra => anyhow::bail!("unexpected argument '{}'", extra),
        }
    }
    Ok(args)
}

fn build_scene(config: &ViewerConfig) -> anyhow::Result<Scene> {
    let mut scene = Scene::new();
    let range = match config.model_path() {
        Some(path) => scene
            .add_models(path, config.material_base())
            .with_context(|| format!("loading {}", path.display()))?,
        None => scene.add_meshes(vec![mesh::unit_cube()])?,
    };
    for model in range.ids() {
        scene.add_instance_with(model, Transform::new(), config.scene.instance_color)?;
    }
    Ok(scene)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    };

    let scene = build_scene(&config)?;
    let camera = config.camera()?;
    let mut renderer = Renderer::with_samples(
        config.framebuffer.width,
        config.framebuffer.height,
        config.sample_count()?,
    );
    renderer.set_clear_color(config.framebuffer.clear_color);
    renderer.set_backface_culling(config.scene.backface_culling);

    if args.window {
        return run_window(&mut renderer, &scene, &camera);
    }

    let stats = renderer.render_scene(&scene, &camera);
    log::info!(
        "Rendered {} triangles, {} samples written",
        stats.triangles_submitted,
        stats.samples_written
    );
    renderer
        .framebuffer()
        .to_rgba_image()
        .save(&config.output.png)
        .with_context(|| format!("writing {}", config.output.png.display()))?;
    log::info!("Saved {}", config.output.png.display());
    Ok(())
}

#[cfg(feature = "viewer")]
fn run_window(
    renderer: &mut Renderer,
    scene: &Scene,
    camera: &fixrast::camera::Camera,
) -> anyhow::Result<()> {
    use fixrast::render::PixelFormat;
    use fixrast::window::{FpsCounter, Window, WindowEvent};

    let (width, height) = (renderer.width(), renderer.height());
    let mut window = Window::new("fixrast", width, height).map_err(anyhow::Error::msg)?;
    let mut fps = FpsCounter::new(&window);
    let mut pixels = vec![0u8; width as usize * height as usize * 4];

    loop {
        if window.poll_events() == WindowEvent::Quit {
            break;
        }
        renderer.render_scene(scene, camera);
        renderer
            .framebuffer()
            .pack(0, 0, width, height, PixelFormat::Bgra8Unorm, &mut pixels)?;
        window.present(&pixels).map_err(anyhow::Error::msg)?;
        if let Some(rate) = fps.tick(&window) {
            log::info!("{:.1} fps", rate);
        }
    }
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn run_window(
    _renderer: &mut Renderer,
    _scene: &Scene,
    _camera: &fixrast::camera::Camera,
) -> anyhow::Result<()> {
    anyhow::bail!("built without the `viewer` feature; rebuild with --features viewer")
}
