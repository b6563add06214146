//! Stellar Canvas entry point
//!
//! On the web the library's start hook does the setup and pages call
//! `mount_scene`. Natively, scenes are driven headlessly on a software
//! surface, which is handy for profiling and snapshotting presets.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use glam::Vec2;
    use stellar_canvas::engine::pointer::PointerSignal;
    use stellar_canvas::engine::raster::PixelSurface;
    use stellar_canvas::engine::render_loop::ManualTicker;
    use stellar_canvas::{SceneKind, Settings, mount, unmount};

    const DEFAULT_FRAMES: u64 = 600;
    const DEFAULT_VIEWPORT: Vec2 = Vec2::new(1280.0, 720.0);

    pub struct Args {
        pub scenes: Vec<SceneKind>,
        pub frames: u64,
        pub snapshot_dir: Option<PathBuf>,
    }

    /// `stellar-canvas [scene|all] [frames] [--snapshot DIR]`
    pub fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
        let mut scenes = SceneKind::ALL.to_vec();
        let mut frames = DEFAULT_FRAMES;
        let mut snapshot_dir = None;
        let mut positional = 0;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            if arg == "--snapshot" {
                let dir = args.next().ok_or("--snapshot needs a directory")?;
                snapshot_dir = Some(PathBuf::from(dir));
                continue;
            }
            match positional {
                0 if arg == "all" => {}
                0 => {
                    let kind = SceneKind::from_str(&arg).ok_or_else(|| format!("unknown scene '{arg}'"))?;
                    scenes = vec![kind];
                }
                1 => frames = arg.parse().map_err(|_| format!("invalid frame count '{arg}'"))?,
                _ => return Err(format!("unexpected argument '{arg}'")),
            }
            positional += 1;
        }
        Ok(Args {
            scenes,
            frames,
            snapshot_dir,
        })
    }

    pub fn run(args: &Args) -> Result<(), String> {
        let settings = Settings::load();
        log::info!(
            "Quality {}, trails {}, parallax {}",
            settings.quality.as_str(),
            settings.trails,
            settings.effective_parallax()
        );

        for kind in &args.scenes {
            let config = kind.config(DEFAULT_VIEWPORT);
            let surface = PixelSurface::new(config.width as u32, config.height as u32);
            let mut handle = mount(surface, &config, &settings, PointerSignal::new(), ManualTicker::new())
                .map_err(|e| format!("{}: {e}", kind.as_str()))?;

            for _ in 0..args.frames {
                let Some(id) = handle.ticker_mut().fire_next() else {
                    break;
                };
                handle.on_tick(id);
            }

            log::info!(
                "{}: {} frames, {} particles, mean luminance {:.4}",
                kind.as_str(),
                handle.frame(),
                handle.population(),
                handle.surface().mean_luminance()
            );
            if let Some(dir) = &args.snapshot_dir {
                let path = dir.join(format!("{}.ppm", kind.as_str()));
                write_ppm(&path, handle.surface()).map_err(|e| format!("{}: {e}", path.display()))?;
                log::info!("Wrote {}", path.display());
            }
            unmount(handle);
        }
        Ok(())
    }

    /// Binary PPM, alpha dropped
    fn write_ppm(path: &std::path::Path, surface: &PixelSurface) -> std::io::Result<()> {
        let rgba = surface.to_rgba8();
        let mut out = format!("P6\n{} {}\n255\n", surface.width(), surface.height()).into_bytes();
        out.reserve(rgba.len() / 4 * 3);
        for px in rgba.chunks_exact(4) {
            out.extend_from_slice(&px[..3]);
        }
        std::fs::write(path, out)
    }

}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Stellar Canvas (native, headless) starting...");

    let result = headless::parse_args(std::env::args().skip(1)).and_then(|args| headless::run(&args));
    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library's #[wasm_bindgen(start)] hook is the web entry point
}
