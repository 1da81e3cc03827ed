//! Scene assembly and the data-parallel pixel loop.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use crate::camera::Camera;
use crate::container::Container;
use crate::light::Light;
use crate::material::Color;
use crate::sampling::{gaussian_jitter, gen_f64};
use crate::tracer::Tracer;

/// Rendering parameters.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Recursion bound of the estimator
    pub max_depth: u32,
    /// Rays per pixel, and per sampled branch inside the estimator
    pub samples: u32,
    /// Gaussian sub-pixel jitter
    pub anti_aliasing: bool,
    /// Textual progress indicator
    pub progress_bar: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_depth: 5,
            samples: 32,
            anti_aliasing: false,
            progress_bar: false,
        }
    }
}

/// A renderable scene: camera, lights, the object container and the output
/// buffer.
///
/// The image buffer holds three consecutive planes (R, G, B), each row-major
/// with the top scanline first; `image()` is therefore directly consumable
/// by a raster encoder.
pub struct Scene {
    camera: Camera,
    objects: Arc<dyn Container>,
    lights: Vec<Light>,
    image: Vec<u8>,
    gamma: f64,
    seed: u64,
}

impl Scene {
    /// New scene seeded from the wall clock. Use [`Scene::with_seed`] for
    /// reproducible runs.
    pub fn new(camera: Camera, objects: impl Container + 'static) -> Self {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default();
        let image = vec![0; 3 * camera.height() * camera.width()];
        Self {
            camera,
            objects: Arc::new(objects),
            lights: Vec::new(),
            image,
            gamma: 2.2,
            seed,
        }
    }

    /// Fix the base seed of the per-thread sample generators.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    /// Gamma correction applied when encoding the image (default 2.2).
    pub fn set_gamma(&mut self, gamma: f64) {
        self.gamma = gamma;
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn height(&self) -> usize {
        self.camera.height()
    }

    pub fn width(&self) -> usize {
        self.camera.width()
    }

    /// The rendered planar RGB buffer.
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    /// Render the scene into the image buffer.
    ///
    /// Rows are distributed over the rayon pool; every worker draws its
    /// samples from a ChaCha8 engine seeded from the scene seed and its
    /// thread index, so a run is reproducible for a fixed work partition.
    pub fn render(&mut self, options: &RenderOptions) {
        let width = self.width();
        let height = self.height();
        let camera = &self.camera;
        let tracer = Tracer {
            objects: &*self.objects,
            lights: &self.lights,
        };

        info!(
            "rendering {}x{} (depth {}, {} spp) on {} threads",
            width,
            height,
            options.max_depth,
            options.samples,
            rayon::current_num_threads()
        );

        let progress = options.progress_bar.then(|| {
            let bar = ProgressBar::new((width * height) as u64);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template("{bar:40} {pos}/{len} ETA: {eta}")
                    .unwrap(),
            );
            bar
        });

        let seed = self.seed;
        let inv_gamma = 1.0 / self.gamma;
        let rows: Vec<Vec<[u8; 3]>> = (0..height)
            .into_par_iter()
            .map_init(
                || {
                    let thread = rayon::current_thread_index().unwrap_or(0) as u64;
                    ChaCha8Rng::seed_from_u64(seed.wrapping_add(thread))
                },
                |rng, i| {
                    let mut row = Vec::with_capacity(width);
                    for j in 0..width {
                        let color = if options.anti_aliasing && options.samples > 0 {
                            let mut accumulated = Color::ZERO;
                            for _ in 0..options.samples {
                                let (di, dj) = gaussian_jitter(gen_f64(rng), gen_f64(rng));
                                let ray = camera.launch_jittered(i, j, di, dj);
                                accumulated +=
                                    tracer.get_color(&ray, options.max_depth, 1, 1.0, 1.0, rng);
                            }
                            accumulated / options.samples as f64
                        } else {
                            let ray = camera.launch(i, j);
                            tracer.get_color(&ray, options.max_depth, options.samples, 1.0, 1.0, rng)
                        };
                        row.push(encode(color, inv_gamma));
                        if let Some(bar) = &progress {
                            bar.inc(1);
                        }
                    }
                    row
                },
            )
            .collect();

        // Scatter the rows into the three planes, flipping vertically so the
        // buffer reads top-to-bottom.
        let plane = width * height;
        for (i, row) in rows.into_iter().enumerate() {
            let base = (height - 1 - i) * width;
            for (j, [r, g, b]) in row.into_iter().enumerate() {
                self.image[base + j] = r;
                self.image[base + j + plane] = g;
                self.image[base + j + 2 * plane] = b;
            }
        }

        if let Some(bar) = progress {
            bar.finish();
        }
    }
}

/// Gamma-encode one channel triple. The saturating cast clamps to
/// [0, 255] and maps NaN to black.
fn encode(color: Color, inv_gamma: f64) -> [u8; 3] {
    [
        (255.0 * color.x.powf(inv_gamma)) as u8,
        (255.0 * color.y.powf(inv_gamma)) as u8,
        (255.0 * color.z.powf(inv_gamma)) as u8,
    ]
}
