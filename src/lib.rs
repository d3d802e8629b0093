//! Solid color cubes and a small CPU filter host to run them.
//!
//! [`ColorCubeBuilder`] turns a [`TargetColor`] into a [`ColorCubeTable`], a
//! dense 3D lookup table mapping every input color to that one color.
//! [`App`] runs per-pixel fragments over an image; [`filter::color_cube`] is
//! the fragment that applies a table.

use std::{
    io::{self, BufWriter, Write},
    num::NonZeroUsize,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use glam::{UVec2, Vec4};
use image::{DynamicImage, ImageError, ImageFormat, RgbaImage};
use rayon::{prelude::*, ThreadPool, ThreadPoolBuilder};

use crate::extract::Handler;

pub mod color;
pub mod colorspace;
pub mod cube;
pub mod error;
pub mod extract;
pub mod filter;
pub mod utils;

pub use color::TargetColor;
pub use colorspace::{BuiltinColorSpaces, ColorSpace, ColorSpaceDescriptor, ColorSpaceProvider};
pub use cube::{ColorCubeBuilder, ColorCubeTable, Dimension};
pub use error::{CubeError, FilterError};

pub mod prelude {
    pub use crate::{
        color::TargetColor,
        colorspace::{BuiltinColorSpaces, ColorSpace, ColorSpaceDescriptor, ColorSpaceProvider},
        cube::{ColorCubeBuilder, ColorCubeTable, Dimension},
        error::{CubeError, FilterError},
        extract::{FragColor, Fragcoord, Resolution, Uniforms, Uv},
        filter::{color_cube, AlphaMode, ColorCubeFilter, Interpolation},
        App, Image,
    };
    pub use glam::{Vec2, Vec3, Vec4};
}

pub enum Image {
    Handle(DynamicImage),
    Error(ImageError),
}

impl From<&str> for Image {
    fn from(path: &str) -> Self {
        match image::open(path) {
            Ok(img) => Image::Handle(img),
            Err(e) => Image::Error(e),
        }
    }
}

impl From<DynamicImage> for Image {
    fn from(img: DynamicImage) -> Self {
        Image::Handle(img)
    }
}

impl From<RgbaImage> for Image {
    fn from(img: RgbaImage) -> Self {
        Image::Handle(DynamicImage::ImageRgba8(img))
    }
}

pub struct App<T> {
    uniforms: Arc<T>,
    thread_pool: Arc<ThreadPool>,
}

impl<T> Clone for App<T> {
    fn clone(&self) -> Self {
        App {
            uniforms: Arc::clone(&self.uniforms),
            thread_pool: Arc::clone(&self.thread_pool),
        }
    }
}

impl<T> App<T>
where
    T: Send + Sync,
{
    pub fn new(uniforms: T) -> Result<Self, FilterError> {
        let threads = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let thread_pool = ThreadPoolBuilder::new().num_threads(threads).build()?;
        Ok(App {
            uniforms: Arc::new(uniforms),
            thread_pool: Arc::new(thread_pool),
        })
    }

    pub fn uniforms(&self) -> &T {
        &self.uniforms
    }

    /// Swaps the uniforms, keeping the thread pool.
    pub fn set_uniforms(self, uniforms: T) -> Self {
        App {
            uniforms: Arc::new(uniforms),
            ..self
        }
    }

    /// An app with different uniforms running on this app's thread pool.
    pub fn with_uniforms<V>(&self, uniforms: V) -> App<V>
    where
        V: Send + Sync,
    {
        App {
            uniforms: Arc::new(uniforms),
            thread_pool: Arc::clone(&self.thread_pool),
        }
    }

    /// Runs `fragment` once per pixel of `image`, rows in parallel.
    pub fn render<A>(
        &self,
        image: impl Into<Image>,
        fragment: impl Handler<A, T> + Send + Sync,
    ) -> Result<RgbaImage, FilterError> {
        let source = match image.into() {
            Image::Handle(img) => img.to_rgba8(),
            Image::Error(e) => return Err(e.into()),
        };
        let (width, height) = source.dimensions();
        tracing::info!(width, height, "Running app");
        let mut result = RgbaImage::new(width, height);
        if width == 0 || height == 0 {
            return Ok(result);
        }

        let done = AtomicU32::new(0);
        let report_every = (height / 10).max(1);
        let row_len = width as usize * 4;
        self.thread_pool.install(|| {
            result
                .par_chunks_mut(row_len)
                .enumerate()
                .for_each(|(y, row)| {
                    let y = y as u32;
                    for (x, out) in row.chunks_exact_mut(4).enumerate() {
                        let x = x as u32;
                        let ctx = extract::Context {
                            app: self,
                            image: &source,
                            fragcoord: UVec2::new(x, y),
                            fragcolor: normalize(source.get_pixel(x, y).0),
                        };
                        out.copy_from_slice(&quantize(fragment.handle(&ctx)));
                    }
                    let rows = done.fetch_add(1, Ordering::Relaxed) + 1;
                    if rows % report_every == 0 {
                        tracing::debug!("{}/{} rows", rows, height);
                    }
                });
        });
        tracing::info!("Processing complete");
        Ok(result)
    }

    /// Renders like [`render`](Self::render) and writes the result as PNG.
    pub fn run<A>(
        &self,
        image: impl Into<Image>,
        fragment: impl Handler<A, T> + Send + Sync,
        output: impl io::Write + io::Seek,
    ) -> Result<(), FilterError> {
        let result = self.render(image, fragment)?;
        tracing::info!("Writing to output");
        let mut writer = BufWriter::new(output);
        image::write_buffer_with_format(
            &mut writer,
            result.as_raw(),
            result.width(),
            result.height(),
            image::ColorType::Rgba8,
            ImageFormat::Png,
        )?;
        writer.flush()?;
        Ok(())
    }
}

fn normalize(rgba: [u8; 4]) -> Vec4 {
    Vec4::from_array(rgba.map(|c| c as f32 / 255.0))
}

fn quantize(color: Vec4) -> [u8; 4] {
    let color = color.clamp(Vec4::ZERO, Vec4::ONE) * 255.0 + 0.5;
    [color.x as u8, color.y as u8, color.z as u8, color.w as u8]
}
