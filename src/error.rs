use crate::colorspace::ColorSpace;

/// Errors produced while building a color cube.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CubeError {
    #[error("color space {0} is not available on this host")]
    UnsupportedColorSpace(ColorSpace),
    #[error("invalid cube dimension {requested}, expected 1..={max}")]
    InvalidDimension { requested: i64, max: usize },
    #[error("cube data holds {actual} values, expected {expected}")]
    DataLength { expected: usize, actual: usize },
    #[error("unknown color space `{0}`")]
    UnknownColorSpace(String),
    #[error("invalid color `{0}`")]
    InvalidColor(String),
}

/// Errors produced while running a filter over an image.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error(transparent)]
    Cube(#[from] CubeError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error("failed to create thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
