#![warn(clippy::unwrap_used)]

mod cell;
mod denseraster;
mod georeference;
mod nodata;
pub mod rasterio;
mod rasternum;
mod rastersize;

use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Raster dimensions do not match {size1} <-> {size2}")]
    SizeMismatch { size1: RasterSize, size2: RasterSize },
    #[error("Invalid path: {0}")]
    InvalidPath(std::path::PathBuf),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
    #[error("Runtime error: {0}")]
    Runtime(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::InvalidNumber(err.to_string())
    }
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::InvalidNumber(err.to_string())
    }
}

#[doc(inline)]
pub use cell::Cell;
pub use cell::CellIterator;
#[doc(inline)]
pub use denseraster::DenseRaster;
#[doc(inline)]
pub use georeference::CellSize;
#[doc(inline)]
pub use georeference::GeoReference;
pub use nodata::Nodata;
pub use rasternum::RasterNum;
#[doc(inline)]
pub use rastersize::RasterSize;

pub type Point<T = f64> = geo_types::Point<T>;
