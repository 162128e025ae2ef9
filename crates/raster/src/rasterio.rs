//! Raster file I/O using the ESRI ASCII grid format.
//!
//! The grid header carries the spatial frame (size, origin, cell size) and the
//! nodata value, the cell data follows in row-major order. The projection is
//! stored in a `.prj` sidecar file next to the grid.

use std::fmt::Write as _;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use log::debug;
use num::NumCast;

use crate::{CellSize, DenseRaster, Error, GeoReference, Nodata, Point, RasterNum, RasterSize, Result};

const DEFAULT_NODATA: f64 = -9999.0;

pub trait RasterReadWrite: Sized {
    fn read(path: impl AsRef<Path>) -> Result<Self>;
    fn write(&self, path: impl AsRef<Path>) -> Result;
}

impl<T: RasterNum> RasterReadWrite for DenseRaster<T> {
    fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|_| Error::InvalidPath(path.to_path_buf()))?;
        let (mut geo, data_offset) = parse_header(&contents, path)?;

        if let Some(projection) = read_projection(path)? {
            geo.set_projection(projection);
        }

        let nodata = geo.nodata();
        let expected = geo.raster_size().cell_count();
        let mut data = Vec::with_capacity(expected);
        for token in contents[data_offset..].split_ascii_whitespace() {
            let val: f64 = token.parse()?;
            if Some(val) == nodata {
                data.push(T::NODATA);
            } else {
                data.push(NumCast::from(val).ok_or_else(|| {
                    Error::InvalidNumber(format!("Cell value {val} cannot be represented in the raster data type"))
                })?);
            }
        }

        if data.len() != expected {
            return Err(Error::InvalidArgument(format!(
                "Cell count mismatch in '{}': header declares {} cells, data contains {}",
                path.display(),
                expected,
                data.len()
            )));
        }

        debug!("Read raster '{}' {}", path.display(), geo.raster_size());
        DenseRaster::new(geo, data)
    }

    fn write(&self, path: impl AsRef<Path>) -> Result {
        let path = path.as_ref();
        create_directory_for_file(path)?;

        let geo = self.geo_reference();
        let nodata = geo.nodata().unwrap_or(DEFAULT_NODATA);
        let origin = geo.bottom_left();

        let mut contents = String::new();
        let _ = writeln!(contents, "ncols {}", geo.columns());
        let _ = writeln!(contents, "nrows {}", geo.rows());
        let _ = writeln!(contents, "xllcorner {}", origin.x());
        let _ = writeln!(contents, "yllcorner {}", origin.y());
        let _ = writeln!(contents, "cellsize {}", geo.cell_size_x());
        let _ = writeln!(contents, "NODATA_value {}", nodata);

        let cols = geo.columns();
        for (index, val) in self.iter().enumerate() {
            if index > 0 {
                contents.push(if index % cols == 0 { '\n' } else { ' ' });
            }

            if val.is_nodata() {
                let _ = write!(contents, "{nodata}");
            } else {
                let _ = write!(contents, "{val}");
            }
        }
        contents.push('\n');

        let mut writer = BufWriter::new(std::fs::File::create(path)?);
        writer.write_all(contents.as_bytes())?;
        writer.flush()?;

        if !geo.projection().is_empty() {
            write_projection(path, geo.projection())?;
        }

        debug!("Wrote raster '{}' {}", path.display(), geo.raster_size());
        Ok(())
    }
}

/// Reads only the grid header, establishing the spatial frame without loading
/// any cell data. The projection sidecar is consulted when present.
pub fn read_header(path: impl AsRef<Path>) -> Result<GeoReference> {
    let path = path.as_ref();
    let contents = read_header_block(path)?;
    let (mut geo, _) = parse_header(&contents, path)?;
    if let Some(projection) = read_projection(path)? {
        geo.set_projection(projection);
    }

    Ok(geo)
}

/// The path of the projection sidecar file belonging to a raster path.
pub fn prj_path(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref().with_extension("prj")
}

pub fn read_projection(path: impl AsRef<Path>) -> Result<Option<String>> {
    let prj = prj_path(path);
    if !prj.exists() {
        return Ok(None);
    }

    let projection = std::fs::read_to_string(prj)?;
    let projection = projection.trim();
    if projection.is_empty() {
        Ok(None)
    } else {
        Ok(Some(projection.to_string()))
    }
}

pub fn write_projection(path: impl AsRef<Path>, projection: &str) -> Result {
    std::fs::write(prj_path(path), projection)?;
    Ok(())
}

fn create_directory_for_file(p: &Path) -> Result {
    if let Some(parent_dir) = p.parent() {
        if !parent_dir.as_os_str().is_empty() {
            std::fs::create_dir_all(parent_dir).map_err(|e| {
                Error::Runtime(format!("Failed to create output directory for file '{}' ({e})", p.display()))
            })?;
        }
    }

    Ok(())
}

/// Reads enough of the file to contain the full header block.
fn read_header_block(path: &Path) -> Result<String> {
    use std::io::BufRead;

    let file = std::fs::File::open(path).map_err(|_| Error::InvalidPath(path.to_path_buf()))?;
    let reader = std::io::BufReader::new(file);
    let mut block = String::new();
    for line in reader.lines() {
        let line = line?;
        if !line.trim_start().starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }

        block.push_str(&line);
        block.push('\n');
    }

    Ok(block)
}

/// Parses the header lines and returns the georeference together with the
/// byte offset where the cell data starts.
fn parse_header(contents: &str, path: &Path) -> Result<(GeoReference, usize)> {
    let mut ncols = None;
    let mut nrows = None;
    let mut xllcorner = None;
    let mut yllcorner = None;
    let mut cellsize = None;
    let mut nodata = None;
    let mut data_offset = 0;

    for line in contents.lines() {
        let trimmed = line.trim_start();
        if !trimmed.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }

        let mut tokens = trimmed.split_ascii_whitespace();
        let key = tokens.next().unwrap_or_default().to_ascii_lowercase();
        let value = tokens
            .next()
            .ok_or_else(|| Error::InvalidArgument(format!("Missing value for header field '{key}' in '{}'", path.display())))?;

        match key.as_str() {
            "ncols" => ncols = Some(value.parse::<usize>()?),
            "nrows" => nrows = Some(value.parse::<usize>()?),
            "xllcorner" => xllcorner = Some(value.parse::<f64>()?),
            "yllcorner" => yllcorner = Some(value.parse::<f64>()?),
            "cellsize" => cellsize = Some(value.parse::<f64>()?),
            "nodata_value" => nodata = Some(value.parse::<f64>()?),
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "Unsupported header field '{key}' in '{}'",
                    path.display()
                )));
            }
        }

        let line_start = line.as_ptr() as usize - contents.as_ptr() as usize;
        data_offset = line_start + line.len();
    }

    let missing = |field: &str| Error::InvalidArgument(format!("Missing header field '{field}' in '{}'", path.display()));
    let size = RasterSize::with_rows_cols(nrows.ok_or_else(|| missing("nrows"))?, ncols.ok_or_else(|| missing("ncols"))?);
    let cellsize = cellsize.ok_or_else(|| missing("cellsize"))?;
    if cellsize <= 0.0 {
        return Err(Error::InvalidArgument(format!(
            "Cell size must be positive in '{}'",
            path.display()
        )));
    }

    let geo = GeoReference::with_origin(
        String::new(),
        size,
        Point::new(
            xllcorner.ok_or_else(|| missing("xllcorner"))?,
            yllcorner.ok_or_else(|| missing("yllcorner"))?,
        ),
        CellSize::square(cellsize),
        nodata,
    );

    Ok((geo, data_offset))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cell;

    fn test_geo(rows: usize, cols: usize, nodata: Option<f64>) -> GeoReference {
        GeoReference::with_origin(
            "",
            RasterSize::with_rows_cols(rows, cols),
            Point::new(0.0, 0.0),
            CellSize::square(50.0),
            nodata,
        )
    }

    #[test_log::test]
    fn write_read_preserves_values_and_frame() -> Result {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ras.asc");

        let mut original = DenseRaster::<f64>::new(test_geo(2, 3, Some(-9999.0)), vec![1.0, 2.5, 3.0, 4.0, 5.0, 6.0])?;
        original.set_cell_value(Cell::from_row_col(1, 1), None);
        original.write(&path)?;

        let read_back = DenseRaster::<f64>::read(&path)?;
        assert_eq!(original, read_back);
        assert!(original.geo_reference().is_aligned_with(read_back.geo_reference()));
        assert_eq!(read_back.nodata_count(), 1);
        Ok(())
    }

    #[test_log::test]
    fn header_only_read() -> Result {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ras.asc");

        DenseRaster::<i32>::new(test_geo(2, 2, Some(-9999.0)), vec![1, 2, 3, 4])?.write(&path)?;

        let geo = read_header(&path)?;
        assert_eq!(geo.raster_size(), RasterSize::with_rows_cols(2, 2));
        assert_eq!(geo.cell_size_x(), 50.0);
        assert_eq!(geo.nodata(), Some(-9999.0));
        Ok(())
    }

    #[test_log::test]
    fn projection_sidecar_round_trip() -> Result {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("ras.asc");

        let mut geo = test_geo(1, 1, None);
        geo.set_projection("EPSG:4326");
        DenseRaster::<f64>::new(geo, vec![1.0])?.write(&path)?;

        assert!(prj_path(&path).exists());
        assert_eq!(DenseRaster::<f64>::read(&path)?.geo_reference().projection(), "EPSG:4326");
        Ok(())
    }

    #[test_log::test]
    fn malformed_header_is_rejected() -> Result {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.asc");
        std::fs::write(&path, "ncols 2\nnrows 2\n1 2\n3 4\n")?;

        assert!(DenseRaster::<f64>::read(&path).is_err());
        Ok(())
    }

    #[test_log::test]
    fn missing_file_is_an_invalid_path() {
        match DenseRaster::<f64>::read("/nonexistent/ras.asc") {
            Err(Error::InvalidPath(_)) => (),
            other => panic!("Expected an invalid path error, got {other:?}"),
        }
    }
}
