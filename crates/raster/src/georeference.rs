use approx::{relative_eq, AbsDiffEq, RelativeEq};
use num::NumCast;

use crate::{Point, RasterSize};

/// Cell dimensions in map units. The y size is negative for north-up rasters.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct CellSize {
    x: f64,
    y: f64,
}

impl CellSize {
    pub fn new(x: f64, y: f64) -> Self {
        CellSize { x, y }
    }

    pub fn square(size: f64) -> Self {
        CellSize::new(size, -size)
    }

    pub fn is_valid(&self) -> bool {
        self.x != 0.0 && self.y != 0.0
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

impl AbsDiffEq for CellSize {
    type Epsilon = <f64 as AbsDiffEq>::Epsilon;

    fn default_epsilon() -> <f64 as AbsDiffEq>::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: <f64 as AbsDiffEq>::Epsilon) -> bool {
        f64::abs_diff_eq(&self.x, &other.x, epsilon) && f64::abs_diff_eq(&self.y, &other.y, epsilon)
    }
}

impl RelativeEq for CellSize {
    fn default_max_relative() -> <f64 as AbsDiffEq>::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: <f64 as AbsDiffEq>::Epsilon,
        max_relative: <f64 as AbsDiffEq>::Epsilon,
    ) -> bool {
        f64::relative_eq(&self.x, &other.x, epsilon, max_relative) && f64::relative_eq(&self.y, &other.y, epsilon, max_relative)
    }
}

/// The metadata associated with a raster so it can be georeferenced.
/// All rasters that take part in one operation must share this reference
/// geometry (extent, resolution, alignment).
#[derive(Clone, Debug, PartialEq, Default)]
pub struct GeoReference {
    /// The projection string
    projection: String,
    /// The size of the raster in cells
    size: RasterSize,
    /// The affine transformation
    geo_transform: [f64; 6],
    /// The nodata value
    nodata: Option<f64>,
}

impl GeoReference {
    pub fn new<S: Into<String>>(projection: S, size: RasterSize, geo_transform: [f64; 6], nodata: Option<f64>) -> Self {
        GeoReference {
            projection: projection.into(),
            size,
            geo_transform,
            nodata,
        }
    }

    pub fn without_spatial_reference(size: RasterSize, nodata: Option<f64>) -> Self {
        GeoReference {
            size,
            nodata,
            ..Default::default()
        }
    }

    pub fn with_origin<S: Into<String>, T: NumCast>(
        projection: S,
        size: RasterSize,
        lower_left: Point,
        cell_size: CellSize,
        nodata: Option<T>,
    ) -> Self {
        let geo_transform = [
            lower_left.x(),
            cell_size.x(),
            0.0,
            lower_left.y() - (cell_size.y() * size.rows as f64),
            0.0,
            cell_size.y(),
        ];

        GeoReference {
            projection: projection.into(),
            size,
            geo_transform,
            nodata: nodata.and_then(|x| x.to_f64()),
        }
    }

    pub fn raster_size(&self) -> RasterSize {
        self.size
    }

    pub fn rows(&self) -> usize {
        self.size.rows
    }

    pub fn columns(&self) -> usize {
        self.size.cols
    }

    pub fn projection(&self) -> &str {
        &self.projection
    }

    pub fn set_projection<S: Into<String>>(&mut self, projection: S) {
        self.projection = projection.into();
    }

    pub fn nodata(&self) -> Option<f64> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<f64>) {
        self.nodata = nodata;
    }

    pub fn geo_transform(&self) -> [f64; 6] {
        self.geo_transform
    }

    pub fn cell_size(&self) -> CellSize {
        CellSize::new(self.cell_size_x(), self.cell_size_y())
    }

    pub fn cell_size_x(&self) -> f64 {
        self.geo_transform[1]
    }

    pub fn cell_size_y(&self) -> f64 {
        self.geo_transform[5]
    }

    /// The coordinate of the lower left corner of the raster.
    pub fn bottom_left(&self) -> Point {
        Point::new(
            self.geo_transform[0],
            self.geo_transform[3] + (self.cell_size_y() * self.size.rows as f64),
        )
    }

    /// True when both rasters describe the same spatial frame: equal size
    /// and matching geotransform within floating point tolerance.
    pub fn is_aligned_with(&self, other: &GeoReference) -> bool {
        self.size == other.size
            && self
                .geo_transform
                .iter()
                .zip(other.geo_transform.iter())
                .all(|(&a, &b)| relative_eq!(a, b, epsilon = 1e-10))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(cell_size: f64) -> GeoReference {
        GeoReference::with_origin(
            "EPSG:31370",
            RasterSize::with_rows_cols(3, 4),
            Point::new(10.0, 20.0),
            CellSize::square(cell_size),
            Some(-9999.0),
        )
    }

    #[test]
    fn origin_round_trips_through_geo_transform() {
        let meta = reference(100.0);
        assert_eq!(meta.bottom_left(), Point::new(10.0, 20.0));
        assert_eq!(meta.cell_size_x(), 100.0);
        assert_eq!(meta.cell_size_y(), -100.0);
    }

    #[test]
    fn alignment_check() {
        assert!(reference(100.0).is_aligned_with(&reference(100.0)));
        assert!(!reference(100.0).is_aligned_with(&reference(50.0)));

        let mut other = reference(100.0);
        other.size = RasterSize::with_rows_cols(4, 4);
        assert!(!reference(100.0).is_aligned_with(&other));
    }
}
