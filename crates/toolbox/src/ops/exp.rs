use raster::{DenseRaster, Nodata};

/// Base e exponential of every cell value. Nodata propagates.
pub fn exp(input: &DenseRaster<f64>) -> DenseRaster<f64> {
    input.unary(|v| if v.is_nodata() { f64::NODATA } else { v.exp() })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use raster::{GeoReference, RasterSize};

    use super::*;

    #[test]
    fn exp_of_zero_is_one() -> raster::Result {
        let geo = GeoReference::without_spatial_reference(RasterSize::with_rows_cols(3, 3), None);
        let input = DenseRaster::<f64>::zeros(geo);

        let result = exp(&input);
        assert!(result.iter().all(|&v| v == 1.0));
        Ok(())
    }

    #[test]
    fn exp_values_and_nodata() -> raster::Result {
        let geo = GeoReference::without_spatial_reference(RasterSize::with_rows_cols(1, 3), None);
        let input = DenseRaster::<f64>::new(geo, vec![1.0, -1.0, f64::NODATA])?;

        let result = exp(&input);
        assert_relative_eq!(result.value(0).expect("data"), std::f64::consts::E);
        assert_relative_eq!(result.value(1).expect("data"), 1.0 / std::f64::consts::E);
        assert_eq!(result.value(2), None);
        Ok(())
    }
}
