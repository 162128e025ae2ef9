use std::cmp::Ordering;

use raster::{DenseRaster, Error};

use crate::{LengthUnit, Result};

/// Resolves a window length to a window radius in cells.
///
/// In map units the length is divided by the cell size first; a cell count is
/// taken as is. The window covers the neighbors whose center falls within the
/// window, so a length of 3 cells gives a 3x3 window (radius 1).
pub fn window_radius_in_cells(window_length: f64, unit: LengthUnit, cell_size: f64) -> Result<i32> {
    if !window_length.is_finite() || window_length <= 0.0 {
        return Err(Error::InvalidArgument(format!("Window length must be positive, got {window_length}")).into());
    }

    let cells = match unit {
        LengthUnit::Cells => window_length,
        LengthUnit::MapUnits => {
            let cell_size = cell_size.abs();
            if cell_size == 0.0 {
                return Err(Error::InvalidArgument("Cell size must be non-zero to resolve a map unit window".to_string()).into());
            }

            window_length / cell_size
        }
    };

    Ok((((cells - 1.0) / 2.0).floor().max(0.0)) as i32)
}

/// The most occurring valid cell value within the square window around each
/// cell, clipped at the raster edges. Frequency ties resolve to the smallest
/// value; a window without any valid value yields nodata.
pub fn window_majority(input: &DenseRaster<f64>, radius: i32) -> DenseRaster<f64> {
    let mut window = Vec::with_capacity(((radius * 2 + 1) * (radius * 2 + 1)) as usize);

    DenseRaster::from_iter(
        input.geo_reference().clone(),
        input.cells().map(|cell| {
            window.clear();
            for d_row in -radius..=radius {
                for d_col in -radius..=radius {
                    let neighbor = cell.offset(d_row, d_col);
                    if input.contains_cell(neighbor) {
                        if let Some(val) = input.cell_value(neighbor) {
                            window.push(val);
                        }
                    }
                }
            }

            majority(&mut window)
        }),
    )
}

fn majority(window: &mut [f64]) -> Option<f64> {
    if window.is_empty() {
        return None;
    }

    window.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut best: Option<(f64, usize)> = None;
    let mut run_start = 0;
    for index in 0..=window.len() {
        if index == window.len() || window[index] != window[run_start] {
            let run_length = index - run_start;
            if best.is_none_or(|(_, count)| run_length > count) {
                best = Some((window[run_start], run_length));
            }

            run_start = index;
        }
    }

    best.map(|(val, _)| val)
}

#[cfg(test)]
mod tests {
    use raster::{GeoReference, Nodata, RasterSize};

    use super::*;

    fn geo(rows: usize, cols: usize) -> GeoReference {
        GeoReference::without_spatial_reference(RasterSize::with_rows_cols(rows, cols), None)
    }

    #[test]
    fn radius_resolution() -> crate::Result {
        assert_eq!(window_radius_in_cells(3.0, LengthUnit::Cells, 10.0)?, 1);
        assert_eq!(window_radius_in_cells(30.0, LengthUnit::MapUnits, 10.0)?, 1);
        assert_eq!(window_radius_in_cells(5.0, LengthUnit::Cells, 10.0)?, 2);
        assert_eq!(window_radius_in_cells(1.0, LengthUnit::Cells, 10.0)?, 0);
        assert!(window_radius_in_cells(0.0, LengthUnit::Cells, 10.0).is_err());
        assert!(window_radius_in_cells(30.0, LengthUnit::MapUnits, 0.0).is_err());
        Ok(())
    }

    #[test]
    fn majority_in_window() -> raster::Result {
        #[rustfmt::skip]
        let input = DenseRaster::<f64>::new(geo(3, 3), vec![
            1.0, 1.0, 2.0,
            2.0, 1.0, 2.0,
            3.0, 3.0, 3.0,
        ])?;

        // the full window around the center holds three 1s, three 2s and
        // three 3s, the tie resolves to the smallest value
        let result = window_majority(&input, 1);
        assert_eq!(result.cell_value(raster::Cell::from_row_col(1, 1)), Some(1.0));

        // corner windows are clipped: around (0, 0) the values are [1, 1, 2, 1]
        assert_eq!(result.cell_value(raster::Cell::from_row_col(0, 0)), Some(1.0));
        Ok(())
    }

    #[test]
    fn windows_are_clipped_at_the_edges() -> raster::Result {
        #[rustfmt::skip]
        let input = DenseRaster::<f64>::new(geo(1, 4), vec![
            2.0, 2.0, 1.0, 1.0,
        ])?;

        // window around cell 1 holds [2, 2, 1]: majority 2
        // window around cell 2 holds [2, 1, 1]: majority 1
        let result = window_majority(&input, 1);
        assert_eq!(result.value(1), Some(2.0));
        assert_eq!(result.value(2), Some(1.0));

        // window around cell 0 holds [2, 2]; around cell 3 holds [1, 1]
        assert_eq!(result.value(0), Some(2.0));
        assert_eq!(result.value(3), Some(1.0));
        Ok(())
    }

    #[test]
    fn window_without_data_yields_nodata() -> raster::Result {
        let input = DenseRaster::<f64>::filled_with_nodata(geo(2, 2));
        let result = window_majority(&input, 1);
        assert_eq!(result.nodata_count(), 4);
        Ok(())
    }

    #[test]
    fn radius_zero_is_identity_for_valid_cells() -> raster::Result {
        let input = DenseRaster::<f64>::new(geo(1, 3), vec![4.0, f64::NODATA, 6.0])?;
        let result = window_majority(&input, 0);
        assert_eq!(result, input);
        Ok(())
    }
}
