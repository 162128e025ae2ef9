use std::cmp::Ordering;

use itertools::Itertools;
use raster::DenseRaster;

/// Assigns each valid cell its 1-based position in the ascending sequence of
/// cell values. Equal values are ranked in row-major cell order, so every
/// rank from 1 to the number of valid cells occurs exactly once. Nodata cells
/// stay nodata.
pub fn order(input: &DenseRaster<f64>) -> DenseRaster<f64> {
    let ranked = input
        .iter_opt()
        .enumerate()
        .filter_map(|(index, val)| val.map(|v| (index, v)))
        .sorted_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

    let mut result = DenseRaster::filled_with_nodata(input.geo_reference().clone());
    for (rank, (index, _)) in ranked.enumerate() {
        result.as_mut_slice()[index] = (rank + 1) as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use raster::{GeoReference, Nodata, RasterSize};

    use super::*;

    fn geo(rows: usize, cols: usize) -> GeoReference {
        GeoReference::without_spatial_reference(RasterSize::with_rows_cols(rows, cols), None)
    }

    #[test]
    fn ranks_ascending_values() -> raster::Result {
        let input = DenseRaster::<f64>::new(geo(2, 2), vec![40.0, 10.0, 30.0, 20.0])?;
        let expected = DenseRaster::<f64>::new(geo(2, 2), vec![4.0, 1.0, 3.0, 2.0])?;
        assert_eq!(order(&input), expected);
        Ok(())
    }

    #[test]
    fn each_rank_occurs_exactly_once_with_ties() -> raster::Result {
        let input = DenseRaster::<f64>::new(geo(2, 3), vec![5.0, 1.0, 5.0, f64::NODATA, 1.0, 2.0])?;

        let result = order(&input);
        let mut ranks: Vec<f64> = result.iter_opt().flatten().collect();
        ranks.sort_by(|a, b| a.partial_cmp(b).expect("finite ranks"));
        assert_eq!(ranks, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(result.nodata_count(), 1);

        // ties resolve in row-major cell order
        assert_eq!(result.value(1), Some(1.0));
        assert_eq!(result.value(4), Some(2.0));
        assert_eq!(result.value(0), Some(4.0));
        assert_eq!(result.value(2), Some(5.0));
        Ok(())
    }
}
