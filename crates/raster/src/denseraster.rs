use crate::{Cell, CellIterator, GeoReference, Nodata, RasterNum, RasterSize};

/// Raster implementation using a dense data structure.
/// Nodata cells are stored as the [`Nodata::NODATA`] sentinel for the type T in
/// the same data buffer, so no additional storage is needed to track them.
#[derive(Debug, Clone)]
pub struct DenseRaster<T: RasterNum> {
    geo: GeoReference,
    data: Vec<T>,
}

impl<T: RasterNum> DenseRaster<T> {
    pub fn new(geo: GeoReference, data: Vec<T>) -> crate::Result<Self> {
        if data.len() != geo.raster_size().cell_count() {
            return Err(crate::Error::InvalidArgument(format!(
                "Data length {} does not match the raster size {}",
                data.len(),
                geo.raster_size()
            )));
        }

        Ok(DenseRaster { geo, data })
    }

    pub fn from_iter<Iter>(geo: GeoReference, iter: Iter) -> Self
    where
        Iter: Iterator<Item = Option<T>>,
    {
        let mut data = Vec::with_capacity(geo.raster_size().cell_count());
        for val in iter {
            data.push(val.unwrap_or(T::NODATA));
        }

        debug_assert_eq!(data.len(), geo.raster_size().cell_count());
        DenseRaster { geo, data }
    }

    pub fn zeros(geo: GeoReference) -> Self {
        DenseRaster::filled_with(T::zero(), geo)
    }

    pub fn filled_with(val: T, geo: GeoReference) -> Self {
        let cell_count = geo.raster_size().cell_count();
        DenseRaster { geo, data: vec![val; cell_count] }
    }

    pub fn filled_with_nodata(geo: GeoReference) -> Self {
        DenseRaster::filled_with(T::NODATA, geo)
    }

    pub fn into_raw_parts(self) -> (GeoReference, Vec<T>) {
        (self.geo, self.data)
    }

    pub fn geo_reference(&self) -> &GeoReference {
        &self.geo
    }

    pub fn width(&self) -> usize {
        self.geo.columns()
    }

    pub fn height(&self) -> usize {
        self.geo.rows()
    }

    pub fn size(&self) -> RasterSize {
        self.geo.raster_size()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        self.data.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data.as_mut_slice()
    }

    /// The value at the given index or None if the cell contains nodata.
    pub fn value(&self, index: usize) -> Option<T> {
        let val = self.data[index];
        if val.is_nodata() {
            None
        } else {
            Some(val)
        }
    }

    pub fn cell_value(&self, cell: Cell) -> Option<T> {
        self.value(self.cell_index(cell))
    }

    pub fn set_cell_value(&mut self, cell: Cell, val: Option<T>) {
        let index = self.cell_index(cell);
        self.data[index] = val.unwrap_or(T::NODATA);
    }

    pub fn cell_is_nodata(&self, cell: Cell) -> bool {
        self.cell_value(cell).is_none()
    }

    pub fn contains_cell(&self, cell: Cell) -> bool {
        cell.is_valid() && (cell.row as usize) < self.height() && (cell.col as usize) < self.width()
    }

    pub fn nodata_count(&self) -> usize {
        self.data.iter().filter(|x| x.is_nodata()).count()
    }

    pub fn contains_data(&self) -> bool {
        self.data.iter().any(|&x| !x.is_nodata())
    }

    /// The sum of all data values, nodata cells are skipped.
    pub fn sum(&self) -> f64 {
        self.data
            .iter()
            .filter(|&&x| !x.is_nodata())
            .fold(0.0, |acc, x| acc + x.to_f64().unwrap_or(0.0))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Iterate over the raster data, nodata values are represented as None.
    pub fn iter_opt(&self) -> impl Iterator<Item = Option<T>> + '_ {
        self.data.iter().map(|&v| if v.is_nodata() { None } else { Some(v) })
    }

    pub fn cells(&self) -> CellIterator {
        CellIterator::for_raster_with_size(self.size())
    }

    pub fn unary<F: Fn(T) -> T>(&self, op: F) -> Self {
        DenseRaster {
            geo: self.geo.clone(),
            data: self.data.iter().map(|&a| op(a)).collect(),
        }
    }

    pub fn binary<F: Fn(T, T) -> T>(&self, other: &Self, op: F) -> crate::Result<Self> {
        if self.size() != other.size() {
            return Err(crate::Error::SizeMismatch {
                size1: self.size(),
                size2: other.size(),
            });
        }

        let data = self.data.iter().zip(other.data.iter()).map(|(&a, &b)| op(a, b)).collect();
        Ok(DenseRaster {
            geo: self.geo.clone(),
            data,
        })
    }

    fn cell_index(&self, cell: Cell) -> usize {
        cell.row as usize * self.width() + cell.col as usize
    }
}

impl<T: RasterNum> PartialEq for DenseRaster<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.size() != other.size() {
            return false;
        }

        self.data
            .iter()
            .zip(other.data.iter())
            .all(|(&a, &b)| match (a.is_nodata(), b.is_nodata()) {
                (true, true) => true,
                (false, false) => a == b,
                _ => false,
            })
    }
}

impl<T: RasterNum> std::ops::Index<Cell> for DenseRaster<T> {
    type Output = T;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.data[cell.row as usize * self.geo.columns() + cell.col as usize]
    }
}

impl<T: RasterNum> std::ops::IndexMut<Cell> for DenseRaster<T> {
    fn index_mut(&mut self, cell: Cell) -> &mut Self::Output {
        let cols = self.geo.columns();
        &mut self.data[cell.row as usize * cols + cell.col as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_geo(rows: usize, cols: usize) -> GeoReference {
        GeoReference::without_spatial_reference(RasterSize::with_rows_cols(rows, cols), Some(-9999.0))
    }

    #[test]
    fn new_validates_data_length() {
        assert!(DenseRaster::<f64>::new(test_geo(2, 2), vec![1.0; 4]).is_ok());
        assert!(DenseRaster::<f64>::new(test_geo(2, 2), vec![1.0; 3]).is_err());
    }

    #[test]
    fn nodata_aware_equality() -> crate::Result {
        let a = DenseRaster::<f64>::new(test_geo(1, 3), vec![1.0, f64::NAN, 3.0])?;
        let b = DenseRaster::<f64>::new(test_geo(1, 3), vec![1.0, f64::NAN, 3.0])?;
        let c = DenseRaster::<f64>::new(test_geo(1, 3), vec![1.0, 2.0, 3.0])?;

        assert_eq!(a, b);
        assert_ne!(a, c);
        Ok(())
    }

    #[test]
    fn cell_access() -> crate::Result {
        let mut ras = DenseRaster::<i32>::new(test_geo(2, 2), vec![1, 2, 3, 4])?;
        assert_eq!(ras.cell_value(Cell::from_row_col(1, 0)), Some(3));

        ras.set_cell_value(Cell::from_row_col(1, 0), None);
        assert_eq!(ras.cell_value(Cell::from_row_col(1, 0)), None);
        assert_eq!(ras.nodata_count(), 1);
        Ok(())
    }

    #[test]
    fn sum_skips_nodata() -> crate::Result {
        let ras = DenseRaster::<f64>::new(test_geo(1, 3), vec![1.0, f64::NAN, 3.0])?;
        assert_eq!(ras.sum(), 4.0);
        Ok(())
    }
}
