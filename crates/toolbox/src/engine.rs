use raster::{DenseRaster, GeoReference};

use crate::{ops, Result};

/// Unit of measure for lengths passed to window operations: real world map
/// units or a cell count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    #[default]
    MapUnits,
    Cells,
}

/// Per invocation engine configuration: the spatial frame all rasters of the
/// invocation must share and the unit of measure for length arguments.
///
/// This replaces ambient process-wide state (an active clone geometry and
/// global option flags): every transform call receives its configuration
/// explicitly, so nothing leaks between invocations.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub frame: GeoReference,
    pub length_unit: LengthUnit,
}

impl EngineConfig {
    pub fn new(frame: GeoReference) -> Self {
        EngineConfig {
            frame,
            length_unit: LengthUnit::default(),
        }
    }

    pub fn with_length_unit(mut self, length_unit: LengthUnit) -> Self {
        self.length_unit = length_unit;
        self
    }
}

/// The transform backend invoked by the executor.
///
/// Each method maps to one operation family and takes the configuration as an
/// explicit argument. Correlated outputs (flux and state) come from a single
/// call on the shared input triple.
pub trait Engine {
    fn exp(&self, config: &EngineConfig, input: &DenseRaster<f64>) -> Result<DenseRaster<f64>>;

    fn order(&self, config: &EngineConfig, input: &DenseRaster<f64>) -> Result<DenseRaster<f64>>;

    fn window_majority(&self, config: &EngineConfig, input: &DenseRaster<f64>, window_length: f64) -> Result<DenseRaster<f64>>;

    #[allow(clippy::type_complexity)]
    fn accu_travel_time(
        &self,
        config: &EngineConfig,
        flow_direction: &DenseRaster<u8>,
        material: &DenseRaster<f64>,
        velocity: &DenseRaster<f64>,
    ) -> Result<(DenseRaster<f64>, DenseRaster<f64>)>;
}

/// Native implementation of the raster operations.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeEngine;

impl Engine for NativeEngine {
    fn exp(&self, _config: &EngineConfig, input: &DenseRaster<f64>) -> Result<DenseRaster<f64>> {
        Ok(ops::exp(input))
    }

    fn order(&self, _config: &EngineConfig, input: &DenseRaster<f64>) -> Result<DenseRaster<f64>> {
        Ok(ops::order(input))
    }

    fn window_majority(&self, config: &EngineConfig, input: &DenseRaster<f64>, window_length: f64) -> Result<DenseRaster<f64>> {
        let radius = ops::window_radius_in_cells(window_length, config.length_unit, config.frame.cell_size_x())?;
        Ok(ops::window_majority(input, radius))
    }

    fn accu_travel_time(
        &self,
        config: &EngineConfig,
        flow_direction: &DenseRaster<u8>,
        material: &DenseRaster<f64>,
        velocity: &DenseRaster<f64>,
    ) -> Result<(DenseRaster<f64>, DenseRaster<f64>)> {
        ops::accu_travel_time(flow_direction, material, velocity, config.frame.cell_size_x().abs())
    }
}
