use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::debug;
use raster::rasterio::{self, RasterReadWrite};
use raster::{DenseRaster, GeoReference, RasterNum};

use crate::{
    Engine, EngineConfig, Error, Feedback, LengthUnit, NativeEngine, Operation, ParameterKind, ParameterValues, Result, ToolSpec,
};

/// Runs tool invocations: one synchronous run at a time on the calling
/// thread, interpreting the tool's data description.
///
/// The transform backend is resolved at call time; without one installed
/// every run fails with a configuration error before any file I/O happens.
pub struct Executor {
    engine: Option<Box<dyn Engine>>,
}

impl Default for Executor {
    fn default() -> Self {
        Executor::new()
    }
}

impl Executor {
    /// Executor backed by the native engine.
    pub fn new() -> Self {
        Executor {
            engine: Some(Box::new(NativeEngine)),
        }
    }

    pub fn with_engine(engine: Box<dyn Engine>) -> Self {
        Executor { engine: Some(engine) }
    }

    /// Executor without a transform backend, for hosts that resolve the
    /// backend dynamically and may come up empty.
    pub fn without_engine() -> Self {
        Executor { engine: None }
    }

    /// Executes one tool invocation end-to-end and returns the mapping from
    /// each declared output key to its destination path.
    ///
    /// Fixed step order per invocation: resolve the engine, resolve parameter
    /// values, establish the spatial frame from the first raster input, load
    /// the inputs, invoke the operation, write the outputs and propagate the
    /// source projection onto every destination. Failures abort the run as
    /// is: no retries, no cleanup of outputs already written.
    pub fn run(&self, tool: &ToolSpec, values: &ParameterValues, feedback: &dyn Feedback) -> Result<BTreeMap<String, PathBuf>> {
        if feedback.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let engine = self.engine.as_deref().ok_or(Error::EngineUnavailable)?;

        let input_paths: Vec<(&str, &Path)> = tool
            .raster_layers()
            .map(|spec| -> Result<(&str, &Path)> { Ok((spec.key, values.path(spec.key)?)) })
            .collect::<Result<_>>()?;
        let output_paths: Vec<(&str, &Path)> = tool
            .raster_destinations()
            .map(|spec| -> Result<(&str, &Path)> { Ok((spec.key, values.path(spec.key)?)) })
            .collect::<Result<_>>()?;

        let (_, frame_path) = input_paths
            .first()
            .ok_or_else(|| Error::InvalidParameter("INPUT".to_string(), "tool declares no raster input".to_string()))?;

        // The spatial frame is established exactly once per invocation, from
        // the first raster input, before any raster is loaded.
        let frame = rasterio::read_header(frame_path)?;
        debug!(
            "Running '{}' on a {} frame with cell size {}",
            tool.descriptor.id,
            frame.raster_size(),
            frame.cell_size_x()
        );

        let config = EngineConfig::new(frame.clone()).with_length_unit(self.length_unit(tool, values)?);
        feedback.set_progress(10.0);

        let outputs = self.invoke(engine, tool, values, &config, &input_paths)?;
        feedback.set_progress(70.0);
        if feedback.is_cancelled() {
            return Err(Error::Cancelled);
        }

        if outputs.len() != output_paths.len() {
            return Err(Error::InvalidParameter(
                "OUTPUT".to_string(),
                format!(
                    "tool '{}' declares {} raster destinations but produced {} results",
                    tool.descriptor.id,
                    output_paths.len(),
                    outputs.len()
                ),
            ));
        }

        let mut results = BTreeMap::new();
        for ((key, path), result) in output_paths.iter().zip(outputs) {
            result.write(path)?;
            if !frame.projection().is_empty() {
                rasterio::write_projection(path, frame.projection())?;
            }

            debug!("Tool '{}' wrote '{}' to {}", tool.descriptor.id, key, path.display());
            results.insert(key.to_string(), path.to_path_buf());
        }

        feedback.set_progress(100.0);
        Ok(results)
    }

    fn invoke(
        &self,
        engine: &dyn Engine,
        tool: &ToolSpec,
        values: &ParameterValues,
        config: &EngineConfig,
        input_paths: &[(&str, &Path)],
    ) -> Result<Vec<DenseRaster<f64>>> {
        match tool.operation {
            Operation::Exp => {
                let input = load::<f64>(input_path(input_paths, 0)?, &config.frame)?;
                Ok(vec![engine.exp(config, &input)?])
            }
            Operation::Order => {
                let input = load::<f64>(input_path(input_paths, 0)?, &config.frame)?;
                Ok(vec![engine.order(config, &input)?])
            }
            Operation::WindowMajority => {
                let window_length = self.number_value(tool, values)?;
                let input = load::<f64>(input_path(input_paths, 0)?, &config.frame)?;
                Ok(vec![engine.window_majority(config, &input, window_length)?])
            }
            Operation::AccuTravelTime => {
                let flow_direction = load::<u8>(input_path(input_paths, 0)?, &config.frame)?;
                let material = load::<f64>(input_path(input_paths, 1)?, &config.frame)?;
                let velocity = load::<f64>(input_path(input_paths, 2)?, &config.frame)?;

                let (flux, state) = engine.accu_travel_time(config, &flow_direction, &material, &velocity)?;
                Ok(vec![flux, state])
            }
        }
    }

    /// The unit of measure for the invocation, taken from the tool's choice
    /// parameter when it declares one.
    fn length_unit(&self, tool: &ToolSpec, values: &ParameterValues) -> Result<LengthUnit> {
        for spec in tool.parameters {
            if let ParameterKind::Choice { options, default } = spec.kind {
                let index = values.choice_opt(spec.key)?.unwrap_or(default);
                if index >= options.len() {
                    return Err(Error::InvalidParameter(
                        spec.key.to_string(),
                        format!("choice index {index} is out of range, {} options are declared", options.len()),
                    ));
                }

                return Ok(match index {
                    0 => LengthUnit::MapUnits,
                    _ => LengthUnit::Cells,
                });
            }
        }

        Ok(LengthUnit::default())
    }

    /// The tool's numeric parameter value, falling back to the declared
    /// default when the caller supplied none.
    fn number_value(&self, tool: &ToolSpec, values: &ParameterValues) -> Result<f64> {
        for spec in tool.parameters {
            if let ParameterKind::Number { default } = spec.kind {
                return Ok(values.number_opt(spec.key)?.unwrap_or(default));
            }
        }

        Err(Error::InvalidParameter(
            tool.descriptor.id.to_string(),
            "tool declares no numeric parameter".to_string(),
        ))
    }
}

fn input_path<'a>(input_paths: &[(&str, &'a Path)], index: usize) -> Result<&'a Path> {
    input_paths
        .get(index)
        .map(|(_, path)| *path)
        .ok_or_else(|| Error::InvalidParameter("INPUT".to_string(), format!("raster input {index} is not declared")))
}

fn load<T: RasterNum>(path: &Path, frame: &GeoReference) -> Result<DenseRaster<T>> {
    let ras = DenseRaster::<T>::read(path)?;
    if !ras.geo_reference().is_aligned_with(frame) {
        return Err(raster::Error::InvalidArgument(format!(
            "Raster '{}' does not share the spatial frame of the first input",
            path.display()
        ))
        .into());
    }

    Ok(ras)
}
