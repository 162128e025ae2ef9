use crate::{Error, ParameterSpec, Result, ToolDescriptor};

/// The operation a tool runs. The executor dispatches on this after resolving
/// parameters, loading inputs and building the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Exp,
    Order,
    WindowMajority,
    AccuTravelTime,
}

/// A complete data description of one tool: identity, ordered parameter
/// schema and the operation to run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolSpec {
    pub descriptor: ToolDescriptor,
    pub parameters: &'static [ParameterSpec],
    pub operation: Operation,
}

impl ToolSpec {
    pub fn raster_layers(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.is_raster_layer())
    }

    pub fn raster_destinations(&self) -> impl Iterator<Item = &ParameterSpec> {
        self.parameters.iter().filter(|p| p.is_raster_destination())
    }
}

static ACCU_TRAVEL_TIME_FLUX: ToolSpec = ToolSpec {
    descriptor: ToolDescriptor::new(
        "accutraveltimeflux",
        "accutraveltimeflux and accutraveltimestate",
        "hydrological",
        "Hydrological and material transport operations",
        "Transports material downstream over a distance dependent on a given velocity.\n\n\
         Parameters:\n\n\
         * Input flow direction raster (required) - flow direction in keypad encoding (see lddcreate)\n\
         * Input material raster (required) - scalar raster with the amount of material input (>= 0)\n\
         * Input velocity raster (required) - scalar raster with the distance per time step in map units (>= 0)\n\
         * Output flux raster (required) - scalar raster with the resulting flux of material\n\
         * Output state raster (required) - scalar raster with the resulting state of stored material",
    ),
    parameters: &[
        ParameterSpec::raster_layer("INPUT", "Input Flow Direction Raster Layer"),
        ParameterSpec::raster_layer("INPUT2", "Input Material Raster Layer"),
        ParameterSpec::raster_layer("INPUT3", "Input Velocity Raster Layer"),
        ParameterSpec::raster_destination("OUTPUT", "Output Material Flux Raster Layer"),
        ParameterSpec::raster_destination("OUTPUT2", "Output State Raster Layer"),
    ],
    operation: Operation::AccuTravelTime,
};

static EXP: ToolSpec = ToolSpec {
    descriptor: ToolDescriptor::new(
        "exp",
        "exp",
        "operators",
        "Mathematical operators",
        "Base e exponential.\n\n\
         Parameters:\n\n\
         * Input raster (required) - scalar raster layer with the power value\n\
         * Output raster (required) - scalar raster with the result",
    ),
    parameters: &[
        ParameterSpec::raster_layer("INPUT", "Scalar Raster layer"),
        ParameterSpec::raster_destination("OUTPUT", "Output exp layer"),
    ],
    operation: Operation::Exp,
};

static ORDER: ToolSpec = ToolSpec {
    descriptor: ToolDescriptor::new(
        "order",
        "order",
        "order",
        "Order",
        "Ordinal numbers to cells in ascending order.\n\n\
         Parameters:\n\n\
         * Input raster layer (required) - raster layer with ordinal or scalar data type\n\
         * Output raster (required) - scalar raster with the ordinal numbers of the cells in ascending order",
    ),
    parameters: &[
        ParameterSpec::raster_layer("INPUT", "Scalar or Ordinal Raster layer"),
        ParameterSpec::raster_destination("OUTPUT", "Output order layer"),
    ],
    operation: Operation::Order,
};

pub(crate) static WINDOW_LENGTH_UNITS: &[&str] = &["Map units", "Cells"];

static WINDOW_MAJORITY: ToolSpec = ToolSpec {
    descriptor: ToolDescriptor::new(
        "windowmajority",
        "windowmajority",
        "pcraster",
        "PCRaster",
        "Most occurring cell value within a specified square neighbourhood.\n\n\
         Parameters:\n\n\
         * Input raster layer (required) - boolean, nominal or ordinal raster layer\n\
         * Units (required) - map units or cells\n\
         * Input window length (required) - window length value in the chosen units\n\
         * Output raster (required) - raster with the most occurring cell value within the square neighbourhood",
    ),
    parameters: &[
        ParameterSpec::raster_layer("INPUT", "Input raster layer"),
        ParameterSpec::choice("INPUT1", "Unit of Window Length", WINDOW_LENGTH_UNITS, 0),
        ParameterSpec::number("INPUT2", "Window length", 100.0),
        ParameterSpec::raster_destination("OUTPUT", "Window Majority Layer"),
    ],
    operation: Operation::WindowMajority,
};

/// The toolbox contents: an ordered collection of tool specifications,
/// addressable by their stable id.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<&'static ToolSpec>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        ToolRegistry::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        ToolRegistry {
            tools: vec![&ACCU_TRAVEL_TIME_FLUX, &EXP, &ORDER, &WINDOW_MAJORITY],
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static ToolSpec> + '_ {
        self.tools.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&'static ToolSpec> {
        self.tools.iter().copied().find(|tool| tool.descriptor.id == id)
    }

    pub fn require(&self, id: &str) -> Result<&'static ToolSpec> {
        self.find(id).ok_or_else(|| Error::UnknownTool(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    #[test]
    fn registry_contains_all_tools() {
        let registry = ToolRegistry::new();
        assert_eq!(registry.len(), 4);

        for id in ["accutraveltimeflux", "exp", "order", "windowmajority"] {
            assert!(registry.find(id).is_some(), "missing tool '{id}'");
        }

        assert!(registry.find("nosuchtool").is_none());
        assert!(matches!(registry.require("nosuchtool"), Err(Error::UnknownTool(_))));
    }

    #[test]
    fn descriptors_are_stable() {
        let registry = ToolRegistry::new();
        for tool in registry.iter() {
            let descriptor = registry.find(tool.descriptor.id).expect("tool is registered").descriptor;
            assert_eq!(descriptor, tool.descriptor);
            assert!(!descriptor.display_name.is_empty());
            assert!(!descriptor.group_id.is_empty());
            assert!(!descriptor.group_name.is_empty());
            assert!(!descriptor.help.is_empty());
        }
    }

    #[test]
    fn parameter_keys_are_unique_per_tool() {
        for tool in ToolRegistry::new().iter() {
            let keys: BTreeSet<&str> = tool.parameters.iter().map(|p| p.key).collect();
            assert_eq!(keys.len(), tool.parameters.len(), "duplicate key in '{}'", tool.descriptor.id);
        }
    }

    #[test]
    fn every_tool_reads_and_writes_rasters() {
        for tool in ToolRegistry::new().iter() {
            assert!(tool.raster_layers().count() >= 1);
            assert!(tool.raster_destinations().count() >= 1);
        }
    }
}
