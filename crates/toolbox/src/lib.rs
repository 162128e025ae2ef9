//! Raster processing toolbox.
//!
//! Each tool is described by data: an identity descriptor, an ordered
//! parameter schema and the operation to run. A single generic [`Executor`]
//! interprets those descriptions, so adding a tool means adding a
//! [`ToolSpec`] entry rather than a new adapter type. The numeric operations
//! live behind the [`Engine`] trait and receive their configuration (spatial
//! frame, unit of measure) as an explicit argument per invocation.

#![warn(clippy::unwrap_used)]

mod context;
mod descriptor;
mod engine;
mod executor;
pub mod ops;
mod parameter;
mod registry;

use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Raster engine is not available")]
    EngineUnavailable,
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Missing value for parameter '{0}'")]
    MissingParameter(String),
    #[error("Invalid value for parameter '{0}': {1}")]
    InvalidParameter(String, String),
    #[error("The run was cancelled")]
    Cancelled,
    #[error(transparent)]
    Raster(#[from] raster::Error),
}

#[doc(inline)]
pub use context::Feedback;
pub use context::SilentFeedback;
#[doc(inline)]
pub use descriptor::ToolDescriptor;
#[doc(inline)]
pub use engine::Engine;
pub use engine::EngineConfig;
pub use engine::LengthUnit;
pub use engine::NativeEngine;
#[doc(inline)]
pub use executor::Executor;
pub use parameter::ParameterKind;
pub use parameter::ParameterSpec;
pub use parameter::ParameterValues;
pub use parameter::Value;
#[doc(inline)]
pub use registry::Operation;
pub use registry::ToolRegistry;
pub use registry::ToolSpec;
