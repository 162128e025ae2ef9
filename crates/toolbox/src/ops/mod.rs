//! Native implementations of the raster operations exposed by the toolbox.

mod accutraveltime;
mod exp;
mod order;
mod windowmajority;

pub use accutraveltime::accu_travel_time;
pub use exp::exp;
pub use order::order;
pub use windowmajority::window_majority;
pub use windowmajority::window_radius_in_cells;
