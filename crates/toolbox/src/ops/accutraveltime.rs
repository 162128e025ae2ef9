use raster::{Cell, DenseRaster, Error};

use crate::Result;

const SQRT_2: f64 = std::f64::consts::SQRT_2;

/// Transports material downstream over a distance dependent on the velocity.
///
/// The flow direction raster uses the keypad encoding: 1..9 excluding 5 point
/// at the downstream neighbor, 5 marks a pit. Each cell's material travels
/// along the drainage network for one time step; crossing into the next cell
/// costs `distance / velocity` of the remaining time budget, where distance
/// is the cell size (diagonal hops cost sqrt(2) times more). Material that
/// runs out of budget, reaches a pit or reaches the edge of the defined
/// network comes to rest.
///
/// Returns the flux raster (material that left each cell during the step) and
/// the state raster (material at rest in each cell after the step), both from
/// the one traversal of the shared input triple. Cells without a valid flow
/// direction are nodata in both outputs.
pub fn accu_travel_time(
    flow_direction: &DenseRaster<u8>,
    material: &DenseRaster<f64>,
    velocity: &DenseRaster<f64>,
    cell_size: f64,
) -> Result<(DenseRaster<f64>, DenseRaster<f64>)> {
    if flow_direction.size() != material.size() || flow_direction.size() != velocity.size() {
        return Err(Error::SizeMismatch {
            size1: flow_direction.size(),
            size2: if flow_direction.size() != material.size() {
                material.size()
            } else {
                velocity.size()
            },
        }
        .into());
    }

    if cell_size <= 0.0 {
        return Err(Error::InvalidArgument(format!("Cell size must be positive, got {cell_size}")).into());
    }

    let geo = flow_direction.geo_reference().clone();
    let mut flux = DenseRaster::<f64>::zeros(geo.clone());
    let mut state = DenseRaster::<f64>::zeros(geo);

    for cell in flow_direction.cells() {
        if downstream_code(flow_direction, cell).is_none() {
            flux.set_cell_value(cell, None);
            state.set_cell_value(cell, None);
        }
    }

    for cell in flow_direction.cells() {
        if downstream_code(flow_direction, cell).is_none() {
            continue;
        }

        let amount = match material.cell_value(cell) {
            Some(amount) if amount > 0.0 => amount,
            _ => continue,
        };

        let rest = transport(flow_direction, velocity, cell, cell_size, &mut flux, amount);
        if let Some(stored) = state.cell_value(rest) {
            state.set_cell_value(rest, Some(stored + amount));
        } else {
            state.set_cell_value(rest, Some(amount));
        }
    }

    Ok((flux, state))
}

/// Walks one parcel of material downstream within a unit time budget and
/// returns the cell where it comes to rest. The flux of every cell the parcel
/// leaves is incremented by the parcel amount.
fn transport(
    flow_direction: &DenseRaster<u8>,
    velocity: &DenseRaster<f64>,
    start: Cell,
    cell_size: f64,
    flux: &mut DenseRaster<f64>,
    amount: f64,
) -> Cell {
    let mut budget = 1.0;
    let mut current = start;

    loop {
        let Some(code) = downstream_code(flow_direction, current) else {
            return current;
        };

        let Some((next, diagonal)) = downstream_cell(current, code) else {
            // pit
            return current;
        };

        if !flow_direction.contains_cell(next) || downstream_code(flow_direction, next).is_none() {
            // the drainage network ends here, the material comes to rest
            return current;
        }

        let speed = velocity.cell_value(current).unwrap_or(0.0);
        if speed <= 0.0 {
            return current;
        }

        let distance = if diagonal { cell_size * SQRT_2 } else { cell_size };
        let travel_time = distance / speed;
        if budget < travel_time {
            return current;
        }

        budget -= travel_time;
        if let Some(outflow) = flux.cell_value(current) {
            flux.set_cell_value(current, Some(outflow + amount));
        }

        current = next;
    }
}

fn downstream_code(flow_direction: &DenseRaster<u8>, cell: Cell) -> Option<u8> {
    match flow_direction.cell_value(cell) {
        Some(code) if (1..=9).contains(&code) => Some(code),
        _ => None,
    }
}

/// The downstream neighbor for a keypad flow direction code, together with
/// whether the hop is diagonal. Code 5 is a pit and has no downstream cell.
fn downstream_cell(cell: Cell, code: u8) -> Option<(Cell, bool)> {
    let (d_row, d_col) = match code {
        1 => (1, -1),
        2 => (1, 0),
        3 => (1, 1),
        4 => (0, -1),
        6 => (0, 1),
        7 => (-1, -1),
        8 => (-1, 0),
        9 => (-1, 1),
        _ => return None,
    };

    Some((cell.offset(d_row, d_col), (d_row != 0) && (d_col != 0)))
}
