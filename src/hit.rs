//! Hit classifier (H): labels each cell None/Real/Fake from the charge on
//! its three bounding wires (§4.5).

use crate::cell::{is_real_wire_id, Cell, HitType};
use crate::wire::Wire;

/// Classifies a single cell in place.
///
/// - `None` if any bounding wire is virtual or carries zero charge.
/// - `Real` if the cell's own true charge is positive.
/// - `Fake` ("ghost") if all three wires carry charge but this cell does
///   not — an apparent intersection with no real energy deposit behind it.
pub fn classify(cell: &mut Cell, u_wires: &[Wire], v_wires: &[Wire], y_wires: &[Wire]) {
    let wire_charge = |id: i64, wires: &[Wire]| -> Option<f64> {
        if is_real_wire_id(id, wires.len()) {
            Some(wires[id as usize].charge)
        } else {
            None
        }
    };

    let charges = [
        wire_charge(cell.u_wire_id, u_wires),
        wire_charge(cell.v_wire_id, v_wires),
        wire_charge(cell.y_wire_id, y_wires),
    ];

    let all_bounded_and_charged = charges
        .iter()
        .all(|c| matches!(c, Some(q) if *q > 0.0));

    cell.hit_type = if !all_bounded_and_charged {
        HitType::None
    } else if cell.true_charge > 0.0 {
        HitType::Real
    } else {
        HitType::Fake
    };
}
