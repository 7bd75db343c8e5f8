//! Builds a default-configuration tiling, injects a handful of charges,
//! and prints a summary. No CLI arguments: this is a fixed smoke demo, not
//! a configuration front-end.

use wire_tiling::{DetectorParams, Plane, Tiling};

fn main() {
    env_logger::init();

    let tiling = Tiling::build(DetectorParams::default()).expect("default params are valid");
    log::info!(
        "built tiling: {} U wires, {} V wires, {} Y wires, {} cells",
        tiling.wires(Plane::U).len(),
        tiling.wires(Plane::V).len(),
        tiling.wires(Plane::Y).len(),
        tiling.cells().len(),
    );

    let mut tiling = tiling;
    let n = tiling.cells().len();
    for i in (0..n).step_by(7) {
        tiling.inject_charge(i, 10.0 + i as f64);
    }
    tiling.classify_hits();

    let mut real = 0;
    let mut fake = 0;
    let mut none = 0;
    for cell in tiling.cells() {
        match cell.hit_type {
            wire_tiling::HitType::Real => real += 1,
            wire_tiling::HitType::Fake => fake += 1,
            wire_tiling::HitType::None => none += 1,
        }
    }
    log::info!("classified hits: {real} real, {fake} fake, {none} none");
}
