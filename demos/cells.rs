//! Point membership for a cell described in the numbers grammar.
//!
//! Builds a unit box out of six axis-aligned planes, parses its cell
//! body `1 -2 3 -4 5 -6`, and classifies a handful of points against
//! the populated rule tree.
//!
//! Run with:
//! ```bash
//! cargo run --example cells
//! ```

use std::collections::HashMap;
use std::rc::Rc;

use halfrule::parser::parse;
use halfrule::surface::{Plane, Point, Surface};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    // Unit box: x in [0,1], y in [0,1], z in [0,1].
    let mut surfaces: HashMap<u32, Rc<dyn Surface>> = HashMap::new();
    surfaces.insert(1, Rc::new(Plane::x(0.0)));
    surfaces.insert(2, Rc::new(Plane::x(1.0)));
    surfaces.insert(3, Rc::new(Plane::y(0.0)));
    surfaces.insert(4, Rc::new(Plane::y(1.0)));
    surfaces.insert(5, Rc::new(Plane::z(0.0)));
    surfaces.insert(6, Rc::new(Plane::z(1.0)));

    let mut cell = parse("1 -2 3 -4 5 -6")?;
    cell.populate(&surfaces);
    println!("cell: {}", cell);
    println!("surfaces: {:?}", cell.surfaces());

    let points: &[(&str, Point)] = &[
        ("centre", [0.5, 0.5, 0.5]),
        ("on a face", [0.0, 0.5, 0.5]),
        ("on an edge", [0.0, 0.0, 0.5]),
        ("just outside", [1.0 + 1e-3, 0.5, 0.5]),
        ("far away", [10.0, 10.0, 10.0]),
    ];
    for (label, pt) in points {
        let inside = cell.is_valid(pt)?;
        println!("{:>14} {:?}: {}", label, pt, if inside { "inside" } else { "outside" });
    }

    // Excluding a surface treats both of its sides as valid, which is
    // how boundary tracking asks "would crossing surface 2 leave the
    // cell".
    let pt: Point = [1.0, 0.5, 0.5];
    println!(
        "pair_valid on surface 2 at {:?}: {:#05b}",
        pt,
        cell.pair_valid(2, &pt)?
    );

    Ok(())
}
