//! Boolean expression minimizer for the letters grammar.
//!
//! Parses an expression such as `a'bc'+a'bc+abc'+abc`, canonicalizes it
//! to both minimal DNF and minimal CNF, and prints the results together
//! with the satisfying-assignment count.
//!
//! Run with:
//! ```bash
//! cargo run --example simplify -- "a'bc'+a'bc+abc'+abc"
//! ```

use clap::Parser;
use halfrule::acomp::Acomp;
use halfrule::rcomp::Rcomp;

#[derive(Debug, Parser)]
#[command(author, version, about = "Minimize a boolean expression in the letters grammar")]
struct Cli {
    /// Expression to minimize, e.g. "a(b+c')" or "ab+a'c"
    expr: String,

    /// Show the complement as well
    #[arg(long)]
    complement: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    simplelog::TermLogger::init(
        simplelog::LevelFilter::Info,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let cli = Cli::parse();

    let mut f = Acomp::intersection();
    f.set_string(&cli.expr)?;
    println!("input:   {}", f);
    println!("literals: {:?}", f.keys());
    println!("models:  {}", f.count_true());

    let mut dnf = f.clone();
    match dnf.make_dnf()? {
        0 => println!("DNF:     <null> (unsatisfiable)"),
        n => println!("DNF:     {}   ({} terms)", dnf, n),
    }

    let mut cnf = Rcomp::from(&f);
    match cnf.make_cnf()? {
        0 => println!("CNF:     <null> (tautology)"),
        n => println!("CNF:     {}   ({} clauses)", cnf, n),
    }

    if cli.complement {
        let mut g = f.clone();
        g.complement();
        match g.make_dnf()? {
            0 => println!("NOT:     <null> (input is a tautology)"),
            _ => println!("NOT:     {}", g),
        }
    }

    Ok(())
}
