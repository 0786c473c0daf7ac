use matsim::base::{ParamUniaxial, Settings};
use matsim::material::{new_uniaxial, PathRecord, StrainPath};
use serde::Deserialize;
use std::error::Error;
use std::fs;
use structopt::StructOpt;
use tracing::info;

/// Command line options
#[derive(StructOpt, Debug)]
#[structopt(
    name = "matsim_driver",
    about = "Drives a uniaxial material along a strain path given in a JSON file"
)]
struct Options {
    /// Path to the JSON input file
    input: String,

    /// Output format: table or json
    #[structopt(long, default_value = "table")]
    output: String,

    /// Prints the log messages of the materials
    #[structopt(short, long)]
    verbose: bool,
}

/// Holds the contents of the input file
#[derive(Deserialize)]
struct Input {
    /// Material parameters
    material: ParamUniaxial,

    /// Optional settings (defaults are used if missing)
    settings: Option<Settings>,

    /// Strain states
    strains: Vec<f64>,

    /// Optional time increment used to compute strain rates
    time_step: Option<f64>,
}

fn print_table(records: &[PathRecord]) {
    println!("{:>6} {:>14} {:>14} {:>14} {:>14}", "step", "strain", "strain_rate", "stress", "tangent");
    for (i, r) in records.iter().enumerate() {
        println!(
            "{:>6} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e}",
            i + 1,
            r.strain,
            r.strain_rate,
            r.stress,
            r.tangent
        );
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // parse options
    let options = Options::from_args();
    if options.verbose {
        tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();
    }
    if options.output != "table" && options.output != "json" {
        return Err("output must be table or json".into());
    }

    // load data
    let contents = fs::read_to_string(&options.input)?;
    let input: Input = serde_json::from_str(&contents)?;
    let settings = match input.settings {
        Some(settings) => {
            settings.validate()?;
            settings
        }
        None => Settings::new(),
    };

    // allocate material and path
    let mut material = new_uniaxial(1, &input.material, &settings)?;
    let mut path = StrainPath::new(&input.strains);
    if let Some(dt) = input.time_step {
        path.set_time_step(dt)?;
    }
    info!(kind = material.kind().name(), steps = path.strains.len(), "following strain path");

    // run
    let records = path.follow(material.as_mut())?;
    if options.output == "json" {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print_table(&records);
    }
    Ok(())
}
