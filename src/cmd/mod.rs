pub mod compute;
pub mod schema;
pub mod validate;
pub mod variables;

use anyhow::Context;
use fisco::core::{ParameterTree, Situation};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read a situation file (or stdin with "-")
pub fn read_situation(path: &Path) -> anyhow::Result<Situation> {
    let situation = if path.as_os_str() == "-" {
        let mut buffer = Vec::new();
        io::stdin().lock().read_to_end(&mut buffer)?;
        if buffer.is_empty() {
            anyhow::bail!("No input received. Provide a situation file or pipe one to stdin.");
        }
        Situation::from_json(buffer.as_slice())?
    } else {
        let file = File::open(path)
            .with_context(|| format!("cannot open situation file {}", path.display()))?;
        Situation::from_json(BufReader::new(file))
            .with_context(|| format!("cannot read situation file {}", path.display()))?
    };
    log::info!(
        "Read {} person(s) and {} household(s)",
        situation.persons.len(),
        situation.households.len()
    );
    Ok(situation)
}

/// Read a parameter file, falling back to the built-in parameters
pub fn read_parameters(path: Option<&Path>) -> anyhow::Result<ParameterTree> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("cannot open parameter file {}", path.display()))?;
            let tree = ParameterTree::from_json(BufReader::new(file))
                .with_context(|| format!("cannot read parameter file {}", path.display()))?;
            log::info!("Read parameters from {}", path.display());
            Ok(tree)
        }
        None => {
            log::info!("Using built-in parameters");
            Ok(ParameterTree::builtin()?)
        }
    }
}
