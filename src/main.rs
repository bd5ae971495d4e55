use clap::{Parser, Subcommand};

mod cmd;

#[derive(Parser, Debug)]
#[command(
    name = "fisco",
    version,
    about = "Italian tax rules: income tax, social security contribution, housing tax and IRPEF"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute tax variables for the persons and households of a situation
    Compute(cmd::compute::ComputeCommand),
    /// List the variables with their metadata and parameters
    Variables(cmd::variables::VariablesCommand),
    /// Print the expected situation input format
    Schema(cmd::schema::SchemaCommand),
    /// Check that every parameter the variables need is defined for a period
    Validate(cmd::validate::ValidateCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Compute(command) => command.exec(),
        Command::Variables(command) => command.exec(),
        Command::Schema(command) => command.exec(),
        Command::Validate(command) => command.exec(),
    }
}
