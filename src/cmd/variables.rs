//! Variables command - list variable metadata

use clap::Args;
use fisco::core::{Variable, VariableInfo};
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct VariablesCommand {
    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Tabled)]
struct VariableRow {
    #[tabled(rename = "Name")]
    name: &'static str,
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "Period")]
    period: String,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Parameters")]
    parameters: String,
}

impl From<&VariableInfo> for VariableRow {
    fn from(info: &VariableInfo) -> Self {
        VariableRow {
            name: info.name,
            entity: info.entity.to_string(),
            period: info.definition_period.to_string(),
            label: info.label,
            parameters: info
                .parameters
                .iter()
                .map(|p| format!("{} ({})", p.path, p.kind))
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl VariablesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let infos: Vec<&VariableInfo> = Variable::ALL.iter().map(|v| v.info()).collect();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&infos)?);
            return Ok(());
        }

        let rows: Vec<VariableRow> = infos.iter().map(|info| VariableRow::from(*info)).collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
        println!();
        for info in infos {
            println!("{}: {}", info.name, info.reference);
        }
        Ok(())
    }
}
