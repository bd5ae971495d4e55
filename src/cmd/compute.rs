//! Compute command - evaluate variables over a situation for one period

use crate::cmd::{read_parameters, read_situation};
use clap::Args;
use fisco::core::{Period, Simulation, Variable, VariableResult};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ComputeCommand {
    /// JSON file with persons and households ("-" for stdin)
    #[arg(short, long)]
    situation: PathBuf,

    /// JSON parameter file (defaults to the built-in parameters)
    #[arg(short, long)]
    parameters: Option<PathBuf>,

    /// Period to evaluate: YYYY for yearly variables, YYYY-MM for monthly ones
    #[arg(short = 'P', long)]
    period: Period,

    /// Variable to compute, may be repeated (default: all variables defined for the period)
    #[arg(short, long = "variable")]
    variables: Vec<Variable>,

    /// Output as JSON instead of formatted table
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

/// Totals per variable for JSON output
#[derive(Debug, Serialize)]
struct ComputeOutput<'a> {
    period: String,
    results: &'a [VariableResult],
    totals: BTreeMap<&'static str, Decimal>,
}

impl ComputeCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let situation = read_situation(&self.situation)?;
        let parameters = read_parameters(self.parameters.as_deref())?;
        let simulation = Simulation::new(&situation, &parameters);

        let variables = self.selected_variables();
        if variables.is_empty() {
            anyhow::bail!("No variable is defined by {}", self.period.unit());
        }

        let mut results = Vec::new();
        for variable in variables {
            results.extend(simulation.calculate(variable, self.period)?);
        }

        if self.json {
            self.print_json(&results)
        } else if self.csv {
            self.write_csv(&results)
        } else {
            self.print_table(&results)
        }
    }

    fn selected_variables(&self) -> Vec<Variable> {
        if !self.variables.is_empty() {
            return self.variables.clone();
        }
        Variable::ALL
            .into_iter()
            .filter(|v| v.info().definition_period == self.period.unit())
            .collect()
    }

    fn print_table(&self, results: &[VariableResult]) -> anyhow::Result<()> {
        if results.is_empty() {
            println!("No persons or households in situation");
            return Ok(());
        }

        let rows: Vec<ResultRow> = results.iter().map(ResultRow::from).collect();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::last()).with(Alignment::right()))
            .to_string();
        println!("{}", table);

        println!();
        for (variable, total) in totals(results)? {
            println!("TOTAL {}: {}", variable, total.normalize());
        }
        Ok(())
    }

    fn print_json(&self, results: &[VariableResult]) -> anyhow::Result<()> {
        let output = ComputeOutput {
            period: self.period.to_string(),
            results,
            totals: totals(results)?,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    fn write_csv(&self, results: &[VariableResult]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for result in results {
            wtr.serialize(ResultRow::from(result))?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn totals(results: &[VariableResult]) -> anyhow::Result<BTreeMap<&'static str, Decimal>> {
    let mut totals = BTreeMap::new();
    for result in results {
        let total = totals.entry(result.variable).or_insert(Decimal::ZERO);
        *total = total.checked_add(result.value).ok_or_else(|| {
            anyhow::anyhow!(
                "Total of {} for {} does not fit in a decimal",
                result.variable,
                result.period
            )
        })?;
    }
    Ok(totals)
}

/// Row for the results table output
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct ResultRow {
    #[tabled(rename = "Variable")]
    pub variable: String,

    #[tabled(rename = "Entity")]
    pub entity: String,

    #[tabled(rename = "Id")]
    pub id: String,

    #[tabled(rename = "Period")]
    pub period: String,

    #[tabled(rename = "Value")]
    pub value: String,
}

impl From<&VariableResult> for ResultRow {
    fn from(result: &VariableResult) -> Self {
        ResultRow {
            variable: result.variable.to_string(),
            entity: result.entity.to_string(),
            id: result.id.clone(),
            period: result.period.to_string(),
            value: result.value.normalize().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fisco::core::EntityKind;
    use rust_decimal_macros::dec;

    fn result(variable: &'static str, id: &str, value: Decimal) -> VariableResult {
        VariableResult {
            variable,
            entity: EntityKind::Person,
            id: id.to_string(),
            period: Period::month(2024, 1).unwrap(),
            value,
        }
    }

    #[test]
    fn totals_group_by_variable() {
        let results = vec![
            result("income_tax", "anna", dec!(400)),
            result("income_tax", "luca", dec!(3000)),
            result("social_security_contribution", "anna", dec!(40)),
        ];
        let totals = totals(&results).unwrap();
        assert_eq!(totals["income_tax"], dec!(3400));
        assert_eq!(totals["social_security_contribution"], dec!(40));
    }

    #[test]
    fn totals_overflow_is_an_error() {
        let results = vec![
            result("housing_tax", "rossi", Decimal::MAX),
            result("housing_tax", "bianchi", Decimal::MAX),
        ];
        let err = totals(&results).unwrap_err();
        assert!(err.to_string().contains("housing_tax"));
    }

    #[test]
    fn row_trims_trailing_zeros() {
        let row = ResultRow::from(&result("income_tax", "anna", dec!(400.00)));
        assert_eq!(row.value, "400");
        assert_eq!(row.period, "2024-01");
        assert_eq!(row.entity, "person");
    }
}
