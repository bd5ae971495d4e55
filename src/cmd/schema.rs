//! Schema command - print the expected situation input format

use clap::Args;
use fisco::core::{Household, InputField, Person, Situation};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema or fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the situation file
    JsonSchema,
    /// Input variables of persons and households with descriptions
    Fields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => self.print_json_schema(),
            SchemaFormat::Fields => {
                self.print_fields();
                Ok(())
            }
        }
    }

    fn print_json_schema(&self) -> anyhow::Result<()> {
        let schema = schema_for!(Situation);
        println!("{}", serde_json::to_string_pretty(&schema)?);
        Ok(())
    }

    fn print_fields(&self) {
        println!("Situation Input Format");
        println!("======================");
        print_entity("persons", Person::input_schema());
        print_entity("households", Household::input_schema());
        println!();
        println!("Periods are keyed as YYYY-MM (month) or YYYY (year).");
    }
}

fn print_entity(entity: &str, fields: &[InputField]) {
    println!();
    println!("{entity}.<id>");
    for field in fields {
        let req = if field.required { "required" } else { "optional" };
        let period = field.period.unwrap_or("-");
        println!(
            "  {:38} ({:8}, {:5})  {}",
            field.name, req, period, field.description
        );
    }
}
