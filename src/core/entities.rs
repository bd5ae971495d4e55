use super::error::EvaluationError;
use super::period::Period;
use fisco_derive::InputSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Read;

/// Description of one input variable, generated by `#[derive(InputSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub name: &'static str,
    pub required: bool,
    pub period: Option<&'static str>,
    pub description: &'static str,
}

/// How a household occupies its main residence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HousingOccupancyStatus {
    Tenant,
    Owner,
    FreeLodger,
    Homeless,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, InputSchema)]
pub struct Person {
    /// Income from dependent employment, keyed by month (YYYY-MM)
    #[input(period = "month")]
    #[serde(default)]
    #[schemars(with = "BTreeMap<String, f64>")]
    pub annual_dependent_employment_income: BTreeMap<Period, Decimal>,
    /// Total gross income, keyed by year (YYYY)
    #[input(period = "year")]
    #[serde(default)]
    #[schemars(with = "BTreeMap<String, f64>")]
    pub gross_total_annual_income: BTreeMap<Period, Decimal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, InputSchema)]
pub struct Household {
    /// Ids of the persons living in the household
    #[serde(default)]
    pub members: Vec<String>,
    /// Size of the accommodation in square metres, keyed by month (YYYY-MM)
    #[input(period = "month")]
    #[serde(default)]
    #[schemars(with = "BTreeMap<String, f64>")]
    pub accommodation_size: BTreeMap<Period, Decimal>,
    /// Occupancy status (tenant, owner, free_lodger, homeless), keyed by month (YYYY-MM)
    #[input(period = "month")]
    #[serde(default)]
    #[schemars(with = "BTreeMap<String, HousingOccupancyStatus>")]
    pub housing_occupancy_status: BTreeMap<Period, HousingOccupancyStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum SituationError {
    #[error("invalid situation file")]
    Json(#[from] serde_json::Error),
    #[error("household '{household}' lists unknown member '{person}'")]
    UnknownMember { household: String, person: String },
}

/// Persons and households with their input values, as supplied by the host
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Situation {
    /// Persons by id
    #[serde(default)]
    pub persons: BTreeMap<String, Person>,
    /// Households by id
    #[serde(default)]
    pub households: BTreeMap<String, Household>,
}

impl Situation {
    pub fn from_json<R: Read>(reader: R) -> Result<Self, SituationError> {
        let situation: Situation = serde_json::from_reader(reader)?;
        situation.check_members()?;
        Ok(situation)
    }

    fn check_members(&self) -> Result<(), SituationError> {
        for (household, data) in &self.households {
            if let Some(person) = data.members.iter().find(|p| !self.persons.contains_key(*p)) {
                return Err(SituationError::UnknownMember {
                    household: household.clone(),
                    person: person.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn persons(&self) -> impl Iterator<Item = Entity<'_, Person>> {
        self.persons.iter().map(|(id, data)| Entity { id, data })
    }

    pub fn households(&self) -> impl Iterator<Item = Entity<'_, Household>> {
        self.households.iter().map(|(id, data)| Entity { id, data })
    }
}

/// An identified entity borrowed from a situation
#[derive(Debug, Clone, Copy)]
pub struct Entity<'a, T> {
    pub id: &'a str,
    pub data: &'a T,
}

/// Person-scoped input lookups
pub trait PersonInputs {
    fn annual_dependent_employment_income(&self, period: Period) -> Result<Decimal, EvaluationError>;
    fn gross_total_annual_income(&self, period: Period) -> Result<Decimal, EvaluationError>;
}

/// Household-scoped input lookups
pub trait HouseholdInputs {
    fn accommodation_size(&self, period: Period) -> Result<Decimal, EvaluationError>;
    fn housing_occupancy_status(
        &self,
        period: Period,
    ) -> Result<HousingOccupancyStatus, EvaluationError>;
}

fn lookup<V: Copy>(
    values: &BTreeMap<Period, V>,
    period: Period,
    entity: &'static str,
    id: &str,
    variable: &'static str,
) -> Result<V, EvaluationError> {
    values
        .get(&period)
        .copied()
        .ok_or_else(|| EvaluationError::MissingInput {
            entity,
            id: id.to_string(),
            variable,
            period,
        })
}

impl PersonInputs for Entity<'_, Person> {
    fn annual_dependent_employment_income(&self, period: Period) -> Result<Decimal, EvaluationError> {
        lookup(
            &self.data.annual_dependent_employment_income,
            period,
            "person",
            self.id,
            "annual_dependent_employment_income",
        )
    }

    fn gross_total_annual_income(&self, period: Period) -> Result<Decimal, EvaluationError> {
        lookup(
            &self.data.gross_total_annual_income,
            period,
            "person",
            self.id,
            "gross_total_annual_income",
        )
    }
}

impl HouseholdInputs for Entity<'_, Household> {
    fn accommodation_size(&self, period: Period) -> Result<Decimal, EvaluationError> {
        lookup(
            &self.data.accommodation_size,
            period,
            "household",
            self.id,
            "accommodation_size",
        )
    }

    fn housing_occupancy_status(
        &self,
        period: Period,
    ) -> Result<HousingOccupancyStatus, EvaluationError> {
        lookup(
            &self.data.housing_occupancy_status,
            period,
            "household",
            self.id,
            "housing_occupancy_status",
        )
    }
}
