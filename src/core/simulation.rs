use super::entities::{Entity, Household, Person, Situation};
use super::error::EvaluationError;
use super::parameters::Parameters;
use super::period::Period;
use super::taxes;
use super::variables::{EntityKind, Variable};
use rust_decimal::Decimal;
use serde::Serialize;

/// Value of one variable for one entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableResult {
    pub variable: &'static str,
    pub entity: EntityKind,
    pub id: String,
    pub period: Period,
    pub value: Decimal,
}

/// Evaluates variables over every entity of a situation.
///
/// Inputs are plain lookups into the situation; nothing is cached and no
/// period conversion happens here.
pub struct Simulation<'a, P> {
    situation: &'a Situation,
    parameters: &'a P,
}

impl<'a, P: Parameters> Simulation<'a, P> {
    pub fn new(situation: &'a Situation, parameters: &'a P) -> Self {
        Simulation {
            situation,
            parameters,
        }
    }

    pub fn calculate(
        &self,
        variable: Variable,
        period: Period,
    ) -> Result<Vec<VariableResult>, EvaluationError> {
        variable.check_period(period)?;
        let results = match variable {
            Variable::IncomeTax => self.each_person(variable, period, |p, period, params| {
                taxes::income_tax(p, period, params)
            }),
            Variable::SocialSecurityContribution => {
                self.each_person(variable, period, |p, period, params| {
                    taxes::social_security_contribution(p, period, params)
                })
            }
            Variable::Irpef => self.each_person(variable, period, |p, period, params| {
                taxes::irpef(p, period, params)
            }),
            Variable::HousingTax => self.each_household(variable, period, |h, period, params| {
                taxes::housing_tax(h, period, params)
            }),
        }?;
        log::info!(
            "Calculated {} for {} {}(s) in {}",
            variable,
            results.len(),
            variable.info().entity,
            period
        );
        Ok(results)
    }

    fn each_person<F>(
        &self,
        variable: Variable,
        period: Period,
        rule: F,
    ) -> Result<Vec<VariableResult>, EvaluationError>
    where
        F: Fn(&Entity<'a, Person>, Period, &P) -> Result<Decimal, EvaluationError>,
    {
        self.situation
            .persons()
            .map(|person| {
                let value = rule(&person, period, self.parameters)?;
                log::debug!("{} person '{}' {}: {}", variable, person.id, period, value);
                Ok(VariableResult {
                    variable: variable.name(),
                    entity: EntityKind::Person,
                    id: person.id.to_string(),
                    period,
                    value,
                })
            })
            .collect()
    }

    fn each_household<F>(
        &self,
        variable: Variable,
        period: Period,
        rule: F,
    ) -> Result<Vec<VariableResult>, EvaluationError>
    where
        F: Fn(&Entity<'a, Household>, Period, &P) -> Result<Decimal, EvaluationError>,
    {
        self.situation
            .households()
            .map(|household| {
                let value = rule(&household, period, self.parameters)?;
                log::debug!("{} household '{}' {}: {}", variable, household.id, period, value);
                Ok(VariableResult {
                    variable: variable.name(),
                    entity: EntityKind::Household,
                    id: household.id.to_string(),
                    period,
                    value,
                })
            })
            .collect()
    }
}
