//! Tax rules. Each rule is a pure function of resolved inputs and the
//! parameters in force for the period; errors from either are returned as-is.

use super::entities::{HouseholdInputs, HousingOccupancyStatus, PersonInputs};
use super::error::EvaluationError;
use super::parameters::Parameters;
use super::period::Period;
use super::variables::Variable;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

pub const INCOME_TAX_RATE: &str = "tasse.aliquota_IRPEF";
pub const SOCIAL_SECURITY_SCALE: &str = "tasse.contributo_sicurezza_sociale";
pub const IRPEF_BRACKET_RATES: &str = "tasse.IRPEF.aliquote_scaglioni_IRPEF";

/// Housing tax per square metre for an owned or rented residence
const HOUSING_TAX_PER_SQUARE_METRE: Decimal = dec!(10);

/// Flat-rate tax on a month of dependent-employment income
pub fn income_tax(
    person: &impl PersonInputs,
    period: Period,
    parameters: &impl Parameters,
) -> Result<Decimal, EvaluationError> {
    Variable::IncomeTax.check_period(period)?;
    let income = person.annual_dependent_employment_income(period)?;
    let rate = parameters.value(period, INCOME_TAX_RATE)?;
    income
        .checked_mul(rate)
        .ok_or_else(|| Variable::IncomeTax.overflow(period))
}

/// Social security contribution: the marginal scale applied to the month's
/// dependent-employment income
pub fn social_security_contribution(
    person: &impl PersonInputs,
    period: Period,
    parameters: &impl Parameters,
) -> Result<Decimal, EvaluationError> {
    Variable::SocialSecurityContribution.check_period(period)?;
    let salary = person.annual_dependent_employment_income(period)?;
    let scale = parameters.scale(period, SOCIAL_SECURITY_SCALE)?;
    scale
        .calc(salary)
        .ok_or_else(|| Variable::SocialSecurityContribution.overflow(period))
}

/// `(owner, tenant)` multipliers. Owner and tenant are distinct variants, so
/// at most one of the two is ever 1.
fn occupancy_multipliers(status: HousingOccupancyStatus) -> (Decimal, Decimal) {
    match status {
        HousingOccupancyStatus::Owner => (Decimal::ONE, Decimal::ZERO),
        HousingOccupancyStatus::Tenant => (Decimal::ZERO, Decimal::ONE),
        HousingOccupancyStatus::FreeLodger | HousingOccupancyStatus::Homeless => {
            (Decimal::ZERO, Decimal::ZERO)
        }
    }
}

/// Yearly housing tax, due only when the household owns or rents its main
/// residence. Size and status are read in the first month of the year so
/// that changes during the year do not affect the amount.
pub fn housing_tax(
    household: &impl HouseholdInputs,
    period: Period,
    _parameters: &impl Parameters,
) -> Result<Decimal, EvaluationError> {
    Variable::HousingTax.check_period(period)?;
    let january = period.first_month();
    let accommodation_size = household.accommodation_size(january)?;
    let status = household.housing_occupancy_status(january)?;
    let (owner, tenant) = occupancy_multipliers(status);
    (owner + tenant)
        .checked_mul(accommodation_size)
        .and_then(|taxed| taxed.checked_mul(HOUSING_TAX_PER_SQUARE_METRE))
        .ok_or_else(|| Variable::HousingTax.overflow(period))
}

/// Personal income tax (IRPEF), partial: gross total income times the
/// bracket-rate parameter, used as a flat rate.
///
/// This is not the legal computation and callers must not read it as net
/// IRPEF.
// TODO: subtract deductible charges, compute gross IRPEF on the bracket scale,
// then apply tax credits to reach net IRPEF.
pub fn irpef(
    person: &impl PersonInputs,
    period: Period,
    parameters: &impl Parameters,
) -> Result<Decimal, EvaluationError> {
    Variable::Irpef.check_period(period)?;
    let gross_taxable_base = person.gross_total_annual_income(period)?;
    let rate = parameters.value(period, IRPEF_BRACKET_RATES)?;
    gross_taxable_base
        .checked_mul(rate)
        .ok_or_else(|| Variable::Irpef.overflow(period))
}
