use super::error::EvaluationError;
use super::parameters::{ParameterError, ParameterKind, Parameters};
use super::period::{Period, PeriodUnit};
use super::taxes::{IRPEF_BRACKET_RATES, INCOME_TAX_RATE, SOCIAL_SECURITY_SCALE};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Person,
    Household,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Person => write!(f, "person"),
            EntityKind::Household => write!(f, "household"),
        }
    }
}

/// A parameter a variable reads, with the kind it expects at that path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParameterRef {
    pub path: &'static str,
    pub kind: ParameterKind,
}

/// Declared metadata of a variable. Label and reference are documentation
/// only and never affect computation.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct VariableInfo {
    pub name: &'static str,
    pub entity: EntityKind,
    pub definition_period: PeriodUnit,
    pub label: &'static str,
    pub reference: &'static str,
    pub parameters: &'static [ParameterRef],
}

/// Computed variables provided by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    IncomeTax,
    SocialSecurityContribution,
    HousingTax,
    Irpef,
}

const INCOME_TAX: VariableInfo = VariableInfo {
    name: "income_tax",
    entity: EntityKind::Person,
    definition_period: PeriodUnit::Month,
    label: "Imposta sul reddito",
    reference: "https://law.gov.example/income_tax",
    parameters: &[ParameterRef {
        path: INCOME_TAX_RATE,
        kind: ParameterKind::Value,
    }],
};

const SOCIAL_SECURITY_CONTRIBUTION: VariableInfo = VariableInfo {
    name: "social_security_contribution",
    entity: EntityKind::Person,
    definition_period: PeriodUnit::Month,
    label: "Contributo progressivo pagato sui salari per finanziare la previdenza sociale",
    reference: "https://law.gov.example/social_security_contribution",
    parameters: &[ParameterRef {
        path: SOCIAL_SECURITY_SCALE,
        kind: ParameterKind::Scale,
    }],
};

const HOUSING_TAX: VariableInfo = VariableInfo {
    name: "housing_tax",
    entity: EntityKind::Household,
    definition_period: PeriodUnit::Year,
    label: "Imposta pagata da ogni famiglia proporzionalmente alle dimensioni del suo alloggio",
    reference: "https://law.gov.example/housing_tax",
    parameters: &[],
};

const IRPEF: VariableInfo = VariableInfo {
    name: "irpef",
    entity: EntityKind::Person,
    definition_period: PeriodUnit::Year,
    label: "Imposta sul reddito delle persone fisiche",
    reference: "http://www.agenziaentrate.gov.it/wps/file/Nsilib/Nsi/Schede/Dichiarazioni/Redditi+Persone+fisiche+2018/Modello+e+istruzioni+Redditi+PF2018/Istruzioni+Redditi+Pf+-+Fascicolo+1+2018/PF1_istruzioni_2018_Ret.pdf",
    parameters: &[ParameterRef {
        path: IRPEF_BRACKET_RATES,
        kind: ParameterKind::Value,
    }],
};

impl Variable {
    pub const ALL: [Variable; 4] = [
        Variable::IncomeTax,
        Variable::SocialSecurityContribution,
        Variable::HousingTax,
        Variable::Irpef,
    ];

    pub fn info(self) -> &'static VariableInfo {
        match self {
            Variable::IncomeTax => &INCOME_TAX,
            Variable::SocialSecurityContribution => &SOCIAL_SECURITY_CONTRIBUTION,
            Variable::HousingTax => &HOUSING_TAX,
            Variable::Irpef => &IRPEF,
        }
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// The host converts between granularities; a rule only accepts its own
    pub fn check_period(self, period: Period) -> Result<(), EvaluationError> {
        let expected = self.info().definition_period;
        if period.unit() != expected {
            return Err(EvaluationError::PeriodMismatch {
                variable: self.name(),
                expected,
                actual: period,
            });
        }
        Ok(())
    }

    pub fn overflow(self, period: Period) -> EvaluationError {
        EvaluationError::Overflow {
            variable: self.name(),
            period,
        }
    }

    /// Periods of this variable's granularity that overlap `period`
    pub fn periods_within(self, period: Period) -> Vec<Period> {
        match (self.info().definition_period, period) {
            (PeriodUnit::Month, Period::Year(year)) => {
                (1..=12).map(|month| Period::Month { year, month }).collect()
            }
            (PeriodUnit::Year, Period::Month { year, .. }) => vec![Period::Year(year)],
            _ => vec![period],
        }
    }

    /// Resolve every parameter this variable reads, for each period of its
    /// granularity overlapping `period`, and collect the failures
    pub fn check_parameters(
        self,
        parameters: &impl Parameters,
        period: Period,
    ) -> Vec<ParameterError> {
        let mut errors = Vec::new();
        for parameter in self.info().parameters {
            for period in self.periods_within(period) {
                let resolved = match parameter.kind {
                    ParameterKind::Scale => parameters.scale(period, parameter.path).map(|_| ()),
                    _ => parameters.value(period, parameter.path).map(|_| ()),
                };
                if let Err(err) = resolved {
                    errors.push(err);
                }
            }
        }
        errors
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = EvaluationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variable::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| EvaluationError::UnknownVariable(s.to_string()))
    }
}
