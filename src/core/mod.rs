pub mod entities;
pub mod error;
pub mod parameters;
pub mod period;
pub mod scale;
pub mod simulation;
pub mod taxes;
pub mod variables;

// Flat public surface for domain types and functions.
pub use entities::{
    Entity, Household, HouseholdInputs, HousingOccupancyStatus, InputField, Person, PersonInputs,
    Situation, SituationError,
};
pub use error::EvaluationError;
pub use parameters::{ParameterError, ParameterKind, ParameterTree, ParameterValue, Parameters};
pub use period::{Period, PeriodError, PeriodUnit};
pub use scale::{Bracket, MarginalRateScale, ScaleError};
pub use simulation::{Simulation, VariableResult};
pub use taxes::{housing_tax, income_tax, irpef, social_security_contribution};
pub use variables::{EntityKind, ParameterRef, Variable, VariableInfo};
