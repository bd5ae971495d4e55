//! Period-indexed legislative parameters.
//!
//! Rules never reach into a global table: they receive something that
//! implements [`Parameters`] and ask it for a dotted path at a period.

use super::period::Period;
use super::scale::{Bracket, MarginalRateScale, ScaleError};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::io::Read;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ParameterError {
    #[error("parameter '{path}' is not defined for period {period}")]
    NotFound { path: String, period: Period },
    #[error("parameter '{path}' is a {found}, expected a {expected}")]
    UnexpectedKind {
        path: String,
        expected: ParameterKind,
        found: ParameterKind,
    },
    #[error("period {period} has no calendar date to resolve parameter '{path}' at")]
    InvalidPeriod { path: String, period: Period },
    #[error("parameter '{path}' is not a valid scale for period {period}")]
    InvalidScale {
        path: String,
        period: Period,
        #[source]
        source: ScaleError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Value,
    Scale,
    Node,
}

impl fmt::Display for ParameterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterKind::Value => write!(f, "value"),
            ParameterKind::Scale => write!(f, "scale"),
            ParameterKind::Node => write!(f, "node"),
        }
    }
}

/// A parameter resolved for one period
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterValue {
    Value(Decimal),
    Scale(MarginalRateScale),
}

impl ParameterValue {
    pub fn kind(&self) -> ParameterKind {
        match self {
            ParameterValue::Value(_) => ParameterKind::Value,
            ParameterValue::Scale(_) => ParameterKind::Scale,
        }
    }
}

/// Access to legislative parameters by `(period, dotted path)`.
///
/// Any `Fn(Period, &str) -> Result<ParameterValue, ParameterError>` is a
/// provider, which lets callers inject fixed parameters without building a
/// tree.
pub trait Parameters {
    fn get(&self, period: Period, path: &str) -> Result<ParameterValue, ParameterError>;

    fn value(&self, period: Period, path: &str) -> Result<Decimal, ParameterError> {
        match self.get(period, path)? {
            ParameterValue::Value(value) => Ok(value),
            other => Err(ParameterError::UnexpectedKind {
                path: path.to_string(),
                expected: ParameterKind::Value,
                found: other.kind(),
            }),
        }
    }

    fn scale(&self, period: Period, path: &str) -> Result<MarginalRateScale, ParameterError> {
        match self.get(period, path)? {
            ParameterValue::Scale(scale) => Ok(scale),
            other => Err(ParameterError::UnexpectedKind {
                path: path.to_string(),
                expected: ParameterKind::Scale,
                found: other.kind(),
            }),
        }
    }
}

impl<F> Parameters for F
where
    F: Fn(Period, &str) -> Result<ParameterValue, ParameterError>,
{
    fn get(&self, period: Period, path: &str) -> Result<ParameterValue, ParameterError> {
        self(period, path)
    }
}

/// Dated values of one parameter. `None` marks the parameter as expired from
/// that date on.
pub type History = BTreeMap<NaiveDate, Option<Decimal>>;

/// Latest value dated on or before `date`
fn value_at(history: &History, date: NaiveDate) -> Option<Decimal> {
    history.range(..=date).next_back().and_then(|(_, value)| *value)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ValueNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub values: History,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BracketNode {
    pub threshold: History,
    pub rate: History,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScaleNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub brackets: Vec<BracketNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterNode {
    Scale(ScaleNode),
    Value(ValueNode),
    Branch(BTreeMap<String, ParameterNode>),
}

impl ParameterNode {
    fn kind(&self) -> ParameterKind {
        match self {
            ParameterNode::Scale(_) => ParameterKind::Scale,
            ParameterNode::Value(_) => ParameterKind::Value,
            ParameterNode::Branch(_) => ParameterKind::Node,
        }
    }
}

/// Parameter tree loaded from JSON, nested by the segments of dotted paths
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTree {
    root: BTreeMap<String, ParameterNode>,
}

impl ParameterTree {
    pub fn from_json<R: Read>(reader: R) -> Result<Self, serde_json::Error> {
        serde_json::from_reader(reader)
    }

    /// Parameters shipped with the crate
    pub fn builtin() -> Result<Self, serde_json::Error> {
        serde_json::from_str(include_str!("../../parameters/tasse.json"))
    }

    fn node(&self, path: &str) -> Option<&ParameterNode> {
        let mut segments = path.split('.');
        let mut node = self.root.get(segments.next()?)?;
        for segment in segments {
            match node {
                ParameterNode::Branch(children) => node = children.get(segment)?,
                _ => return None,
            }
        }
        Some(node)
    }

    /// Dotted paths of every value and scale in the tree
    pub fn leaf_paths(&self) -> Vec<String> {
        fn walk(prefix: &str, children: &BTreeMap<String, ParameterNode>, out: &mut Vec<String>) {
            for (name, node) in children {
                let path = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix}.{name}")
                };
                match node {
                    ParameterNode::Branch(grandchildren) => walk(&path, grandchildren, out),
                    _ => out.push(path),
                }
            }
        }
        let mut out = Vec::new();
        walk("", &self.root, &mut out);
        out
    }
}

impl Parameters for ParameterTree {
    fn get(&self, period: Period, path: &str) -> Result<ParameterValue, ParameterError> {
        let not_found = || ParameterError::NotFound {
            path: path.to_string(),
            period,
        };
        let instant = period.start().ok_or_else(|| ParameterError::InvalidPeriod {
            path: path.to_string(),
            period,
        })?;

        match self.node(path).ok_or_else(not_found)? {
            ParameterNode::Value(node) => value_at(&node.values, instant)
                .map(ParameterValue::Value)
                .ok_or_else(not_found),
            ParameterNode::Scale(node) => {
                // Brackets not yet (or no longer) in force at the instant are dropped
                let brackets: Vec<Bracket> = node
                    .brackets
                    .iter()
                    .filter_map(|b| {
                        Some(Bracket {
                            threshold: value_at(&b.threshold, instant)?,
                            rate: value_at(&b.rate, instant)?,
                        })
                    })
                    .collect();
                if brackets.is_empty() {
                    return Err(not_found());
                }
                log::trace!("resolved scale '{}' at {} with {} brackets", path, instant, brackets.len());
                MarginalRateScale::new(brackets)
                    .map(ParameterValue::Scale)
                    .map_err(|source| ParameterError::InvalidScale {
                        path: path.to_string(),
                        period,
                        source,
                    })
            }
            branch @ ParameterNode::Branch(_) => Err(ParameterError::UnexpectedKind {
                path: path.to_string(),
                expected: ParameterKind::Value,
                found: branch.kind(),
            }),
        }
    }
}
