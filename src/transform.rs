//! Size-variable transforms.
//!
//! A [`TransformPipeline`] is an ordered list of unary steps applied to every
//! Z value before it becomes a marker area. The same steps, in the same
//! order, build the human-readable label shown in the legend.

use crate::error::{BubbleError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformOp {
    Add,
    Mul,
    Pow,
    Log,
    Exp,
}

impl FromStr for TransformOp {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "add" => Ok(TransformOp::Add),
            "mul" => Ok(TransformOp::Mul),
            "pow" => Ok(TransformOp::Pow),
            "log" => Ok(TransformOp::Log),
            "exp" => Ok(TransformOp::Exp),
            _ => Err(()),
        }
    }
}

impl fmt::Display for TransformOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformOp::Add => "add",
            TransformOp::Mul => "mul",
            TransformOp::Pow => "pow",
            TransformOp::Log => "log",
            TransformOp::Exp => "exp",
        };
        f.write_str(name)
    }
}

/// One parsed step: an operation and its operand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformStep {
    pub op: TransformOp,
    pub value: f64,
}

impl TransformStep {
    pub fn apply(&self, x: f64) -> f64 {
        let v = self.value;
        match self.op {
            TransformOp::Add => x + v,
            TransformOp::Mul => v * x,
            TransformOp::Pow => x.powf(v),
            TransformOp::Log => x.ln() / v.ln(),
            TransformOp::Exp => v.powf(x),
        }
    }

    pub fn label(&self, x: &str) -> String {
        let v = self.value;
        match self.op {
            TransformOp::Add => format!("{}+{}", x, v),
            TransformOp::Mul => format!("({})·{}", x, v),
            TransformOp::Pow => format!("({})^{}", x, v),
            TransformOp::Log => format!("log_{}({})", v, x),
            TransformOp::Exp => format!("{}^{}", v, x),
        }
    }
}

/// Left-to-right composition of [`TransformStep`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformPipeline {
    steps: Vec<TransformStep>,
}

impl TransformPipeline {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Build from `(operation, value)` text pairs in declaration order.
    ///
    /// Every pair is validated up front; the first bad one is returned.
    pub fn build<O, V>(pairs: &[(O, V)]) -> Result<Self>
    where
        O: AsRef<str>,
        V: AsRef<str>,
    {
        let steps = pairs
            .iter()
            .map(|(op, value)| parse_step(op.as_ref(), value.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { steps })
    }

    pub fn steps(&self) -> &[TransformStep] {
        &self.steps
    }

    pub fn is_identity(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step to `x`, first-declared first
    pub fn apply(&self, x: f64) -> f64 {
        self.steps.iter().fold(x, |acc, step| step.apply(acc))
    }

    /// Label for a variable named `name`, composed in the same order as [`apply`](Self::apply)
    pub fn label(&self, name: &str) -> String {
        self.steps
            .iter()
            .fold(name.to_string(), |acc, step| step.label(&acc))
    }
}

fn parse_step(op: &str, value: &str) -> Result<TransformStep> {
    let invalid = |reason: &str| BubbleError::InvalidTransform {
        op: op.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let parsed_op = op
        .trim()
        .parse::<TransformOp>()
        .map_err(|_| invalid("unknown operation (expected add, mul, pow, log or exp)"))?;
    let parsed_value = value
        .trim()
        .parse::<f64>()
        .map_err(|_| invalid("value is not a number"))?;

    Ok(TransformStep {
        op: parsed_op,
        value: parsed_value,
    })
}
