use std::str::FromStr;

use crate::error::FilterSpecError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SizeOp {
    Less,
    Equal,
    Greater,
}

/// Parsed `-size` argument: `[+|-]N[b|k|m|g|t]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SizeFilter {
    pub op: SizeOp,
    pub bytes: u64,
}

impl SizeFilter {
    pub fn accepts(&self, size: u64) -> bool {
        match self.op {
            SizeOp::Less => size < self.bytes,
            SizeOp::Equal => size == self.bytes,
            SizeOp::Greater => size > self.bytes,
        }
    }
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    match unit.to_ascii_lowercase().as_str() {
        "" | "b" => Some(1),
        "k" => Some(1 << 10),
        "m" => Some(1 << 20),
        "g" => Some(1 << 30),
        "t" => Some(1 << 40),
        _ => None,
    }
}

impl FromStr for SizeFilter {
    type Err = FilterSpecError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| FilterSpecError::InvalidSize {
            expr: expr.to_owned(),
            reason,
        };

        if expr.is_empty() {
            return Err(invalid("size expression cannot be empty"));
        }

        let (op, rest) = match expr.as_bytes()[0] {
            b'+' => (SizeOp::Greater, &expr[1..]),
            b'-' => (SizeOp::Less, &expr[1..]),
            _ => (SizeOp::Equal, expr),
        };

        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (digits, unit) = rest.split_at(digits_end);
        if digits.is_empty() {
            return Err(invalid("size expression missing digits"));
        }

        let multiplier = unit_multiplier(unit).ok_or_else(|| invalid("invalid size unit"))?;
        let bytes = digits
            .parse::<u64>()
            .ok()
            .and_then(|n| n.checked_mul(multiplier))
            .ok_or_else(|| invalid("size is too large"))?;

        Ok(Self { op, bytes })
    }
}
