//! Typed parameter schemas for driving a deconvolution run.
//!
//! A schema declares each parameter's name, type, and default once; values
//! arriving from a UI or config file are parsed and validated against it
//! before the run sees them.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::warn;

/// Parameter validation and parsing failures.
#[derive(Debug, Error, PartialEq)]
pub enum ParamError {
    /// No parameter with this name in the schema.
    #[error("unknown parameter {0:?}")]
    Unknown(String),
    /// A parameter with this name is already declared.
    #[error("parameter {0:?} already declared")]
    Duplicate(String),
    /// The value's variant does not match the declared type.
    #[error("parameter {name:?} expects {expected}, got {value:?}")]
    TypeMismatch {
        /// Parameter name.
        name: String,
        /// Human-readable expected type.
        expected: &'static str,
        /// The offending value.
        value: ParamValue,
    },
    /// The value is the right type but outside the declared range.
    #[error("parameter {name:?} out of range: {value:?}")]
    OutOfRange {
        /// Parameter name.
        name: String,
        /// The offending value.
        value: ParamValue,
    },
    /// The textual input could not be parsed as the declared type.
    #[error("parameter {name:?}: cannot parse {input:?}")]
    ParseFailed {
        /// Parameter name.
        name: String,
        /// The offending input.
        input: String,
    },
}

/// Declared type of a parameter, with its validity range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// Any integer.
    Integer,
    /// Integer of at least one.
    PositiveInteger,
    /// Any finite real.
    Real,
    /// Finite real in `0.0..=1.0`.
    UnitReal,
    /// Boolean flag.
    Bool,
}

impl ParamType {
    fn expected(self) -> &'static str {
        match self {
            Self::Integer | Self::PositiveInteger => "an integer",
            Self::Real | Self::UnitReal => "a real",
            Self::Bool => "a bool",
        }
    }

    fn in_range(self, value: &ParamValue) -> bool {
        // Variant mismatches are reported as type errors, not range errors.
        match (self, value) {
            (Self::PositiveInteger, ParamValue::Integer(i)) => *i >= 1,
            (Self::Real, ParamValue::Real(r)) => r.is_finite(),
            (Self::UnitReal, ParamValue::Real(r)) => (0.0..=1.0).contains(r),
            _ => true,
        }
    }

    fn matches_variant(self, value: &ParamValue) -> bool {
        matches!(
            (self, value),
            (Self::Integer | Self::PositiveInteger, ParamValue::Integer(_))
                | (Self::Real | Self::UnitReal, ParamValue::Real(_))
                | (Self::Bool, ParamValue::Bool(_))
        )
    }
}

/// A parameter value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    /// Integer value.
    Integer(i64),
    /// Real value.
    Real(f64),
    /// Boolean value.
    Bool(bool),
}

impl ParamValue {
    /// The integer payload, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The real payload; integers widen to reals.
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Self::Real(r) => Some(*r),
            Self::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The boolean payload, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }
}

/// Declaration of one parameter.
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Declared type.
    pub ty: ParamType,
    /// Default value; must satisfy `ty`.
    pub default: ParamValue,
}

impl ParamSpec {
    /// Declare a parameter.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        ty: ParamType,
        default: ParamValue,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            ty,
            default,
        }
    }
}

/// Ordered set of parameter declarations.
#[derive(Debug, Clone, Default)]
pub struct ParamSchema {
    specs: IndexMap<String, ParamSpec>,
}

impl ParamSchema {
    /// Create an empty schema.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a parameter, rejecting duplicates and invalid defaults.
    pub fn register(&mut self, spec: ParamSpec) -> Result<(), ParamError> {
        if self.specs.contains_key(&spec.name) {
            return Err(ParamError::Duplicate(spec.name));
        }
        self.check(&spec.name, spec.ty, spec.default)?;
        self.specs.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Access a declaration by name.
    pub fn spec(&self, name: &str) -> Option<&ParamSpec> {
        self.specs.get(name)
    }

    /// Declarations in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &ParamSpec> {
        self.specs.values()
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Check whether the schema is empty.
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// A parameter set holding every declared default.
    pub fn defaults(&self) -> ParamSet {
        ParamSet {
            values: self
                .specs
                .iter()
                .map(|(name, spec)| (name.clone(), spec.default))
                .collect(),
        }
    }

    /// Validate one value against its declaration.
    pub fn validate(&self, name: &str, value: ParamValue) -> Result<(), ParamError> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        self.check(name, spec.ty, value)
    }

    /// Parse a textual value as the declared type and validate it.
    pub fn parse(&self, name: &str, input: &str) -> Result<ParamValue, ParamError> {
        let spec = self
            .specs
            .get(name)
            .ok_or_else(|| ParamError::Unknown(name.to_string()))?;
        let trimmed = input.trim();
        let parse_failed = || ParamError::ParseFailed {
            name: name.to_string(),
            input: input.to_string(),
        };
        let value = match spec.ty {
            ParamType::Integer | ParamType::PositiveInteger => {
                ParamValue::Integer(trimmed.parse().map_err(|_| parse_failed())?)
            }
            ParamType::Real | ParamType::UnitReal => {
                ParamValue::Real(trimmed.parse().map_err(|_| parse_failed())?)
            }
            ParamType::Bool => ParamValue::Bool(trimmed.parse().map_err(|_| parse_failed())?),
        };
        self.check(name, spec.ty, value)?;
        Ok(value)
    }

    fn check(&self, name: &str, ty: ParamType, value: ParamValue) -> Result<(), ParamError> {
        if !ty.matches_variant(&value) {
            warn!(param = name, ?value, "parameter value has the wrong type");
            return Err(ParamError::TypeMismatch {
                name: name.to_string(),
                expected: ty.expected(),
                value,
            });
        }
        if !ty.in_range(&value) {
            warn!(param = name, ?value, "parameter value out of range");
            return Err(ParamError::OutOfRange {
                name: name.to_string(),
                value,
            });
        }
        Ok(())
    }
}

/// Named parameter values, validated against a [`ParamSchema`].
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    values: IndexMap<String, ParamValue>,
}

impl ParamSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a value, replacing any previous one.
    pub fn set(&mut self, name: impl Into<String>, value: ParamValue) {
        self.values.insert(name.into(), value);
    }

    /// Access a value by name.
    pub fn get(&self, name: &str) -> Option<ParamValue> {
        self.values.get(name).copied()
    }

    /// Integer value of a parameter, if present and integral.
    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(|value| value.as_integer())
    }

    /// Real value of a parameter; integers widen.
    pub fn real(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(|value| value.as_real())
    }

    /// Boolean value of a parameter, if present and boolean.
    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(|value| value.as_bool())
    }

    /// Stored values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Check every stored value against a schema; unknown names are errors.
    pub fn validate_against(&self, schema: &ParamSchema) -> Result<(), ParamError> {
        for (name, value) in &self.values {
            schema.validate(name, *value)?;
        }
        Ok(())
    }
}

/// The parameter schema of the CLEAN deconvolution loop.
pub fn deconv_schema() -> ParamSchema {
    let mut schema = ParamSchema::new();
    let specs = [
        ParamSpec::new(
            "n_iter",
            "maximum number of iterations",
            ParamType::PositiveInteger,
            ParamValue::Integer(10),
        ),
        ParamSpec::new(
            "adaptive_threshold_flag",
            "derive the stopping threshold from the residual statistics",
            ParamType::Bool,
            ParamValue::Bool(true),
        ),
        ParamSpec::new(
            "threshold",
            "fixed stopping threshold as a fraction of the peak",
            ParamType::UnitReal,
            ParamValue::Real(0.3),
        ),
        ParamSpec::new(
            "loop_gain",
            "fraction of the peak subtracted per iteration",
            ParamType::UnitReal,
            ParamValue::Real(0.1),
        ),
        ParamSpec::new(
            "rms_frac_threshold",
            "stop when the residual rms falls below this fraction of its start",
            ParamType::UnitReal,
            ParamValue::Real(1e-2),
        ),
        ParamSpec::new(
            "fabs_frac_threshold",
            "stop when the residual peak falls below this fraction of its start",
            ParamType::UnitReal,
            ParamValue::Real(1e-2),
        ),
        ParamSpec::new(
            "clean_beam_sigma",
            "gaussian sigma of the restoring beam, zero to skip restoration",
            ParamType::Real,
            ParamValue::Real(0.0),
        ),
        ParamSpec::new(
            "add_residual_flag",
            "add the final residual back onto the restored map",
            ParamType::Bool,
            ParamValue::Bool(false),
        ),
    ];
    for spec in specs {
        // Names are distinct literals and defaults satisfy their types.
        if let Err(err) = schema.register(spec) {
            unreachable!("deconvolution schema is self-consistent: {err}");
        }
    }
    schema
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_declared_parameter() {
        let schema = deconv_schema();
        let defaults = schema.defaults();
        assert_eq!(schema.len(), 8);
        for spec in schema.specs() {
            assert_eq!(defaults.get(&spec.name), Some(spec.default), "{}", spec.name);
        }
        assert_eq!(defaults.integer("n_iter"), Some(10));
        assert_eq!(defaults.real("loop_gain"), Some(0.1));
        assert_eq!(defaults.bool("adaptive_threshold_flag"), Some(true));
    }

    #[test]
    fn unit_real_bounds_are_inclusive() {
        let schema = deconv_schema();
        assert!(schema.validate("threshold", ParamValue::Real(0.0)).is_ok());
        assert!(schema.validate("threshold", ParamValue::Real(1.0)).is_ok());
        assert_eq!(
            schema.validate("threshold", ParamValue::Real(1.5)),
            Err(ParamError::OutOfRange {
                name: "threshold".to_string(),
                value: ParamValue::Real(1.5),
            })
        );
        assert!(schema.validate("threshold", ParamValue::Real(-0.1)).is_err());
    }

    #[test]
    fn positive_integer_rejects_zero() {
        let schema = deconv_schema();
        assert!(schema.validate("n_iter", ParamValue::Integer(1)).is_ok());
        assert_eq!(
            schema.validate("n_iter", ParamValue::Integer(0)),
            Err(ParamError::OutOfRange {
                name: "n_iter".to_string(),
                value: ParamValue::Integer(0),
            })
        );
    }

    #[test]
    fn wrong_variant_is_a_type_error_not_a_range_error() {
        let schema = deconv_schema();
        let err = schema
            .validate("loop_gain", ParamValue::Bool(true))
            .unwrap_err();
        assert!(matches!(err, ParamError::TypeMismatch { .. }));
    }

    #[test]
    fn non_finite_reals_are_rejected() {
        let schema = deconv_schema();
        assert!(
            schema
                .validate("clean_beam_sigma", ParamValue::Real(f64::NAN))
                .is_err()
        );
        assert!(
            schema
                .validate("clean_beam_sigma", ParamValue::Real(f64::INFINITY))
                .is_err()
        );
        assert!(
            schema
                .validate("clean_beam_sigma", ParamValue::Real(-2.5))
                .is_ok()
        );
    }

    #[test]
    fn parse_follows_the_declared_type() {
        let schema = deconv_schema();
        assert_eq!(
            schema.parse("n_iter", " 25 "),
            Ok(ParamValue::Integer(25))
        );
        assert_eq!(schema.parse("threshold", "0.5"), Ok(ParamValue::Real(0.5)));
        assert_eq!(
            schema.parse("add_residual_flag", "true"),
            Ok(ParamValue::Bool(true))
        );
        assert!(matches!(
            schema.parse("n_iter", "ten"),
            Err(ParamError::ParseFailed { .. })
        ));
        assert!(matches!(
            schema.parse("threshold", "2.0"),
            Err(ParamError::OutOfRange { .. })
        ));
        assert!(matches!(
            schema.parse("missing", "1"),
            Err(ParamError::Unknown(_))
        ));
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let mut schema = ParamSchema::new();
        let spec = ParamSpec::new("gain", "", ParamType::Real, ParamValue::Real(1.0));
        schema.register(spec.clone()).unwrap();
        assert_eq!(
            schema.register(spec),
            Err(ParamError::Duplicate("gain".to_string()))
        );
    }

    #[test]
    fn set_validates_against_schema() {
        let schema = deconv_schema();
        let mut set = schema.defaults();
        set.set("loop_gain", ParamValue::Real(0.2));
        assert!(set.validate_against(&schema).is_ok());
        set.set("loop_gain", ParamValue::Real(7.0));
        assert!(set.validate_against(&schema).is_err());
        set.set("loop_gain", ParamValue::Real(0.2));
        set.set("unknown", ParamValue::Real(0.0));
        assert!(matches!(
            set.validate_against(&schema),
            Err(ParamError::Unknown(_))
        ));
    }
}
