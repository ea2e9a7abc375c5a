//! Curve parameters as serializable configuration
//!
//! A [`CurveConfig`] names a short Weierstrass curve by its prime and
//! integer coefficients, and the field it should be built over. JSON is the
//! interchange format:
//!
//! ```json
//! { "prime": 23, "a": 0, "b": 1, "field": "extension" }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::elliptic_curve::EllipticCurve;
use crate::errors::{Error, Result};
use crate::field::{CubicExtensionField, PrimeField};
use crate::integer::{IntegerOracle, TrialDivision};

/// Which field the curve is built over
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FieldKind {
    /// F_p
    #[serde(rename = "prime")]
    #[default]
    Prime,
    /// F_p(α), needs p ≡ 2 (mod 3)
    #[serde(rename = "extension")]
    Extension,
}

/// y² = x³ + ax + b over F_p or F_p(α)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CurveConfig {
    pub prime: u64,
    pub a: i64,
    pub b: i64,
    #[serde(default)]
    pub field: FieldKind,
}

/// A curve built from configuration, over whichever field it names
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfiguredCurve {
    Prime(EllipticCurve<PrimeField>),
    Extension(EllipticCurve<CubicExtensionField>),
}

impl ConfiguredCurve {
    pub fn cardinality(&self) -> u64 {
        match self {
            ConfiguredCurve::Prime(curve) => curve.cardinality(),
            ConfiguredCurve::Extension(curve) => curve.cardinality(),
        }
    }
}

impl fmt::Display for ConfiguredCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfiguredCurve::Prime(curve) => fmt::Display::fmt(curve, f),
            ConfiguredCurve::Extension(curve) => fmt::Display::fmt(curve, f),
        }
    }
}

impl CurveConfig {
    pub fn new(prime: u64, a: i64, b: i64) -> Self {
        Self {
            prime,
            a,
            b,
            field: FieldKind::Prime,
        }
    }

    /// y² = x³ + 1 over F_p(α), the curve of the distorted pairing
    pub fn supersingular(prime: u64) -> Self {
        Self {
            prime,
            a: 0,
            b: 1,
            field: FieldKind::Extension,
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::InvalidConfig(format!("JSON serialization error: {e}")))
    }

    /// Parses and validates a configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfig(format!("JSON deserialization error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that `prime` is a prime above 3 and, for the extension field,
    /// that it is 2 mod 3
    ///
    /// Singularity is only detected when the curve is built.
    pub fn validate(&self) -> Result<()> {
        if self.prime <= 3 || !TrialDivision.is_prime(self.prime) {
            return Err(Error::InvalidConfig(format!(
                "curve modulus must be a prime above 3, got {}",
                self.prime
            )));
        }
        if self.field == FieldKind::Extension && self.prime % 3 != 2 {
            return Err(Error::InvalidConfig(format!(
                "F_p(α) needs p ≡ 2 (mod 3), got p = {}",
                self.prime
            )));
        }
        Ok(())
    }

    /// The curve over F_p, whatever `field` says
    pub fn prime_curve(&self) -> Result<EllipticCurve<PrimeField>> {
        EllipticCurve::new(PrimeField::new(self.prime)?, self.a, self.b)
    }

    /// The curve over F_p(α), whatever `field` says
    pub fn extension_curve(&self) -> Result<EllipticCurve<CubicExtensionField>> {
        EllipticCurve::new(CubicExtensionField::new(self.prime)?, self.a, self.b)
    }

    /// The curve over the field of the given kind
    pub fn curve_over(&self, kind: FieldKind) -> Result<ConfiguredCurve> {
        debug!(prime = self.prime, a = self.a, b = self.b, ?kind, "building curve");
        match kind {
            FieldKind::Prime => self.prime_curve().map(ConfiguredCurve::Prime),
            FieldKind::Extension => self.extension_curve().map(ConfiguredCurve::Extension),
        }
    }

    /// The curve over the configured field
    pub fn build(&self) -> Result<ConfiguredCurve> {
        self.validate()?;
        self.curve_over(self.field)
    }
}
