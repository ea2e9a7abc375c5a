//! Pairing-Based Elliptic Curve Toolkit
//!
//! This library provides from-scratch building blocks for the Boneh–Goh–Nissim
//! cryptosystem:
//! - prime fields F_p and the extension F_p(α) by a primitive cube root of unity
//! - short Weierstrass curves over either field
//! - a generic finite abelian group engine (orders, subgroups, quotients,
//!   structure classification)
//! - the Weil pairing by Miller's algorithm and its distorted variant on
//!   y² = x³ + 1
//!
//! # Example
//! ```
//! use bgn_pairing::elliptic_curve::EllipticCurve;
//! use bgn_pairing::field::{FieldElement, FiniteField, PrimeField};
//! use bgn_pairing::pairing::weil_pairing;
//!
//! let curve = EllipticCurve::new(PrimeField::new(631).unwrap(), 30, 34).unwrap();
//! let p = curve.point(36, 60).unwrap();
//! let q = curve.point(121, 387).unwrap();
//! let s = curve.point(0, 36).unwrap();
//!
//! let e = weil_pairing(&curve, &p, &q, 5, Some(&s)).unwrap();
//! assert_eq!(e, curve.field().from_int(242));
//! assert!(e.pow(5).is_one());
//! ```

/// Key-generation searches for BGN
pub mod bgn;
/// Serializable curve parameters
pub mod config;
/// Elliptic curve groups over finite fields
pub mod elliptic_curve;
/// Crate-wide error type
pub mod errors;
/// Finite field implementations (F_p, F_p(α))
pub mod field;
/// Finite abelian groups
pub mod group;
/// Integer helpers and the primality/factorization capability
pub mod integer;
/// Weil pairing
pub mod pairing;

pub use elliptic_curve::{CurvePoint, EllipticCurve};
pub use errors::{Error, Result};
pub use field::{CubicExtensionField, FieldElement, FiniteField, PrimeField};
pub use group::FiniteGroup;
pub use pairing::{modified_weil_pairing, weil_pairing};
