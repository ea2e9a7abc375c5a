//! Finite field implementations
//!
//! This module provides field arithmetic for:
//! - F_p: prime fields, use [`PrimeField`]
//! - F_p(α): the degree-2 extension of F_p by a primitive cube root of unity
//!   α, defined for p ≡ 2 (mod 3), use [`CubicExtensionField`]
//!
//! # When to use which implementation
//!
//! - **PrimeField**: curves and pairings whose points all have coordinates in F_p
//! - **CubicExtensionField**: the distorted Weil pairing on y² = x³ + 1, whose
//!   values live in F_p(α) because F_p itself has no primitive cube root

pub mod extension;
pub mod field_trait;
pub mod prime;

// Re-export main types for convenience
pub use extension::{CubicExtensionField, ExtensionFieldElement};
pub use field_trait::{Coefficients, FieldCache, FieldElement, FiniteField, MultiplicativeLaw};
pub use prime::{PrimeField, PrimeFieldElement};
