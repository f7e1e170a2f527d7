//! Error types for fixed-point arithmetic and pool pricing
//!
//! Arithmetic failures are fatal for the quote being computed and are never
//! coerced into a value. Solver failures are the exception: the stable pool
//! wrapper maps them to a zero quote so the router can keep scanning.

use thiserror::Error;

/// Errors raised by 18-decimal fixed-point arithmetic
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    /// Division by zero (a zero invariant, supply or rate outside the zero-supply branches)
    #[error("Division by zero in {op}")]
    DivisionByZero { op: &'static str },

    /// Result exceeds 256 bits
    #[error("Overflow in {op}")]
    Overflow { op: &'static str },

    /// Subtraction would go below zero
    #[error("Underflow in {op}")]
    Underflow { op: &'static str },

    /// Fee on the shortfall exceeds the real balance, so the nominal balance
    /// would be negative. The supplied balances violate the pool's invariants.
    #[error("Negative nominal balance for real balance {real}")]
    NegativeNominalBalance { real: String },

    /// Invalid decimal string format
    #[error("Invalid decimal string: '{input}' - expected non-negative numeric format")]
    InvalidDecimal { input: String },
}

/// Errors surfaced by pool-level pricing calls
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AmmError {
    /// Token is not one of the pool's tokens
    #[error("Pool does not contain token {token}")]
    TokenNotInPool { token: String },

    /// The pool type cannot answer this query from its own state
    #[error("Unsupported operation: {operation}")]
    UnsupportedOperation { operation: &'static str },

    /// Pool parameters or pair selection are malformed
    #[error("Invalid pool parameters: {reason}")]
    InvalidParams { reason: String },

    /// Stable pool state arrived without an amplification parameter
    #[error("Stable pool {pool} missing amp factor")]
    MissingAmplification { pool: String },

    #[error(transparent)]
    Math(#[from] MathError),
}

/// Failures reported by an external StableSwap invariant solver
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    /// Overflow in the amplified invariant search
    #[error("Overflow in stable invariant computation")]
    Overflow,

    #[error("Stable invariant did not converge after {iterations} iterations")]
    DidNotConverge { iterations: u32 },

    #[error("Invalid solver input: {reason}")]
    InvalidInput { reason: String },
}

impl From<MathError> for SolverError {
    fn from(err: MathError) -> Self {
        match err {
            MathError::Overflow { .. } => SolverError::Overflow,
            other => SolverError::InvalidInput {
                reason: other.to_string(),
            },
        }
    }
}
