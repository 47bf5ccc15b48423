//! Error types for swarm construction.
//!
//! Only construction can fail. Once a strategy exists, runtime anomalies
//! are absorbed: NaN objective values become `+inf` and a sink that stops
//! accepting snapshots simply ends the run.

use thiserror::Error;

/// A malformed or inconsistent run request.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Bounds were supplied but contain no dimension.
    #[error("bounds must contain at least one (min, max) pair")]
    EmptyBounds,

    /// A bound pair is not finite or has `min > max`.
    #[error("invalid bounds at dimension {index}: min ({min}) must be finite and <= max ({max})")]
    InvalidBounds {
        /// Dimension index of the offending pair.
        index: usize,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// Neither an explicit population nor a population size was given.
    #[error("either an initial population or a population size is required")]
    MissingPopulation,

    /// The explicit population is empty or the requested size is zero.
    #[error("population must contain at least one member")]
    EmptyPopulation,

    /// Members of the explicit population have different lengths.
    #[error("population member {index} has {got} components, expected {expected}")]
    RaggedPopulation {
        /// Index of the offending member.
        index: usize,
        /// Length of the first member.
        expected: usize,
        /// Length of the offending member.
        got: usize,
    },

    /// A component of the explicit population lies outside its bounds.
    #[error("population member {index} is out of bounds in dimension {dimension} ({value})")]
    PopulationOutOfBounds {
        /// Index of the offending member.
        index: usize,
        /// Offending dimension.
        dimension: usize,
        /// Offending value.
        value: f64,
    },

    /// Both a population and a size were given and they disagree.
    #[error("population has {population} members but population size {requested} was requested")]
    PopulationSizeMismatch {
        /// Length of the explicit population.
        population: usize,
        /// Requested size.
        requested: usize,
    },

    /// Dimensionality can be inferred from nothing in the request.
    #[error("problem dimensionality is not given and cannot be inferred")]
    MissingDimensions,

    /// An explicit dimensionality of zero.
    #[error("problem dimensionality must be at least 1")]
    ZeroDimensions,

    /// Two parts of the request disagree on the dimension count.
    #[error("dimension mismatch: {left} has {left_dims} dimensions, {right} has {right_dims}")]
    DimensionMismatch {
        /// First source of the dimension count.
        left: &'static str,
        /// Its dimension count.
        left_dims: usize,
        /// Second source of the dimension count.
        right: &'static str,
        /// Its dimension count.
        right_dims: usize,
    },

    /// The requested algorithm name is not recognized.
    #[error("unknown algorithm '{name}'")]
    UnknownAlgorithm {
        /// The name as given.
        name: String,
    },

    /// An algorithm parameter is out of range.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl ValidationError {
    pub(crate) fn parameter(name: &'static str, reason: impl Into<String>) -> Self {
        ValidationError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// The objective formula could not be compiled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompileError {
    /// The formula contains nothing but whitespace.
    #[error("formula is empty")]
    Empty,

    /// A character that starts no token.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar {
        /// The character.
        ch: char,
        /// Byte offset in the formula.
        offset: usize,
    },

    /// A token in a position the grammar does not allow.
    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken {
        /// Textual form of the token.
        found: String,
        /// Byte offset in the formula.
        offset: usize,
    },

    /// The formula ended in the middle of an expression.
    #[error("unexpected end of formula")]
    UnexpectedEnd,

    /// A name that is neither a variable nor a constant.
    #[error("unknown identifier '{name}' at offset {offset}")]
    UnknownIdentifier {
        /// The identifier.
        name: String,
        /// Byte offset in the formula.
        offset: usize,
    },

    /// A call to a function that does not exist.
    #[error("unknown function '{name}' at offset {offset}")]
    UnknownFunction {
        /// The function name.
        name: String,
        /// Byte offset in the formula.
        offset: usize,
    },

    /// A known function called with the wrong number of arguments.
    #[error("function '{name}' takes {expected} argument(s), got {got}")]
    Arity {
        /// The function name.
        name: &'static str,
        /// Required argument count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },
}

/// Any error that prevents a run from starting.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SwarmError {
    /// The request is malformed or inconsistent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The objective formula could not be compiled.
    #[error("formula compilation failed: {0}")]
    Compile(#[from] CompileError),
}

impl SwarmError {
    /// Returns `true` for request validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, SwarmError::Validation(_))
    }

    /// Returns `true` for formula compilation failures.
    pub fn is_compile(&self) -> bool {
        matches!(self, SwarmError::Compile(_))
    }
}

/// Result alias for swarm construction.
pub type Result<T> = std::result::Result<T, SwarmError>;
