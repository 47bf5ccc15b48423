//! Run requests: formula, base configuration and algorithm parameters.
//!
//! A [`RunRequest`] bundles everything needed to start one optimization.
//! Building it validates the request, compiles the formula and constructs
//! the strategy, in that order, so a bad request never produces a
//! snapshot. [`AlgorithmRequest`] selects the algorithm at runtime.
//!
//! With the `serde` feature, requests deserialize from the flat JSON
//! objects clients send, e.g.
//!
//! ```json
//! { "algorithm": "GWO", "targetFunction": "x*x + y*y", "maxIter": 50,
//!   "bounds": [[-5, 5], [-5, 5]], "populationSize": 20, "InitialA": 2 }
//! ```

use std::fmt;
use std::str::FromStr;

use crate::abc::{Abc, AbcConfig};
use crate::afsa::{Afsa, AfsaConfig};
use crate::engine::{Engine, EngineConfig, Metaheuristic};
use crate::error::{Result, ValidationError};
use crate::fa::{FaConfig, Firefly};
use crate::gwo::{Gwo, GwoConfig};
use crate::objective::{Formula, Objective};
use crate::sfla::{Sfla, SflaConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A strategy built from a formula request, ready to run.
pub type BoxedOptimizer = Box<dyn Metaheuristic<Objective = Formula> + Send>;

/// Algorithm parameters that know how to build their strategy.
pub trait StrategyConfig {
    /// The strategy built for an objective `O`.
    type Strategy<O: Objective>: Metaheuristic<Objective = O>;

    /// Checks the parameters on their own.
    fn validate(&self) -> std::result::Result<(), ValidationError>;

    /// Builds the strategy on a constructed engine.
    fn build<O: Objective>(
        &self,
        engine: Engine<O>,
    ) -> std::result::Result<Self::Strategy<O>, ValidationError>;
}

impl StrategyConfig for AbcConfig {
    type Strategy<O: Objective> = Abc<O>;

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        AbcConfig::validate(self)
    }

    fn build<O: Objective>(&self, engine: Engine<O>) -> std::result::Result<Abc<O>, ValidationError> {
        Abc::new(engine, self)
    }
}

impl StrategyConfig for AfsaConfig {
    type Strategy<O: Objective> = Afsa<O>;

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        AfsaConfig::validate(self)
    }

    fn build<O: Objective>(&self, engine: Engine<O>) -> std::result::Result<Afsa<O>, ValidationError> {
        Afsa::new(engine, self)
    }
}

impl StrategyConfig for FaConfig {
    type Strategy<O: Objective> = Firefly<O>;

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        FaConfig::validate(self)
    }

    fn build<O: Objective>(
        &self,
        engine: Engine<O>,
    ) -> std::result::Result<Firefly<O>, ValidationError> {
        Firefly::new(engine, self)
    }
}

impl StrategyConfig for GwoConfig {
    type Strategy<O: Objective> = Gwo<O>;

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        GwoConfig::validate(self)
    }

    fn build<O: Objective>(&self, engine: Engine<O>) -> std::result::Result<Gwo<O>, ValidationError> {
        Gwo::new(engine, self)
    }
}

impl StrategyConfig for SflaConfig {
    type Strategy<O: Objective> = Sfla<O>;

    fn validate(&self) -> std::result::Result<(), ValidationError> {
        SflaConfig::validate(self)
    }

    fn build<O: Objective>(&self, engine: Engine<O>) -> std::result::Result<Sfla<O>, ValidationError> {
        Sfla::new(engine, self)
    }
}

/// One optimization request for the algorithm configured by `C`.
///
/// # Examples
///
/// ```
/// use u_swarm::engine::{EngineConfig, Metaheuristic};
/// use u_swarm::fa::FaConfig;
/// use u_swarm::request::RunRequest;
///
/// let engine = EngineConfig::default()
///     .with_uniform_bounds(-5.0, 5.0, 2)
///     .with_population_size(10)
///     .with_iterations(20)
///     .with_seed(1);
/// let request = RunRequest::new("x*x + y*y", engine, FaConfig::default());
///
/// let mut firefly = request.build().unwrap();
/// let result = firefly.run();
/// assert_eq!(result.iterations, 20);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RunRequest<C> {
    /// Objective formula in `x` and `y`.
    #[cfg_attr(feature = "serde", serde(rename = "targetFunction"))]
    pub formula: String,

    /// Budget, search space and population.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub engine: EngineConfig,

    /// Algorithm parameters.
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub params: C,
}

impl<C> RunRequest<C> {
    pub fn new(formula: impl Into<String>, engine: EngineConfig, params: C) -> Self {
        Self {
            formula: formula.into(),
            engine,
            params,
        }
    }
}

impl<C: StrategyConfig> RunRequest<C> {
    /// Validates the request, compiles the formula and builds the strategy.
    pub fn build(&self) -> Result<C::Strategy<Formula>> {
        self.engine.validate()?;
        self.params.validate()?;
        let engine = Engine::from_formula(&self.formula, &self.engine)?;
        Ok(self.params.build(engine)?)
    }
}

/// The available algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Abc,
    Afsa,
    Firefly,
    Gwo,
    Sfla,
}

impl Algorithm {
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Abc,
        Algorithm::Afsa,
        Algorithm::Firefly,
        Algorithm::Gwo,
        Algorithm::Sfla,
    ];

    /// Canonical name, as used to select the algorithm remotely.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Abc => "ABC",
            Algorithm::Afsa => "AFSA",
            Algorithm::Firefly => "firefly",
            Algorithm::Gwo => "GWO",
            Algorithm::Sfla => "SFLA",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ValidationError;

    /// Case-insensitive; `"FA"` is accepted for the firefly algorithm.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abc" => Ok(Algorithm::Abc),
            "afsa" => Ok(Algorithm::Afsa),
            "firefly" | "fa" => Ok(Algorithm::Firefly),
            "gwo" => Ok(Algorithm::Gwo),
            "sfla" => Ok(Algorithm::Sfla),
            _ => Err(ValidationError::UnknownAlgorithm {
                name: s.to_string(),
            }),
        }
    }
}

/// A run request for any algorithm.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "algorithm"))]
pub enum AlgorithmRequest {
    #[cfg_attr(feature = "serde", serde(rename = "ABC"))]
    Abc(RunRequest<AbcConfig>),
    #[cfg_attr(feature = "serde", serde(rename = "AFSA"))]
    Afsa(RunRequest<AfsaConfig>),
    #[cfg_attr(feature = "serde", serde(rename = "firefly", alias = "FA"))]
    Firefly(RunRequest<FaConfig>),
    #[cfg_attr(feature = "serde", serde(rename = "GWO"))]
    Gwo(RunRequest<GwoConfig>),
    #[cfg_attr(feature = "serde", serde(rename = "SFLA"))]
    Sfla(RunRequest<SflaConfig>),
}

impl AlgorithmRequest {
    /// A request for `algorithm` with default parameters.
    pub fn with_defaults(algorithm: Algorithm, formula: impl Into<String>, engine: EngineConfig) -> Self {
        let formula = formula.into();
        match algorithm {
            Algorithm::Abc => Self::Abc(RunRequest::new(formula, engine, AbcConfig::default())),
            Algorithm::Afsa => Self::Afsa(RunRequest::new(formula, engine, AfsaConfig::default())),
            Algorithm::Firefly => Self::Firefly(RunRequest::new(formula, engine, FaConfig::default())),
            Algorithm::Gwo => Self::Gwo(RunRequest::new(formula, engine, GwoConfig::default())),
            Algorithm::Sfla => Self::Sfla(RunRequest::new(formula, engine, SflaConfig::default())),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        match self {
            Self::Abc(_) => Algorithm::Abc,
            Self::Afsa(_) => Algorithm::Afsa,
            Self::Firefly(_) => Algorithm::Firefly,
            Self::Gwo(_) => Algorithm::Gwo,
            Self::Sfla(_) => Algorithm::Sfla,
        }
    }

    /// The shared base configuration.
    pub fn engine(&self) -> &EngineConfig {
        match self {
            Self::Abc(r) => &r.engine,
            Self::Afsa(r) => &r.engine,
            Self::Firefly(r) => &r.engine,
            Self::Gwo(r) => &r.engine,
            Self::Sfla(r) => &r.engine,
        }
    }

    /// Builds the requested strategy.
    pub fn into_optimizer(self) -> Result<BoxedOptimizer> {
        let optimizer: BoxedOptimizer = match self {
            Self::Abc(r) => Box::new(r.build()?),
            Self::Afsa(r) => Box::new(r.build()?),
            Self::Firefly(r) => Box::new(r.build()?),
            Self::Gwo(r) => Box::new(r.build()?),
            Self::Sfla(r) => Box::new(r.build()?),
        };
        log::debug!("built {} optimizer", optimizer.name());
        Ok(optimizer)
    }
}
