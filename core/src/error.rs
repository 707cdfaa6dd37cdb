use thiserror::Error;

// Rejected before any expansion, interpretation or sampling starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("axiom must not be empty")]
    EmptyAxiom,
    #[error("rule key {0:?} must be exactly one character")]
    InvalidRuleKey(String),
    #[error("weighted rule for {0:?} has no alternatives")]
    EmptyAlternatives(char),
    #[error("weighted rule for {symbol:?} has unusable weights: {reason}")]
    InvalidWeights { symbol: char, reason: String },
    #[error("expansion exceeded {limit} symbols at iteration {iteration}")]
    SymbolLimit { limit: usize, iteration: u32 },
    #[error("step distance must be positive and finite, got {0}")]
    InvalidDistance(f32),
    #[error("angle range [{min}, {max}) is invalid")]
    InvalidAngleRange { min: f32, max: f32 },
    #[error("max height must be non-negative and finite, got {0}")]
    InvalidMaxHeight(f64),
    #[error("grid range {min}..={max} is empty")]
    InvalidGridRange { min: i32, max: i32 },
    #[error("hex radius must be positive and finite, got {0}")]
    InvalidHexRadius(f32),
    #[error("noise parameter {name} is invalid: {value}")]
    InvalidNoise { name: &'static str, value: f64 },
    #[error("unknown preset {0:?}")]
    UnknownPreset(String),
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

// Bracket structure of a symbol string does not nest
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructuralError {
    #[error("']' at symbol {index} has no matching '['")]
    UnbalancedClose { index: usize },
    #[error("{depth} branch(es) left open at end of input")]
    UnclosedBranch { depth: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("noise produced a non-finite value at cell ({i}, {j})")]
    NonFinite { i: i32, j: i32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Structural(#[from] StructuralError),
    #[error(transparent)]
    Sample(#[from] SampleError),
}

pub type Result<T> = std::result::Result<T, Error>;
