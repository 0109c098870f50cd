use thiserror::Error;

/// Main error type for the Acorn Hunt battle core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleEngineError {
    /// A content table lookup or content rule failed
    #[error("Content error: {0}")]
    Content(#[from] ContentError),
    /// The run context handed to the engine is structurally invalid
    #[error("Invalid run context: {0}")]
    RunContext(#[from] RunContextError),
    /// A weighted table was built from inconsistent inputs
    #[error("RNG error: {0}")]
    Rng(#[from] RngError),
    /// Configuration could not be read or parsed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Errors related to content lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Unknown character: {0}")]
    UnknownCharacter(String),
    #[error("Unknown enemy: {0}")]
    UnknownEnemy(String),
    #[error("Unknown relic: {0}")]
    UnknownRelic(String),
    #[error("Unknown skill {skill} for character {character}")]
    UnknownSkill { character: String, skill: String },
    #[error("Skill {0} has unmet prerequisites")]
    PrerequisitesUnmet(String),
    #[error("Malformed content table {table}: {details}")]
    Malformed { table: String, details: String },
}

/// Caller contract violations detected when a battle is set up
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RunContextError {
    #[error("The party has no members")]
    EmptyParty,
    #[error("The encounter has no enemies")]
    NoEnemies,
    #[error("Duplicate combatant id: {0}")]
    DuplicateCombatant(String),
    #[error("Modifier {name} must be finite and non-negative, got {value}")]
    InvalidMultiplier { name: &'static str, value: f64 },
    #[error("Combatant {id} has health {health} outside [0, {max}]")]
    HealthOutOfRange { id: String, health: i32, max: i32 },
}

/// Errors related to building weighted choice tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RngError {
    #[error("Weighted table has {items} items but {weights} weights")]
    LengthMismatch { items: usize, weights: usize },
    #[error("Weighted table is empty")]
    Empty,
    #[error("Weighted table total weight must be positive, got {0}")]
    NonPositiveTotal(f64),
}

/// Errors related to loading run configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read {path}: {details}")]
    Io { path: String, details: String },
    #[error("Failed to parse config: {0}")]
    Parse(String),
}

/// Type alias for Results using BattleEngineError
pub type BattleResult<T> = Result<T, BattleEngineError>;

/// Type alias for Results using ContentError
pub type ContentResult<T> = Result<T, ContentError>;

/// Type alias for Results using RunContextError
pub type RunContextResult<T> = Result<T, RunContextError>;
