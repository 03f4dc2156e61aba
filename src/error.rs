use thiserror::Error;

/// Failures parsing JSON inputs, a verification key, or a proof.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unexpected value at `{path}`: expected a number, string, or array")]
    UnexpectedLeaf { path: String },
    #[error("could not parse `{value}` as an integer")]
    UnparsableInteger { value: String },
    #[error("point has {found} coordinate strings, expected at least {expected}")]
    CoordinateCount { expected: usize, found: usize },
    #[error(
        "verification key has {ic_len} IC entries for {signal_count} public signals (expected {expected})"
    )]
    IcLengthMismatch {
        ic_len: usize,
        signal_count: usize,
        expected: usize,
    },
    #[error("'wtns' header not found")]
    WitnessHeaderError,
    #[error("witness version not supported, found {0}")]
    WitnessVersionNotSupported(u32),
    #[error("invalid number of sections in witness data, expected 2, got {0}")]
    SectionCountError(u32),
    #[error("invalid section type, expected {expected}, got {found}")]
    SectionTypeError { expected: u32, found: u32 },
    #[error("invalid section length, expected {expected}, got {found}")]
    SectionLengthError { expected: u64, found: u64 },
    #[error("invalid field byte size, expected {expected}, got {found}")]
    FieldByteSizeError { expected: u32, found: u32 },
}

/// A scalar or base-field value fell outside its field.
#[derive(Error, Debug)]
pub enum RangeError {
    #[error("public signal {index} is not in the scalar field")]
    SignalNotInField { index: usize },
    #[error("coordinate is not in the base field")]
    CoordinateNotInField,
}

/// Failures talking to the Circom-2 WASM guest across the ABI boundary.
#[derive(Error, Debug)]
pub enum AbiError {
    #[error("export `{0}` not found in WASM module")]
    MissingExport(String),
    #[error("WASM runtime failure calling `{name}`: {source}")]
    Runtime {
        name: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("no WASM engine configured")]
    NoEngineSet,
    #[error("failed to compile WASM module: {0}")]
    Compile(anyhow::Error),
    #[error("failed to instantiate WASM module: {0}")]
    Instantiate(anyhow::Error),
    #[error("witness size mismatch: expected {expected} elements, computed {found}")]
    WitnessSizeMismatch { expected: u32, found: u32 },
    #[error("input size mismatch: {0} values set, guest expects {1}")]
    InputSizeMismatch(u32, u32),
    #[error("signal `{0}` not found in circuit")]
    SignalNotFound(String),
    #[error("signal `{name}` expects {expected} values, got {found}")]
    SignalSizeMismatch {
        name: String,
        expected: u32,
        found: u32,
    },
}

/// A latched exception raised by the circuit itself (`exceptionHandler`).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct CircuitError {
    pub code: i32,
    pub message: String,
}

impl CircuitError {
    /// Build the human-readable message for a latched `exceptionHandler` code,
    /// appending any printed-error and log context the guest accumulated
    /// before raising.
    pub fn from_code(code: i32, printed: &str, log: &str) -> Self {
        let reason = match code {
            1 => "Signal not found",
            2 => "Too many signals set",
            3 => "Signal already set",
            4 => "Assert Failed",
            5 => "Not enough memory",
            6 => "Input signal array access exceeds the size",
            _ => "Unknown error",
        };
        let mut message = reason.to_string();
        if !printed.is_empty() {
            message.push('\n');
            message.push_str(printed);
        }
        if !log.is_empty() {
            message.push('\n');
            message.push_str(log);
        }
        CircuitError { code, message }
    }
}

/// A verifier call rejected the proof or its inputs.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("pairing check rejected the proof")]
    Rejected,
}

/// Unifying crate error. Each concern keeps its own enum above; callers that
/// only care about the outcome can propagate this with `?`, while callers
/// that need to branch on kind can match through the variants.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Abi(#[from] AbiError),
    #[error(transparent)]
    Circuit(#[from] CircuitError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
