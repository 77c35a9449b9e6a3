// Unique short-code generation with bounded generate-check-retry

use rand::Rng;
use std::fmt;
use std::future::Future;

/// Characters used for alphanumeric codes. Uppercase letters and digits only,
/// matching what gets printed on exam cards.
const ALPHANUMERIC: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Shape of a generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeFormat {
    /// Six decimal digits with no leading zero (100000..=999999).
    Numeric,
    /// Six characters drawn from A-Z and 0-9.
    Alphanumeric,
}

/// Error from a generation run.
///
/// `E` is the probe's own error type so store failures propagate unchanged.
#[derive(Debug, thiserror::Error)]
pub enum CodeGenError<E: fmt::Display> {
    #[error("no unique code found after {attempts} attempts")]
    SpaceExhausted { attempts: u32 },
    #[error("{0}")]
    Probe(E),
}

/// Draws random candidates and probes the store until one is absent.
///
/// The generator is advisory only: two concurrent requests can both see a
/// candidate as free. The store's unique index is the final arbiter, and a
/// duplicate-key error at insert time is retried by the caller with a fresh
/// candidate rather than treated as fatal.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    format: CodeFormat,
    prefix: &'static str,
    max_attempts: u32,
}

impl CodeGenerator {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

    pub fn new(format: CodeFormat, prefix: &'static str) -> Self {
        Self {
            format,
            prefix,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Generator for six-digit exam codes.
    pub fn exam_code() -> Self {
        Self::new(CodeFormat::Numeric, "")
    }

    /// Generator for examination roll numbers ("EX-" + six digits).
    pub fn exam_roll_number() -> Self {
        Self::new(CodeFormat::Numeric, "EX-")
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Draw one uniformly random candidate.
    pub fn candidate(&self) -> String {
        let mut rng = rand::thread_rng();
        let body = match self.format {
            CodeFormat::Numeric => rng.gen_range(100_000..1_000_000).to_string(),
            CodeFormat::Alphanumeric => (0..6)
                .map(|_| ALPHANUMERIC[rng.gen_range(0..ALPHANUMERIC.len())] as char)
                .collect(),
        };
        format!("{}{}", self.prefix, body)
    }

    /// Produce a code the probe reports as absent, redrawing on collision.
    ///
    /// Fails with `SpaceExhausted` once the attempt ceiling is hit instead of
    /// looping forever.
    pub async fn generate<F, Fut, E>(&self, mut exists: F) -> Result<String, CodeGenError<E>>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<bool, E>>,
        E: fmt::Display,
    {
        for _ in 0..self.max_attempts {
            let candidate = self.candidate();
            if !exists(candidate.clone()).await.map_err(CodeGenError::Probe)? {
                return Ok(candidate);
            }
            tracing::debug!("code candidate collided, redrawing");
        }
        Err(CodeGenError::SpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}
