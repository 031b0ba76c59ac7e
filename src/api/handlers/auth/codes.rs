//! Verification code policy and generation.

use rand::Rng;

/// Codes are four digits; the leading digit is never zero.
pub const CODE_MIN: i32 = 1000;
pub const CODE_MAX: i32 = 9999;

/// How long a code stays valid once issued.
pub const CODE_TTL_SECONDS: i64 = 5 * 60;

/// Source of verification codes, injectable so tests can pin the value.
pub trait CodeGenerator: Send + Sync {
    fn generate(&self) -> i32;
}

/// Production generator backed by the thread-local RNG.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadRngGenerator;

impl CodeGenerator for ThreadRngGenerator {
    fn generate(&self) -> i32 {
        rand::thread_rng().gen_range(CODE_MIN..=CODE_MAX)
    }
}

/// Generator that always returns the same code.
#[cfg(test)]
#[derive(Clone, Copy, Debug)]
pub struct FixedCodeGenerator(pub i32);

#[cfg(test)]
impl CodeGenerator for FixedCodeGenerator {
    fn generate(&self) -> i32 {
        self.0
    }
}
