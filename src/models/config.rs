use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::utils::constants::{DEFAULT_ALIGNMENT_LOOKAHEAD, DEFAULT_BUFFER_SIZE, DEFAULT_WORKERS};

/// Which station names a line may carry. One policy applies to every line of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum NamePolicy {
    /// First character of the name must be an uppercase letter
    #[default]
    UppercaseInitial,
    /// Any non-empty name
    Any,
}

impl NamePolicy {
    pub fn accepts(&self, name: &[u8]) -> bool {
        match self {
            NamePolicy::Any => true,
            NamePolicy::UppercaseInitial => first_char(name).is_some_and(char::is_uppercase),
        }
    }
}

/// Decode the first UTF-8 character without validating the rest of the name.
fn first_char(bytes: &[u8]) -> Option<char> {
    let width = match *bytes.first()? {
        b if b < 0x80 => 1,
        b if b >= 0xF0 => 4,
        b if b >= 0xE0 => 3,
        _ => 2,
    };
    let prefix = bytes.get(..width)?;
    std::str::from_utf8(prefix).ok()?.chars().next()
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    #[validate(range(min = 1))]
    pub workers: usize,

    #[validate(range(min = 64))]
    pub buffer_size: usize,

    #[validate(range(min = 1))]
    pub lookahead: u64,

    pub use_mmap: bool,

    pub name_policy: NamePolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            lookahead: DEFAULT_ALIGNMENT_LOOKAHEAD,
            use_mmap: false,
            name_policy: NamePolicy::default(),
        }
    }
}
