/// Record layout
pub const FIELD_SEPARATOR: u8 = b';';
pub const LINE_TERMINATOR: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const DECIMAL_POINT: u8 = b'.';
pub const NEGATIVE_SIGN: u8 = b'-';

/// Measurements are stored as integer tenths
pub const TENTHS_PER_UNIT: i64 = 10;

/// Processing defaults
pub const DEFAULT_WORKERS: usize = 1;
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024; // 1MB
pub const DEFAULT_ALIGNMENT_LOOKAHEAD: u64 = 1024;
pub const INITIAL_TABLE_CAPACITY: usize = 2048;

