// Constants for the interpreter

use std::time::Duration;

/// Number of calculator variables (`Ans`, `A`..`Z`, `theta`)
pub const VARIABLE_COUNT: usize = 28;

/// How long a single parse may take before it is abandoned
pub const PARSE_TIMEOUT: Duration = Duration::from_millis(2000);

/// How long one `For(` activation may iterate before it is silently stopped
pub const LOOP_TIMEOUT: Duration = Duration::from_secs(10);
