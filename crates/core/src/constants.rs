/// Constants used throughout the rigger codebase
// Manifest file names
pub const MANIFEST_FILENAME: &str = "rigger.yaml";
pub const MANIFEST_FILENAME_ALT: &str = "rigger.yml";
pub const TARGET_MANIFEST_SUFFIX: &str = ".rigger.yaml";

// Environment variable names
pub const RIGGER_LOG_VAR: &str = "RIGGER_LOG";
pub const RIGGER_SOPS_BIN_VAR: &str = "RIGGER_SOPS_BIN";
pub const SOPS_AGE_RECIPIENTS_VAR: &str = "SOPS_AGE_RECIPIENTS";
pub const SOPS_AGE_KEY_FILE_VAR: &str = "SOPS_AGE_KEY_FILE";
pub const SOPS_AGE_KEY_VAR: &str = "SOPS_AGE_KEY";

// External tools
pub const SOPS_BINARY: &str = "sops";

// Vault schemes
pub const SOPS_SCHEME: &str = "sops";

// Secret generation defaults
pub const DEFAULT_SECRET_SIZE: i64 = 16;
pub const MAX_SECRET_SIZE: i64 = 4096;
pub const DEFAULT_SECRET_SPECIAL: &str = "#@!`~{}?.^&|=+_-";
pub const DIGIT_CHARS: &str = "0123456789";
pub const LOWER_CHARS: &str = "abcdefghijklmnopqrstuvwxyz";
pub const UPPER_CHARS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

// Dns driver value that opts out of any inherited dns configuration
pub const DNS_DRIVER_NONE: &str = "none";

// Default file mode for a vault file written for the first time
pub const DEFAULT_VAULT_FILE_MODE: u32 = 0o644;
