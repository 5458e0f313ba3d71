//! Plaintext environment handling: which file to read, the key inside
//! it, and applying decrypted values to configuration state.

pub mod applier;
pub mod key;
pub mod mode;
pub mod parser;
pub mod resolver;

pub use applier::{apply, parse_payload, ConfigContext, EnvSink, ProcessEnv};
pub use key::{load_environment, load_key, EncryptionKey, PlaintextEnvironment, KEY_VAR};
pub use mode::DeploymentMode;
pub use resolver::resolve;
