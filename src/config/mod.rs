//! Configuration: settings file and key bindings.

pub mod keybindings;
pub mod loader;

pub use keybindings::KeyBindings;
pub use loader::{
    apply_cli_overrides, apply_env_overrides, default_config_path, default_log_path,
    load_config_file, load_config_with_precedence, merge_config, resolve_config_path,
    save_config_file, ConfigError, ConfigFile, ResolvedConfig,
};
