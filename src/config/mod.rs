pub mod load;
pub mod save;
pub mod types;

pub use load::SETTINGS_FILE;
pub use types::{
    Config, DEFAULT_CACHE_DIR, DEFAULT_TOOL_DIR, FileTypeTable, Language, MAX_RECENT_PATHS,
    UserSettings,
};
