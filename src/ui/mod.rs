//! UI-focused helper modules.
