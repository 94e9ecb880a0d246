use std::fmt;

/// Server software flavour selected through the image's `TYPE` variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoaderKind {
    #[default]
    Vanilla,
    Forge,
    Fabric,
}

impl LoaderKind {
    /// Resolves a user supplied loader name.
    ///
    /// Only "forge" and "fabric" are recognised (case-insensitive); every other
    /// value, including typos, selects [`LoaderKind::Vanilla`].
    pub fn from_arg(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "forge" => Self::Forge,
            "fabric" => Self::Fabric,
            _ => Self::Vanilla,
        }
    }

    pub fn env_value(&self) -> &'static str {
        match self {
            Self::Vanilla => "VANILLA",
            Self::Forge => "FORGE",
            Self::Fabric => "FABRIC",
        }
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_value())
    }
}
