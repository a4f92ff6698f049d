//! GUI toolkit variants and their packaging requirements.

/// GUI toolkit the packaged script is written against.
///
/// # Examples
///
/// ```
/// use kodegen_bundler_gui::bundler::ToolkitKind;
///
/// assert_eq!(ToolkitKind::Extended.package_name(), "customtkinter");
/// assert!(ToolkitKind::Plain.hidden_imports().contains(&"tkinter.filedialog"));
/// ```
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, serde::Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ToolkitKind {
    /// The standard library `tkinter` toolkit.
    Plain,
    /// The third-party `customtkinter` toolkit, which ships theme and asset files.
    Extended,
}

/// Modules PyInstaller's analysis tends to miss for plain Tk applications.
const TKINTER_HIDDEN_IMPORTS: &[&str] = &[
    "tkinter",
    "tkinter.filedialog",
    "tkinter.messagebox",
    "tkinter.ttk",
];

impl ToolkitKind {
    /// Python package name of the toolkit.
    pub fn package_name(self) -> &'static str {
        match self {
            Self::Plain => "tkinter",
            Self::Extended => "customtkinter",
        }
    }

    /// Fixed hidden imports this toolkit always needs.
    pub fn hidden_imports(self) -> &'static [&'static str] {
        match self {
            Self::Plain => TKINTER_HIDDEN_IMPORTS,
            Self::Extended => &[],
        }
    }

    /// Whether the installed package directory must be shipped as data.
    pub fn ships_package_data(self) -> bool {
        matches!(self, Self::Extended)
    }
}

impl std::fmt::Display for ToolkitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Plain => write!(f, "plain"),
            Self::Extended => write!(f, "extended"),
        }
    }
}
