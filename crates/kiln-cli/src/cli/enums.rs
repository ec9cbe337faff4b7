use clap::ValueEnum;
use kiln_config::Mode;

/// Environment an optimized build is composed for
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum BuildMode {
    /// Minified, hashed, gzip-ready output
    ///
    /// Writes `index.html` to the configured `build.index` location and
    /// honours compression and bundle analysis settings.
    #[value(name = "production")]
    Production,

    /// Production pipeline with the testing environment injected
    ///
    /// Emits a plain `index.html` and never compresses or analyzes, so
    /// end-to-end test runs stay fast.
    #[value(name = "testing")]
    Testing,
}

impl From<BuildMode> for Mode {
    fn from(mode: BuildMode) -> Self {
        match mode {
            BuildMode::Production => Mode::Production,
            BuildMode::Testing => Mode::Testing,
        }
    }
}

/// What `kiln check` prints after validating
#[derive(Copy, Clone, PartialEq, Eq, Debug, ValueEnum)]
pub enum CheckOutput {
    /// Only the validation verdict
    #[value(name = "summary")]
    Summary,

    /// Resolved environment toggles for every mode
    #[value(name = "toggles")]
    Toggles,

    /// The fully resolved configuration as JSON
    #[value(name = "config")]
    Config,
}
