use std::ffi::OsString;

use crate::Command;
use crate::binder::Binder;
use crate::errors::Error;

/// Helper type for loading arguments from the environment.
///
/// The scanner works on borrowed `&str` tokens; this type owns them, so that
/// `main` can load the command line once and lend it out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedArguments {
    arguments: Vec<String>,
}

impl LoadedArguments {
    /// Load the process arguments. Arguments that aren't valid UTF-8 are
    /// converted lossily.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_os(std::env::args_os())
    }

    /// `arguments` includes the program name, as [`std::env::args_os`] does
    pub fn from_os(arguments: impl IntoIterator<Item = OsString>) -> Self {
        Self {
            arguments: arguments
                .into_iter()
                .map(|argument| argument.to_string_lossy().into_owned())
                .collect(),
        }
    }

    /// `arguments` includes the program name
    pub fn new<S: Into<String>>(arguments: impl IntoIterator<Item = S>) -> Self {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// The program name, if there was one
    #[must_use]
    pub fn argv0(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    /// Every argument after the program name
    pub fn args(&self) -> impl Iterator<Item = &str> + Clone {
        self.arguments.iter().skip(1).map(String::as_str)
    }

    pub fn execute<C: Command>(&self, binder: &Binder<'_, C>) -> Result<(C, i32), Error> {
        binder.execute(self.args())
    }

    /// Run `C` as the process entry point; see [`Binder::main`]
    pub fn main<C: Command>(&self, binder: &Binder<'_, C>) -> i32 {
        binder.main(self.args())
    }
}
