/*!
Standard switches for command-line programs: `-h/--help`, `-q/--quiet` and
`-v/--verbose`.

A [`Launcher`] keeps track of its [`Verbosity`]; [`standard_options`] declares
the three switches for it. Hosts usually react to
[`verbosity_changed`][Launcher::verbosity_changed] by adjusting their
`tracing` filter with [`Verbosity::level_filter`].
 */

use tracing::level_filters::LevelFilter;

use crate::Command;
use crate::declaration::{Declarations, Opt, OptionSet};
use crate::errors::{BoxError, Failure};

/// The exit code used when both `--quiet` and `--verbose` are given
pub const CONFLICTING_SWITCHES: i32 = 101;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Normal,
    Verbose,
}

impl Verbosity {
    /// The most detailed level that should be logged at this verbosity
    #[must_use]
    pub fn level_filter(self) -> LevelFilter {
        match self {
            Verbosity::Quiet => LevelFilter::ERROR,
            Verbosity::Normal => LevelFilter::INFO,
            Verbosity::Verbose => LevelFilter::DEBUG,
        }
    }
}

/// A [`Command`] that supports the standard switches
pub trait Launcher: Command {
    fn verbosity(&self) -> Verbosity;

    fn set_verbosity(&mut self, verbosity: Verbosity);

    /// Called after `--quiet` or `--verbose` changed the verbosity
    #[expect(unused_variables)]
    #[inline]
    fn verbosity_changed(&mut self, verbosity: Verbosity) {}

    /// Called by `--help` with the rendered usage block. Writes it to stderr
    /// by default.
    fn show_usage(&mut self, usage: &str) {
        eprintln!("{usage}");
    }
}

fn switch<C: Launcher>(command: &mut C, verbosity: Verbosity) -> Result<(), Failure> {
    let current = command.verbosity();

    if current != Verbosity::Normal && current != verbosity {
        return Err(Failure::new(
            CONFLICTING_SWITCHES,
            "cannot set both 'quiet' and 'verbose' switches",
        ));
    }

    command.set_verbosity(verbosity);
    command.verbosity_changed(verbosity);
    Ok(())
}

fn help<C: Launcher>(command: &mut C) -> Result<(), BoxError> {
    let usage = OptionSet::<C>::for_command()?.usage().to_string();
    command.show_usage(&usage);
    Ok(())
}

/// Declare `-h/--help`, `-q/--quiet` and `-v/--verbose`
pub fn standard_options<C: Launcher>(options: &mut Declarations<C>) {
    options
        .add(
            Opt::new()
                .short('h')
                .long("help")
                .description("Print help and exit")
                .exit()
                .action(help::<C>),
        )
        .add(
            Opt::new()
                .short('q')
                .long("quiet")
                .description("Display less information")
                .action(|command: &mut C| switch(command, Verbosity::Quiet)),
        )
        .add(
            Opt::new()
                .short('v')
                .long("verbose")
                .description("Display more information")
                .action(|command: &mut C| switch(command, Verbosity::Verbose)),
        );
}
