/*!
[`Binder`] ties a [`Command`] to its validated options, a converter registry
and the exit codes to use on failure.
 */

use std::io;

use tracing::warn;

use crate::Command;
use crate::convert::Registry;
use crate::declaration::OptionSet;
use crate::errors::{DeclarationError, Error, ExitCodes, ParseError};
use crate::help::Usage;
use crate::invoke;
use crate::printers;
use crate::scan::{self, Pending};

/**
A command's validated options, ready to bind any number of command lines.

```
use optbind::{Binder, BoxError, Command, Declarations, Opt};

#[derive(Default)]
struct Count {
    total: u64,
}

impl Command for Count {
    const NAME: &'static str = "count";

    fn declare(options: &mut Declarations<Self>) {
        options.add(
            Opt::new()
                .short('n')
                .description("add to the total")
                .multiple()
                .action(|count: &mut Count, n: u64| count.total += n),
        );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

let binder = Binder::<Count>::new().unwrap();
let (count, code) = binder.execute(["-n", "2", "-n", "3"]).unwrap();
assert_eq!(count.total, 5);
assert_eq!(code, 0);

assert_eq!(binder.main(["-n", "many"]), 100);
```
 */
pub struct Binder<'r, C> {
    options: OptionSet<C>,
    registry: &'r Registry,
    codes: ExitCodes,
}

impl<C: Command> Binder<'static, C> {
    /// Validate `C`'s options, using the [global registry][Registry::global]
    pub fn new() -> Result<Self, DeclarationError> {
        Self::with_registry(Registry::global())
    }
}

impl<'r, C: Command> Binder<'r, C> {
    /// Validate `C`'s options, using `registry` for conversions
    pub fn with_registry(registry: &'r Registry) -> Result<Self, DeclarationError> {
        Ok(Self {
            options: OptionSet::for_command()?,
            registry,
            codes: ExitCodes::default(),
        })
    }

    /// Set the exit codes [`main`][Self::main] uses for errors
    #[must_use]
    pub fn exit_codes(self, codes: ExitCodes) -> Self {
        Self { codes, ..self }
    }

    #[inline]
    #[must_use]
    pub fn codes(&self) -> ExitCodes {
        self.codes
    }

    #[inline]
    #[must_use]
    pub fn options(&self) -> &OptionSet<C> {
        &self.options
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    #[must_use]
    pub fn usage(&self) -> Usage<'_, C> {
        self.options.usage()
    }

    /// Scan `args` without creating the command or running any action
    pub fn scan<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> Result<Pending, ParseError> {
        scan::scan(&self.options, self.registry, args)
    }

    /// Bind `args` to a fresh command and run it, returning the command and
    /// its exit code. `args` excludes the program name.
    pub fn execute<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> Result<(C, i32), Error> {
        let pending = self.scan(args)?;
        invoke::run(&self.options, pending, C::create, C::run)
    }

    /**
    Like [`execute`][Self::execute], but for use as a process entry point:
    errors are reported on stderr, with usage for command-line errors, and
    turned into an exit code.
     */
    pub fn main<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> i32 {
        match self.execute(args) {
            Ok((_, code)) => code,
            Err(error) => {
                if let Err(io) = self.report(&mut io::stderr().lock(), &error) {
                    warn!(error = %io, "failed to write the error report");
                }

                error.exit_code(&self.codes)
            }
        }
    }

    /// Write a report for `error`, followed by usage if the command line
    /// itself was at fault
    pub fn report(&self, out: &mut (impl io::Write + ?Sized), error: &Error) -> io::Result<()> {
        let usage = error.is_input().then(|| self.usage());
        printers::write_report(out, error, usage)
    }
}

impl<C> core::fmt::Debug for Binder<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Binder")
            .field("options", &self.options)
            .field("registry", self.registry)
            .field("codes", &self.codes)
            .finish()
    }
}
