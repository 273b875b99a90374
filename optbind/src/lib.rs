/*!
A declarative command-line option binder: describe the options a command
accepts, bind each to a typed action, and let `optbind` do the rest.

Binding a command line happens in four steps:

1. A set of [`Opt`] declarations is validated into an [`OptionSet`]. This
   catches duplicate names, missing descriptions and broken argument patterns
   before any argument is looked at.
2. The arguments are [scanned][scan::scan]. Each `--long` or `-s` token is
   matched to its declaration; options with parameters take the following
   token, split it with their argument pattern, and convert each piece with
   the [converter registry][convert::Registry].
3. The [driver][invoke::run] checks required options, creates the command,
   and replays the queued actions in declaration order. An action marked
   [`exit`][Opt::exit] stops everything and decides the exit code.
4. Otherwise the command's [`run`][Command::run] entry point is called.

Usage text is rendered separately with [`OptionSet::usage`].

```
use optbind::{BoxError, Command, Declarations, Opt};

#[derive(Default)]
struct Sample {
    name: String,
    size: u32,
    verbose: bool,
}

impl Command for Sample {
    const NAME: &'static str = "sample";

    fn declare(options: &mut Declarations<Self>) {
        options
            .add(
                Opt::new()
                    .short('d')
                    .long("define")
                    .description("a NAME=SIZE pair")
                    .pattern("([a-z]+)=([0-9]+)")
                    .label("NAME=SIZE")
                    .action(|sample: &mut Sample, name: String, size: u32| {
                        sample.name = name;
                        sample.size = size;
                    }),
            )
            .add(
                Opt::new()
                    .long("verbose")
                    .description("say more")
                    .action(|sample: &mut Sample| sample.verbose = true),
            );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

let (sample, code) = optbind::execute::<Sample>(["-d", "abc=4", "--verbose"]).unwrap();
assert_eq!(sample.name, "abc");
assert_eq!(sample.size, 4);
assert!(sample.verbose);
assert_eq!(code, 0);
```
*/

use core::fmt::{self, Display};

pub mod action;
pub mod arguments;
pub mod binder;
pub mod convert;
pub mod declaration;
pub mod errors;
pub mod help;
pub mod impls;
pub mod invoke;
pub mod launcher;
mod printers;
pub mod qname;
pub mod scan;

pub use action::{Action, ActionOutput, ParameterType, Value};
pub use arguments::LoadedArguments;
pub use binder::Binder;
pub use convert::{ConverterProvider, Registry, RegistryBuilder};
pub use declaration::{Argument, Declaration, Declarations, Opt, OptionSet};
pub use errors::{
    ArgumentError, BoxError, ConversionError, DeclarationError, Error, ExitCodes, Failure,
    ParseError,
};
pub use help::Usage;
pub use launcher::{Launcher, Verbosity};
pub use qname::QualifiedName;

/// The set of tags that identify a particular option (`-short`, `--long`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tags<'a> {
    /// This option uses only a long tag
    Long { long: &'a str },

    /// This option uses only a short tag
    Short { short: char },

    /// This option uses both a long and short tag
    LongShort { long: &'a str, short: char },
}

impl<'a> Tags<'a> {
    /// Build tags from an optional short and long name; `None` if both are
    /// absent
    #[inline]
    #[must_use]
    pub const fn new(short: Option<char>, long: Option<&'a str>) -> Option<Self> {
        match (short, long) {
            (Some(short), Some(long)) => Some(Tags::LongShort { long, short }),
            (Some(short), None) => Some(Tags::Short { short }),
            (None, Some(long)) => Some(Tags::Long { long }),
            (None, None) => None,
        }
    }

    /// Get the long tag, if any
    #[inline]
    #[must_use]
    pub const fn long(&self) -> Option<&'a str> {
        match self {
            Tags::Long { long } | Tags::LongShort { long, .. } => Some(long),
            Tags::Short { .. } => None,
        }
    }

    /// Get the short tag, if any
    #[inline]
    #[must_use]
    pub const fn short(&self) -> Option<char> {
        match self {
            Tags::Short { short } | Tags::LongShort { short, .. } => Some(*short),
            Tags::Long { .. } => None,
        }
    }
}

/// Prints the name used to refer to the option in messages: `--long` when
/// there is a long tag, `-s` otherwise.
impl Display for Tags<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Tags::Long { long } | Tags::LongShort { long, .. } => write!(f, "--{long}"),
            Tags::Short { short } => write!(f, "-{short}"),
        }
    }
}

/**
A command: a type whose instances are created once per run, configured by
option actions, and then run.

[`declare`][Command::declare] is called each time an [`OptionSet`] is built
for the command, which happens once per [`Binder`]. Keep a [`Binder`] around
to parse several command lines against the same declarations.
*/
pub trait Command: Sized + 'static {
    /// The label used in the usage header, such as `java -jar sample.jar`
    const NAME: &'static str;

    /// Declare the options this command accepts, in the order their actions
    /// should be replayed
    fn declare(options: &mut Declarations<Self>);

    /// Create a fresh instance, before any action is replayed
    fn create() -> Result<Self, BoxError>;

    /// The entry point, called after every action has been replayed, unless
    /// an [exit option][Opt::exit] fired
    fn run(&mut self) -> Result<(), BoxError>;
}

/// Bind `args` to a fresh `C` with the global [`Registry`] and run it,
/// returning the command and its exit code.
pub fn execute<'a, C: Command>(args: impl IntoIterator<Item = &'a str>) -> Result<(C, i32), Error> {
    Binder::<C>::new()?.execute(args)
}
