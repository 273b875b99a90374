/*!
Option declarations, and the validator that turns them into an
[`OptionSet`].

Declarations are built with the [`Opt`] builder and collected in a
[`Declarations`] list. [`OptionSet::new`] checks the whole list at once and
fails on the first problem; the resulting set is immutable and can be reused
for any number of command lines.
 */

use core::fmt;
use std::borrow::Cow;

use regex::Regex;
use tracing::debug;

use crate::action::{self, Action, ErasedAction, ParameterType, Value};
use crate::errors::{ArgumentError, BoxError, DeclarationError};
use crate::help::Usage;
use crate::{Command, Tags};

/// The argument pattern used when an option doesn't declare one: the whole
/// argument, newlines included, as a single value
pub const DEFAULT_PATTERN: &str = "(?s)(.*)";

/// The label used in usage text when an option doesn't declare one
pub const DEFAULT_LABEL: &str = "VALUE";

/**
Builder for a single option declaration.

```
use optbind::Opt;

struct Target {
    size: u32,
}

let opt = Opt::new()
    .short('s')
    .long("size")
    .description("the size")
    .label("BYTES")
    .action(|target: &mut Target, size: u32| target.size = size);
```
 */
pub struct Opt<T> {
    short: Option<char>,
    long: Option<&'static str>,
    description: Cow<'static, str>,
    required: bool,
    multiple: bool,
    exit: bool,
    pattern: Option<Cow<'static, str>>,
    label: Option<Cow<'static, str>>,
    action: Option<(Vec<ParameterType>, ErasedAction<T>)>,
}

impl<T: 'static> Opt<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            short: None,
            long: None,
            description: Cow::Borrowed(""),
            required: false,
            multiple: false,
            exit: false,
            pattern: None,
            label: None,
            action: None,
        }
    }

    /// Match `-c`
    #[must_use]
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Match `--name`, exactly
    #[must_use]
    pub fn long(mut self, long: &'static str) -> Self {
        self.long = Some(long);
        self
    }

    /// The description shown in usage text. Mandatory.
    #[must_use]
    pub fn description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// The command line fails if this option is absent
    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// This option may appear more than once; its action is invoked once per
    /// appearance
    #[must_use]
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    /// Once this option's action completes, nothing else runs: not the
    /// remaining actions, and not the command's entry point
    #[must_use]
    pub fn exit(mut self) -> Self {
        self.exit = true;
        self
    }

    /// A regular expression that splits the argument into one value per
    /// action parameter, using capture groups `1..=N`. It must match the
    /// whole argument.
    #[must_use]
    pub fn pattern(mut self, pattern: impl Into<Cow<'static, str>>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// The argument's name in usage text
    #[must_use]
    pub fn label(mut self, label: impl Into<Cow<'static, str>>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The action to invoke. Options whose action takes no parameters are
    /// flags; the rest take one argument from the command line.
    #[must_use]
    pub fn action<P: 'static>(mut self, action: impl Action<T, P>) -> Self {
        self.action = Some(action::erase(action));
        self
    }
}

impl<T: 'static> Default for Opt<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Opt<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Opt")
            .field("short", &self.short)
            .field("long", &self.long)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("multiple", &self.multiple)
            .field("exit", &self.exit)
            .field("pattern", &self.pattern)
            .field("label", &self.label)
            .field(
                "parameters",
                &self.action.as_ref().map(|(parameters, _)| parameters),
            )
            .finish()
    }
}

/// An ordered list of option builders, not yet validated
pub struct Declarations<T> {
    options: Vec<Opt<T>>,
}

impl<T> Declarations<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: Vec::new(),
        }
    }

    pub fn add(&mut self, option: Opt<T>) -> &mut Self {
        self.options.push(option);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl<T> Default for Declarations<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<Opt<T>> for Declarations<T> {
    fn from_iter<I: IntoIterator<Item = Opt<T>>>(iter: I) -> Self {
        Self {
            options: iter.into_iter().collect(),
        }
    }
}

/// A compiled argument pattern and its usage label
#[derive(Debug, Clone)]
pub struct Argument {
    source: Cow<'static, str>,
    regex: Regex,
    label: Cow<'static, str>,
}

impl Argument {
    /// Compile `pattern`, anchored so that it has to match a whole argument
    fn compile(
        pattern: Option<Cow<'static, str>>,
        label: Option<Cow<'static, str>>,
    ) -> Result<Self, regex::Error> {
        let source = pattern.unwrap_or(Cow::Borrowed(DEFAULT_PATTERN));

        // Checked on its own first: wrapping can turn some broken patterns,
        // like `a)(b`, into valid ones
        Regex::new(&source)?;
        let regex = Regex::new(&format!("^(?:{source})$"))?;

        Ok(Self {
            source,
            regex,
            label: label.unwrap_or(Cow::Borrowed(DEFAULT_LABEL)),
        })
    }

    /// The pattern as it was declared
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The number of capture groups in the pattern
    #[must_use]
    pub fn groups(&self) -> usize {
        self.regex.captures_len() - 1
    }

    /**
    Split `argument` into `count` values, from capture groups `1..=count`. A
    group that didn't take part in the match produces an empty string.
     */
    pub fn extract<'a>(
        &self,
        argument: &'a str,
        count: usize,
    ) -> Result<Vec<&'a str>, ArgumentError> {
        let captures = self
            .regex
            .captures(argument)
            .ok_or_else(|| ArgumentError::Mismatch {
                pattern: self.source.clone().into_owned(),
            })?;

        Ok((1..=count)
            .map(|group| captures.get(group).map_or("", |piece| piece.as_str()))
            .collect())
    }
}

/// A validated option declaration
pub struct Declaration<T> {
    tags: Tags<'static>,
    description: Cow<'static, str>,
    required: bool,
    multiple: bool,
    exit: bool,
    argument: Argument,
    parameters: Vec<ParameterType>,
    action: ErasedAction<T>,
}

impl<T> Declaration<T> {
    #[inline]
    #[must_use]
    pub fn tags(&self) -> Tags<'static> {
        self.tags
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    #[must_use]
    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    #[inline]
    #[must_use]
    pub fn is_exit(&self) -> bool {
        self.exit
    }

    #[inline]
    #[must_use]
    pub fn argument(&self) -> &Argument {
        &self.argument
    }

    /// The action's parameter types
    #[inline]
    #[must_use]
    pub fn parameters(&self) -> &[ParameterType] {
        &self.parameters
    }

    /// True if this option takes an argument from the command line
    #[inline]
    #[must_use]
    pub fn takes_argument(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Call the action. `Ok(Some(code))` if it returned an integer.
    pub fn invoke(&self, target: &mut T, arguments: Vec<Value>) -> Result<Option<i32>, BoxError> {
        (self.action)(target, arguments)
    }
}

impl<T> fmt::Debug for Declaration<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("tags", &self.tags)
            .field("description", &self.description)
            .field("required", &self.required)
            .field("multiple", &self.multiple)
            .field("exit", &self.exit)
            .field("argument", &self.argument.pattern())
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/**
A validated, immutable set of option declarations, in declaration order.

Declaration order matters: it's the order actions are replayed in, and the
order options are listed in usage text.
 */
pub struct OptionSet<T> {
    label: Cow<'static, str>,
    declarations: Vec<Declaration<T>>,
}

impl<T: 'static> OptionSet<T> {
    /**
    Validate `declarations`. Fails on the first option that has no name, an
    unmatchable name, no description, no action, a name already used by an
    earlier option, an invalid argument pattern, or fewer capture groups than
    its action has parameters.
     */
    pub fn new(
        label: impl Into<Cow<'static, str>>,
        declarations: Declarations<T>,
    ) -> Result<Self, DeclarationError> {
        let mut validated: Vec<Declaration<T>> = Vec::with_capacity(declarations.len());

        for opt in declarations.options {
            let Opt {
                short,
                long,
                description,
                required,
                multiple,
                exit,
                pattern,
                label: argument_label,
                action,
            } = opt;

            let tags = Tags::new(short, long).ok_or(DeclarationError::Unnamed)?;
            let option = tags.to_string();

            if description.is_empty() {
                return Err(DeclarationError::MissingDescription { option });
            }

            if let Some(short) = short {
                if !short.is_ascii_alphanumeric() {
                    return Err(DeclarationError::InvalidShort { short });
                }

                if validated.iter().any(|other| other.tags.short() == Some(short)) {
                    return Err(DeclarationError::DuplicateShort { short });
                }
            }

            if let Some(long) = long {
                if !long.starts_with(|c: char| c.is_ascii_alphanumeric()) {
                    return Err(DeclarationError::InvalidLong { long });
                }

                if validated.iter().any(|other| other.tags.long() == Some(long)) {
                    return Err(DeclarationError::DuplicateLong { long });
                }
            }

            let (parameters, action) =
                action.ok_or_else(|| DeclarationError::MissingAction {
                    option: option.clone(),
                })?;

            let argument = Argument::compile(pattern.clone(), argument_label).map_err(|source| {
                DeclarationError::InvalidPattern {
                    option: option.clone(),
                    pattern: pattern
                        .unwrap_or(Cow::Borrowed(DEFAULT_PATTERN))
                        .into_owned(),
                    source,
                }
            })?;

            if parameters.len() > argument.groups() {
                return Err(DeclarationError::PatternArity {
                    option,
                    groups: argument.groups(),
                    parameters: parameters.len(),
                });
            }

            debug!(
                option = %tags,
                parameters = ?parameters,
                required,
                multiple,
                exit,
                "declared option"
            );

            validated.push(Declaration {
                tags,
                description,
                required,
                multiple,
                exit,
                argument,
                parameters,
                action,
            });
        }

        Ok(Self {
            label: label.into(),
            declarations: validated,
        })
    }

    /// Declare and validate the options of a [`Command`]
    pub fn for_command() -> Result<Self, DeclarationError>
    where
        T: Command,
    {
        let mut declarations = Declarations::new();
        T::declare(&mut declarations);
        Self::new(T::NAME, declarations)
    }
}

impl<T> OptionSet<T> {
    /// The command label used in the usage header
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// The declarations, in declaration order
    pub fn iter(&self) -> core::slice::Iter<'_, Declaration<T>> {
        self.declarations.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Declaration<T>> {
        self.declarations.get(index)
    }

    /// Find the option named `--long`, matched exactly, and its index
    #[must_use]
    pub fn find_long(&self, long: &str) -> Option<(usize, &Declaration<T>)> {
        self.declarations
            .iter()
            .enumerate()
            .find(|(_, declaration)| declaration.tags.long() == Some(long))
    }

    /// Find the option named `-short`, and its index
    #[must_use]
    pub fn find_short(&self, short: char) -> Option<(usize, &Declaration<T>)> {
        self.declarations
            .iter()
            .enumerate()
            .find(|(_, declaration)| declaration.tags.short() == Some(short))
    }

    /// Render the usage block for this set
    #[must_use]
    pub fn usage(&self) -> Usage<'_, T> {
        Usage::new(self)
    }
}

impl<'a, T> IntoIterator for &'a OptionSet<T> {
    type Item = &'a Declaration<T>;
    type IntoIter = core::slice::Iter<'a, Declaration<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> fmt::Debug for OptionSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionSet")
            .field("label", &self.label)
            .field("declarations", &self.declarations)
            .finish()
    }
}
