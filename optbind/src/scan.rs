/*!
The argument scanner: matches each token of a command line against an
[`OptionSet`], converts option arguments, and queues the resulting
invocations without running any of them.
 */

use core::fmt;
use std::mem;

use optbind_parser::{ArgAccess, ArgumentsParser, Visitor};
use tracing::debug;

use crate::action::Value;
use crate::convert::Registry;
use crate::declaration::{Declaration, OptionSet};
use crate::errors::{ArgumentError, ParseError};

/**
Invocations queued by [`scan`], grouped by declaration index. Each option's
invocations are kept in the order they appeared on the command line; each
invocation is the list of converted values for its action.
 */
pub struct Pending {
    invocations: Vec<Vec<Vec<Value>>>,
}

impl Pending {
    fn new(declarations: usize) -> Self {
        Self {
            invocations: (0..declarations).map(|_| Vec::new()).collect(),
        }
    }

    fn push(&mut self, index: usize, values: Vec<Value>) {
        if let Some(invocations) = self.invocations.get_mut(index) {
            invocations.push(values);
        }
    }

    /// The number of times the option at `index` appeared
    #[must_use]
    pub fn count(&self, index: usize) -> usize {
        self.invocations.get(index).map_or(0, Vec::len)
    }

    /// The queued invocations for the option at `index`
    #[must_use]
    pub fn invocations(&self, index: usize) -> &[Vec<Value>] {
        self.invocations
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Remove and return the queued invocations for the option at `index`
    pub fn take(&mut self, index: usize) -> Vec<Vec<Value>> {
        self.invocations
            .get_mut(index)
            .map(mem::take)
            .unwrap_or_default()
    }

    /// True if nothing at all was queued
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.invocations.iter().all(Vec::is_empty)
    }
}

impl fmt::Debug for Pending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.invocations
                    .iter()
                    .enumerate()
                    .filter(|(_, invocations)| !invocations.is_empty())
                    .map(|(index, invocations)| (index, invocations.len())),
            )
            .finish()
    }
}

struct ScanVisitor<'a, T> {
    options: &'a OptionSet<T>,
    registry: &'a Registry,
    pending: &'a mut Pending,
}

impl<T> ScanVisitor<'_, T> {
    fn matched<'arg>(
        self,
        token: String,
        found: Option<(usize, &Declaration<T>)>,
        arg: impl ArgAccess<'arg>,
    ) -> Result<(), ParseError> {
        let Some((index, declaration)) = found else {
            return Err(ParseError::UnknownOption { token });
        };

        if self.pending.count(index) > 0 && !declaration.is_multiple() {
            return Err(ParseError::Duplicate { token });
        }

        if !declaration.takes_argument() {
            debug!(option = %token, "matched flag");
            self.pending.push(index, Vec::new());
            return Ok(());
        }

        let Some(argument) = arg.take() else {
            return Err(ParseError::MissingArgument { token });
        };

        let values = convert_argument(declaration, self.registry, argument).map_err(|error| {
            ParseError::Argument {
                token: token.clone(),
                argument: argument.to_owned(),
                error,
            }
        })?;

        debug!(option = %token, argument, "matched option");
        self.pending.push(index, values);
        Ok(())
    }
}

impl<'arg, T> Visitor<'arg> for ScanVisitor<'_, T> {
    type Value = Result<(), ParseError>;

    fn visit_long(self, option: &'arg str, arg: impl ArgAccess<'arg>) -> Self::Value {
        let options = self.options;
        self.matched(format!("--{option}"), options.find_long(option), arg)
    }

    fn visit_short(self, option: char, arg: impl ArgAccess<'arg>) -> Self::Value {
        let options = self.options;
        self.matched(format!("-{option}"), options.find_short(option), arg)
    }

    fn visit_malformed(self, token: &'arg str) -> Self::Value {
        Err(ParseError::Malformed {
            token: token.to_owned(),
        })
    }
}

/// Split an argument with the option's pattern, then convert each piece to
/// the matching parameter type
fn convert_argument<T>(
    declaration: &Declaration<T>,
    registry: &Registry,
    argument: &str,
) -> Result<Vec<Value>, ArgumentError> {
    let parameters = declaration.parameters();

    declaration
        .argument()
        .extract(argument, parameters.len())?
        .into_iter()
        .zip(parameters)
        .map(|(piece, ty)| registry.convert(piece, ty).map_err(ArgumentError::from))
        .collect()
}

/**
Scan `args` against `options`, converting arguments with `registry`. Stops at
the first token that can't be matched or converted. No action is invoked.

`args` excludes the program name.
 */
pub fn scan<'arg, T>(
    options: &OptionSet<T>,
    registry: &Registry,
    args: impl IntoIterator<Item = &'arg str>,
) -> Result<Pending, ParseError> {
    let mut parser = ArgumentsParser::new(args);
    let mut pending = Pending::new(options.len());

    while let Some(result) = parser.next_arg(ScanVisitor {
        options,
        registry,
        pending: &mut pending,
    }) {
        result?;
    }

    Ok(pending)
}
