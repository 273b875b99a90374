#![cfg_attr(not(test), no_std)]

/*!
Low-level classification of command-line tokens. Takes care of telling long
options, short options and malformed tokens apart, and of handing the following
raw token to options that want one. No type handling happens here, and there
is no notion of positional arguments: every token is either an option or an
error. Usually this is too low level to use directly.
*/

/**
The shape of a single command-line token.

Only two shapes are recognized: `--name`, where `name` starts with an ASCII
letter or digit, and `-c`, where `c` is exactly one ASCII letter or digit.
There are no combined short flags (`-abc`) and no `--name=value` form; a long
option containing `=` is just a long option with a strange name.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'arg> {
    /// A long option such as `--verbose`, without the leading dashes
    Long(&'arg str),

    /// A short option such as `-v`, without the leading dash
    Short(char),

    /// Anything else, exactly as it appeared on the command line
    Malformed(&'arg str),
}

impl<'arg> Token<'arg> {
    /// Classify a single token
    #[must_use]
    pub fn classify(token: &'arg str) -> Self {
        match token.strip_prefix("--") {
            Some(long) if long.starts_with(|c: char| c.is_ascii_alphanumeric()) => {
                Token::Long(long)
            }
            Some(_) => Token::Malformed(token),
            None => {
                let mut chars = token.chars();

                match (chars.next(), chars.next(), chars.next()) {
                    (Some('-'), Some(short), None) if short.is_ascii_alphanumeric() => {
                        Token::Short(short)
                    }
                    _ => Token::Malformed(token),
                }
            }
        }
    }
}

/**
The [`ArgumentsParser`] type operates by passing the tokens it finds into a
[`Visitor`], to be handled.
 */
pub trait Visitor<'arg> {
    type Value;

    /// A long option, such as `--option`
    fn visit_long(self, option: &'arg str, arg: impl ArgAccess<'arg>) -> Self::Value;

    /// A short option, such as `-o`
    fn visit_short(self, option: char, arg: impl ArgAccess<'arg>) -> Self::Value;

    /// A token that is neither a long nor a short option
    fn visit_malformed(self, token: &'arg str) -> Self::Value;
}

/**
[`ArgAccess`] allows a visitor to decide if a given option needs an argument,
based on the identity of the option.

Consider `--foo --bar`. Is this a pair of flags, or the option `--foo` with the
argument `--bar`? The [`ArgumentsParser`] can't tell, so a visitor requests an
argument via this trait only for options that need one. Whatever token comes
next is handed over as-is, even if it looks like an option.
*/
pub trait ArgAccess<'arg>: Sized {
    /**
    Get the next raw token from the parser. This should only be called by
    options that need it; flags should simply ignore it, so that the next
    token is classified independently.

    This returns [`None`] if all of the tokens have been exhausted.
    */
    fn take(self) -> Option<&'arg str>;
}

/**
An `ArgumentsParser` is the main entry point into `optbind_parser`. It
classifies one token in each call to [`next_arg`][Self::next_arg], sending it
to the given [`Visitor`].

`optbind_parser` operates entirely on borrowed data, because we assume that
command-line arguments are loaded early on in `main` and then handled in a
borrowed form for the rest of the program. The ubiquitous `'arg` lifetime
refers to this borrowed command line data.
*/
#[derive(Debug, Clone)]
pub struct ArgumentsParser<I> {
    args: I,
}

impl<'arg, I> ArgumentsParser<I>
where
    I: Iterator<Item = &'arg str>,
{
    /**
    Create a new [`ArgumentsParser`] from an iterator of tokens. This list
    should *exclude* the name of the program, which is commonly passed as the
    first argument in the list.
     */
    #[inline]
    #[must_use]
    pub fn new(args: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            args: args.into_iter(),
        }
    }

    /// Classify the next token and hand it to `visitor`. Returns `None` once
    /// every token has been consumed.
    pub fn next_arg<V>(&mut self, visitor: V) -> Option<V::Value>
    where
        V: Visitor<'arg>,
    {
        let token = self.args.next()?;

        Some(match Token::classify(token) {
            Token::Long(option) => {
                visitor.visit_long(option, NextArgAccess { args: &mut self.args })
            }
            Token::Short(option) => {
                visitor.visit_short(option, NextArgAccess { args: &mut self.args })
            }
            Token::Malformed(token) => visitor.visit_malformed(token),
        })
    }
}

/// ArgAccess implementation that gets the next token from the list,
/// whatever its shape.
struct NextArgAccess<'a, I> {
    args: &'a mut I,
}

impl<'arg, I> ArgAccess<'arg> for NextArgAccess<'_, I>
where
    I: Iterator<Item = &'arg str>,
{
    #[inline]
    fn take(self) -> Option<&'arg str> {
        self.args.next()
    }
}
