use core::fmt::Display;
use std::error::Error as StdError;
use std::io::{self, Write as _};

use indent_write::io::IndentWriter;
use lazy_format::lazy_format;

use crate::errors::Error;

/// The error's causes, one `caused by:` line each
fn cause_chain(error: &Error) -> impl Display + '_ {
    let causes = std::iter::successors(error.source(), |&cause| cause.source());

    lazy_format!("caused by: {cause}\n" for cause in causes.clone())
}

/**
Write a report for `error`: the error itself, its indented cause chain, and
then `usage`, if given.

```text
error: option --count failed
  caused by: too many
```
 */
pub fn write_report(
    out: &mut (impl io::Write + ?Sized),
    error: &Error,
    usage: Option<impl Display>,
) -> io::Result<()> {
    writeln!(out, "error: {error}")?;
    write!(IndentWriter::new("  ", &mut *out), "{}", cause_chain(error))?;

    match usage {
        Some(usage) => writeln!(out, "\n{usage}"),
        None => Ok(()),
    }
}
