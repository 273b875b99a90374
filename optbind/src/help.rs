/*!
Usage text for an [`OptionSet`].

```text
usage: sample [options]

 -a --aaa VALUE               the A
    --bbb VALUE               the B
 -d --define NAME=SIZE [+]    a definition

[+] marked option can be specified multiple times
```
 */

use core::fmt::{self, Display};

use lazy_format::lazy_format;

use crate::declaration::{Declaration, OptionSet};

/// The column descriptions start at
const DESCRIPTION_COLUMN: usize = 30;

const MULTIPLE_NOTE: &str = "[+] marked option can be specified multiple times";

/// The usage block for an [`OptionSet`]. Rendered through [`Display`], with
/// no trailing newline.
pub struct Usage<'a, T> {
    options: &'a OptionSet<T>,
}

impl<'a, T> Usage<'a, T> {
    #[must_use]
    pub fn new(options: &'a OptionSet<T>) -> Self {
        Self { options }
    }
}

impl<T> Clone for Usage<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Usage<'_, T> {}

impl<T> fmt::Debug for Usage<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Usage")
            .field("label", &self.options.label())
            .finish_non_exhaustive()
    }
}

/// Everything on an option's line before its description: ` -s --long LABEL [+] `
fn option_head<T>(declaration: &Declaration<T>) -> impl Display + '_ {
    let tags = declaration.tags();

    let short = lazy_format!(match (tags.short()) {
        Some(short) => " -{short}",
        None => "   ",
    });

    let long = lazy_format!(match (tags.long()) {
        Some(long) => " --{long}",
        None => "",
    });

    let label = lazy_format!(match (declaration.takes_argument()) {
        true => (" {label}", label = declaration.argument().label()),
        false => "",
    });

    let multiple = lazy_format!(match (declaration.is_multiple()) {
        true => " [+]",
        false => "",
    });

    lazy_format!("{short}{long}{label}{multiple} ")
}

impl<T> Display for Usage<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "usage: {}", self.options.label())?;

        if self.options.is_empty() {
            return Ok(());
        }

        f.write_str(" [options]\n")?;

        for declaration in self.options {
            // lazy_format ignores padding, so the head is rendered first
            let head = option_head(declaration).to_string();

            write!(
                f,
                "\n{head:<width$}{description}",
                width = DESCRIPTION_COLUMN,
                description = declaration.description(),
            )?;
        }

        if self.options.iter().any(Declaration::is_multiple) {
            write!(f, "\n\n{MULTIPLE_NOTE}")?;
        }

        Ok(())
    }
}
