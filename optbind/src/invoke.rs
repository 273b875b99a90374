/*!
The invocation driver: turns a scanned command line into a configured target
and an exit code.
 */

use tracing::debug;

use crate::declaration::OptionSet;
use crate::errors::{BoxError, Error, ParseError};
use crate::scan::Pending;

/**
Replay `pending` onto a fresh target.

1. Every required option must have been seen; otherwise nothing is created.
2. The target is built with `create`.
3. Options are replayed in declaration order, each option's invocations in
   command-line order.
4. The first [exit option][crate::Opt::exit] to complete ends the run; its
   integer return value, or `0`, is the exit code.
5. Otherwise `entry` runs and the exit code is `0`.

Integers returned by options that aren't exit options are ignored.
 */
pub fn run<T>(
    options: &OptionSet<T>,
    mut pending: Pending,
    create: impl FnOnce() -> Result<T, BoxError>,
    entry: impl FnOnce(&mut T) -> Result<(), BoxError>,
) -> Result<(T, i32), Error> {
    if let Some(missing) = options
        .iter()
        .enumerate()
        .find(|&(index, declaration)| declaration.is_required() && pending.count(index) == 0)
        .map(|(_, declaration)| declaration)
    {
        return Err(ParseError::MissingRequired {
            option: missing.tags().to_string(),
        }
        .into());
    }

    let mut target = create().map_err(Error::Construction)?;

    for (index, declaration) in options.iter().enumerate() {
        for arguments in pending.take(index) {
            debug!(option = %declaration.tags(), "invoking");

            let code = declaration
                .invoke(&mut target, arguments)
                .map_err(|source| Error::Action {
                    option: declaration.tags().to_string(),
                    source,
                })?;

            if declaration.is_exit() {
                let code = code.unwrap_or(0);
                debug!(option = %declaration.tags(), code, "exit option completed");
                return Ok((target, code));
            }
        }
    }

    entry(&mut target).map_err(Error::Run)?;
    Ok((target, 0))
}
