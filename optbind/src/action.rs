/*!
Typed actions, and the type-erased form they are stored in.

An action is any `Fn(&mut T, A, B, ...)` with up to four parameters, whose
return type is one of `()`, `i32`, `Result<(), E>` or `Result<i32, E>`. The
parameter types are recorded as [`ParameterType`]s so that the scanner knows
what to convert each piece of an argument into.

Return types other than nothing or an integer don't compile:

```compile_fail
use optbind::Opt;

struct Target;

let opt = Opt::<Target>::new()
    .long("name")
    .description("returns a string")
    .action(|_: &mut Target| String::from("nope"));
```
 */

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::BoxError;

/// A converted argument, waiting to be handed to an action
pub type Value = Box<dyn Any>;

/// The type-erased form of an [`Action`] bound to a target `T`
pub(crate) type ErasedAction<T> =
    Box<dyn Fn(&mut T, Vec<Value>) -> Result<Option<i32>, BoxError> + Send + Sync>;

/// The identity of a parameter type, with a readable name for messages
#[derive(Clone, Copy)]
pub struct ParameterType {
    id: TypeId,
    name: &'static str,
}

impl ParameterType {
    #[inline]
    #[must_use]
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    #[inline]
    #[must_use]
    pub fn id(&self) -> TypeId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ParameterType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ParameterType {}

impl Hash for ParameterType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/**
The return value of an action. `None` means the action returned nothing;
`Some(code)` is an integer it returned, which becomes the exit code when the
action belongs to an [exit option][crate::Opt::exit].
 */
pub trait ActionOutput {
    fn into_exit_code(self) -> Result<Option<i32>, BoxError>;
}

impl ActionOutput for () {
    #[inline]
    fn into_exit_code(self) -> Result<Option<i32>, BoxError> {
        Ok(None)
    }
}

impl ActionOutput for i32 {
    #[inline]
    fn into_exit_code(self) -> Result<Option<i32>, BoxError> {
        Ok(Some(self))
    }
}

impl<E: Into<BoxError>> ActionOutput for Result<(), E> {
    #[inline]
    fn into_exit_code(self) -> Result<Option<i32>, BoxError> {
        self.map(|()| None).map_err(Into::into)
    }
}

impl<E: Into<BoxError>> ActionOutput for Result<i32, E> {
    #[inline]
    fn into_exit_code(self) -> Result<Option<i32>, BoxError> {
        self.map(Some).map_err(Into::into)
    }
}

/**
A callable that can be bound to an option of a target `T`. `Params` is a tuple
of the parameter types, and exists only so that closures of every arity can
implement this trait; it is always inferred.

Closures need their parameter types spelled out, such as
`|target: &mut Target, size: u32| ...`, so that the parameter types can be
inferred.
 */
pub trait Action<T, Params>: Send + Sync + 'static {
    /// The parameter types, in order
    fn parameters() -> Vec<ParameterType>;

    /// Call the action with converted arguments, one per parameter
    fn invoke(&self, target: &mut T, arguments: Vec<Value>) -> Result<Option<i32>, BoxError>;
}

/// Pull the next argument out and downcast it to the parameter type
fn take<P: 'static>(arguments: &mut impl Iterator<Item = Value>) -> Result<P, BoxError> {
    let value = arguments
        .next()
        .ok_or_else(|| format!("missing an argument of type {}", type_name::<P>()))?;

    value
        .downcast::<P>()
        .map(|value| *value)
        .map_err(|_| BoxError::from(format!("argument isn't a {}", type_name::<P>())))
}

macro_rules! actions {
    ($($($param:ident)*;)*) => {
        $(
            impl<T, F, O, $($param,)*> Action<T, ($($param,)*)> for F
            where
                F: Fn(&mut T, $($param),*) -> O + Send + Sync + 'static,
                O: ActionOutput,
                $($param: 'static,)*
            {
                #[inline]
                fn parameters() -> Vec<ParameterType> {
                    Vec::from([$(ParameterType::of::<$param>()),*])
                }

                #[allow(non_snake_case, unused_mut, unused_variables)]
                fn invoke(
                    &self,
                    target: &mut T,
                    arguments: Vec<Value>,
                ) -> Result<Option<i32>, BoxError> {
                    let mut arguments = arguments.into_iter();
                    $(let $param = take::<$param>(&mut arguments)?;)*

                    self(target, $($param),*).into_exit_code()
                }
            }
        )*
    };
}

actions! {
    ;
    A;
    A B;
    A B C;
    A B C D;
}

/// Erase an action, recording its parameter types
pub(crate) fn erase<T, P, A>(action: A) -> (Vec<ParameterType>, ErasedAction<T>)
where
    T: 'static,
    P: 'static,
    A: Action<T, P>,
{
    (
        A::parameters(),
        Box::new(move |target: &mut T, arguments| action.invoke(target, arguments)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Target {
        name: String,
        size: u32,
        calls: usize,
    }

    impl Target {
        fn set_name(&mut self, name: String) {
            self.name = name;
        }
    }

    fn values(values: impl IntoIterator<Item = Value>) -> Vec<Value> {
        values.into_iter().collect()
    }

    #[test]
    fn records_parameter_types_in_order() {
        let (parameters, _) = erase(|target: &mut Target, name: String, size: u32| {
            target.name = name;
            target.size = size;
        });

        assert_eq!(
            parameters,
            [ParameterType::of::<String>(), ParameterType::of::<u32>()]
        );
    }

    #[test]
    fn invokes_with_downcast_arguments() {
        let (_, action) = erase(|target: &mut Target, name: String, size: u32| {
            target.name = name;
            target.size = size;
        });
        let mut target = Target::default();

        let code = action(
            &mut target,
            values([Box::new(String::from("abc")) as Value, Box::new(4u32)]),
        )
        .unwrap();

        assert_eq!(code, None);
        assert_eq!(target.name, "abc");
        assert_eq!(target.size, 4);
    }

    #[test]
    fn integer_returns_become_exit_codes() {
        let (parameters, action) = erase(|target: &mut Target| {
            target.calls += 1;
            3
        });
        let mut target = Target::default();

        assert!(parameters.is_empty());
        assert_eq!(action(&mut target, Vec::new()).unwrap(), Some(3));
        assert_eq!(target.calls, 1);
    }

    #[test]
    fn errors_propagate() {
        let (_, action) = erase(|_: &mut Target| -> Result<i32, std::fmt::Error> {
            Err(std::fmt::Error)
        });

        assert!(action(&mut Target::default(), Vec::new()).is_err());
    }

    #[test]
    fn wrong_argument_type_is_an_error() {
        let (_, action) = erase(|target: &mut Target, size: u32| target.size = size);

        let result = action(&mut Target::default(), values([Box::new(4i64) as Value]));

        assert!(result.is_err());
    }

    #[test]
    fn methods_are_actions() {
        let (parameters, action) = erase(Target::set_name);
        let mut target = Target::default();
        action(&mut target, values([Box::new(String::from("x")) as Value])).unwrap();

        assert_eq!(parameters, [ParameterType::of::<String>()]);
        assert_eq!(target.name, "x");
    }
}
