/*!
The converter registry: turns the raw text of an argument into a typed value.

A [`Registry`] is an ordered list of converters, one per source type. Each
converter can also declare that its type is *assignable* to other types
(through [`Into`]); when there's no converter for a requested type, the first
converter in registration order that's assignable to it is used instead, and
its result is upcast.

Registries are built once with a [`RegistryBuilder`], usually from a handful of
[`ConverterProvider`]s, and are immutable afterwards. The process-wide
registry is [`Registry::global`], which is [`Registry::standard`] unless
something else was [installed][Registry::install] first.
 */

use core::fmt;
use core::str::FromStr;
use std::any::type_name;

use joinery::JoinableIterator;
use once_cell::sync::OnceCell;
use tracing::{trace, warn};

use crate::action::{ParameterType, Value};
use crate::errors::ConversionError;
use crate::impls::{NameConverters, PrimitiveConverters, TextConverters, UriConverters};

type ConvertFn = Box<dyn Fn(&str) -> Result<Value, ConversionError> + Send + Sync>;
type UpcastFn = Box<dyn Fn(Value) -> Result<Value, ConversionError> + Send + Sync>;

/// A set of related converters, registered together
pub trait ConverterProvider {
    fn register(&self, registry: &mut RegistryBuilder);
}

struct Assignable {
    target: ParameterType,
    upcast: UpcastFn,
}

struct Entry {
    source: ParameterType,
    convert: Option<ConvertFn>,
    assignable: Vec<Assignable>,
}

impl Entry {
    fn upcast_to(&self, target: &ParameterType) -> Option<&UpcastFn> {
        self.assignable
            .iter()
            .find(|assignable| assignable.target == *target)
            .map(|assignable| &assignable.upcast)
    }
}

/// Collects converters for a [`Registry`]
#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<Entry>,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&mut self, source: ParameterType) -> &mut Entry {
        let found = self
            .entries
            .iter()
            .position(|entry| entry.source == source);

        let index = match found {
            Some(index) => index,
            None => {
                self.entries.push(Entry {
                    source,
                    convert: None,
                    assignable: Vec::new(),
                });
                self.entries.len() - 1
            }
        };

        &mut self.entries[index]
    }

    /// Register the converter for `S`. A type registered twice keeps its
    /// original position, with the newer converter.
    pub fn converter<S: 'static>(
        &mut self,
        convert: impl Fn(&str) -> Result<S, ConversionError> + Send + Sync + 'static,
    ) -> &mut Self {
        self.entry(ParameterType::of::<S>()).convert = Some(Box::new(move |raw: &str| {
            convert(raw).map(|value| Box::new(value) as Value)
        }));
        self
    }

    /// Register `S`, converted with its [`FromStr`] implementation
    pub fn parsed<S>(&mut self) -> &mut Self
    where
        S: FromStr + 'static,
        S::Err: fmt::Display,
    {
        self.converter(|raw| {
            raw.parse::<S>()
                .map_err(|error| ConversionError::format::<S>(raw, error))
        })
    }

    /// Declare that values converted to `S` can stand in for `T`
    pub fn assignable<S, T>(&mut self) -> &mut Self
    where
        S: Into<T> + 'static,
        T: 'static,
    {
        let target = ParameterType::of::<T>();
        let entry = self.entry(ParameterType::of::<S>());

        if entry.upcast_to(&target).is_none() {
            entry.assignable.push(Assignable {
                target,
                upcast: Box::new(|value| {
                    value
                        .downcast::<S>()
                        .map(|value| Box::new(Into::<T>::into(*value)) as Value)
                        .map_err(|_| ConversionError::TypeMismatch {
                            type_name: type_name::<S>(),
                        })
                }),
            });
        }

        self
    }

    pub fn provider(&mut self, provider: impl ConverterProvider) -> &mut Self {
        provider.register(self);
        self
    }

    /// Freeze the registry. Assignable declarations for a type that never got
    /// a converter are dropped.
    #[must_use]
    pub fn build(self) -> Registry {
        let entries = self
            .entries
            .into_iter()
            .filter(|entry| {
                if entry.convert.is_none() {
                    warn!(
                        source = entry.source.name(),
                        "dropping assignable declarations for a type with no converter"
                    );
                }

                entry.convert.is_some()
            })
            .collect();

        Registry { entries }
    }
}

impl fmt::Debug for RegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.source))
            .finish()
    }
}

/// An immutable, ordered set of string converters
pub struct Registry {
    entries: Vec<Entry>,
}

static GLOBAL: OnceCell<Registry> = OnceCell::new();

impl Registry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// A registry with every standard converter: primitives, text, qualified
    /// names, and URIs, in that order
    #[must_use]
    pub fn standard() -> Self {
        let mut builder = Self::builder();

        builder
            .provider(PrimitiveConverters)
            .provider(TextConverters)
            .provider(NameConverters)
            .provider(UriConverters);

        builder.build()
    }

    /// The process-wide registry, initialized to [`Registry::standard`] on
    /// first use unless another registry was installed
    pub fn global() -> &'static Registry {
        GLOBAL.get_or_init(Self::standard)
    }

    /// Install `registry` as the process-wide registry. This only works
    /// once, and only before [`Registry::global`] is first used; otherwise the
    /// registry is handed back.
    pub fn install(registry: Registry) -> Result<(), Registry> {
        GLOBAL.set(registry)
    }

    /// The registered types, in registration order
    pub fn types(&self) -> impl Iterator<Item = ParameterType> + '_ {
        self.entries.iter().map(|entry| entry.source)
    }

    /// True if values of type `ty` can be converted, directly or through an
    /// assignable type
    #[must_use]
    pub fn supports(&self, ty: &ParameterType) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.source == *ty || entry.upcast_to(ty).is_some())
    }

    /// Convert `raw` into a value of type `ty`
    pub fn convert(&self, raw: &str, ty: &ParameterType) -> Result<Value, ConversionError> {
        if let Some(entry) = self.entries.iter().find(|entry| entry.source == *ty) {
            trace!(raw, target = ty.name(), "converting");
            return Self::apply(entry, raw);
        }

        self.entries
            .iter()
            .find_map(|entry| entry.upcast_to(ty).map(|upcast| (entry, upcast)))
            .ok_or(ConversionError::Unsupported {
                type_name: ty.name(),
            })
            .and_then(|(entry, upcast)| {
                trace!(
                    raw,
                    target = ty.name(),
                    through = entry.source.name(),
                    "converting"
                );
                upcast(Self::apply(entry, raw)?)
            })
    }

    /// Convert `raw` into a `T`
    pub fn convert_to<T: 'static>(&self, raw: &str) -> Result<T, ConversionError> {
        self.convert(raw, &ParameterType::of::<T>())?
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| ConversionError::TypeMismatch {
                type_name: type_name::<T>(),
            })
    }

    fn apply(entry: &Entry, raw: &str) -> Result<Value, ConversionError> {
        match entry.convert {
            Some(ref convert) => convert(raw),
            None => Err(ConversionError::Unsupported {
                type_name: entry.source.name(),
            }),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Registry [{}]",
            self.entries
                .iter()
                .map(|entry| entry.source.name())
                .join_with(", ")
        )
    }
}
