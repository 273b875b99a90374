/*!
The standard [`ConverterProvider`]s that make up
[`Registry::standard`][crate::Registry::standard]
 */

use std::borrow::Cow;
use std::ffi::OsString;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;

use url::Url;

use crate::convert::{ConverterProvider, RegistryBuilder};
use crate::errors::ConversionError;
use crate::qname::QualifiedName;

macro_rules! parsed {
    ($registry:ident: $($type:ty),* $(,)?) => {
        $($registry.parsed::<$type>();)*
    };
}

/// `bool`, `char`, every integer and float type, and the `core::net` address
/// types.
///
/// `bool` never fails: `true` in any case is `true`, and anything else is
/// `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveConverters;

impl ConverterProvider for PrimitiveConverters {
    fn register(&self, registry: &mut RegistryBuilder) {
        registry.converter(|raw: &str| Ok::<_, ConversionError>(raw.eq_ignore_ascii_case("true")));

        parsed! {
            registry:
            char,
            i8, i16, i32, i64, i128, isize,
            u8, u16, u32, u64, u128, usize,
            f32, f64,
            core::net::Ipv4Addr,
            core::net::Ipv6Addr,
            core::net::IpAddr,
            core::net::SocketAddr,
        }
    }
}

/// `String`, `PathBuf` and `OsString`. `String` is also assignable to the
/// shared and boxed string types.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextConverters;

impl ConverterProvider for TextConverters {
    fn register(&self, registry: &mut RegistryBuilder) {
        registry
            .converter(|raw: &str| Ok::<_, ConversionError>(raw.to_owned()))
            .assignable::<String, Box<str>>()
            .assignable::<String, Arc<str>>()
            .assignable::<String, Rc<str>>()
            .assignable::<String, Cow<'static, str>>()
            .converter(|raw: &str| Ok::<_, ConversionError>(PathBuf::from(raw)))
            .converter(|raw: &str| Ok::<_, ConversionError>(OsString::from(raw)));
    }
}

/// [`QualifiedName`], in Clark notation
#[derive(Debug, Clone, Copy, Default)]
pub struct NameConverters;

impl ConverterProvider for NameConverters {
    fn register(&self, registry: &mut RegistryBuilder) {
        registry.parsed::<QualifiedName>();
    }
}

/// [`http::Uri`] and [`url::Url`]. A string that isn't an absolute URL is
/// treated as a file path, relative to the working directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct UriConverters;

impl ConverterProvider for UriConverters {
    fn register(&self, registry: &mut RegistryBuilder) {
        registry.parsed::<http::Uri>().converter(parse_url);
    }
}

fn parse_url(raw: &str) -> Result<Url, ConversionError> {
    Url::parse(raw).or_else(|error| {
        let directory =
            std::env::current_dir().map_err(|io| ConversionError::format::<Url>(raw, io))?;

        Url::from_file_path(directory.join(raw))
            .map_err(|()| ConversionError::format::<Url>(raw, error))
    })
}
