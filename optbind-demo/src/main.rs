use std::collections::BTreeMap;
use std::io;

use anyhow::Context as _;
use lazy_format::lazy_format;
use once_cell::sync::OnceCell;
use optbind::launcher::standard_options;
use optbind::{
    Binder, BoxError, Command, Declarations, Launcher, LoadedArguments, Opt, QualifiedName,
    Verbosity,
};
use tracing::level_filters::LevelFilter;
use tracing::{debug, info, warn};
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{Registry, fmt, reload};

use crate::error::InventoryError;

mod error;

static FILTER: OnceCell<reload::Handle<LevelFilter, Registry>> = OnceCell::new();

/// Add up named sizes from the command line
#[derive(Debug, Default)]
struct Inventory {
    verbosity: Verbosity,
    sizes: BTreeMap<String, u64>,
    unit: Option<String>,
    scale: Option<u64>,
    tags: Vec<QualifiedName>,
}

impl Inventory {
    fn define(&mut self, name: String, size: u64) -> Result<(), InventoryError> {
        if self.sizes.contains_key(&name) {
            return Err(InventoryError::Redefined { name });
        }

        debug!(%name, size, "defined");
        self.sizes.insert(name, size);
        Ok(())
    }

    /// `--validate`: exit with 0 if there's something to report, 2 otherwise
    fn validate(&mut self) -> i32 {
        if self.sizes.is_empty() { 2 } else { 0 }
    }

    fn scaled(&self) -> Result<BTreeMap<&str, u64>, InventoryError> {
        let scale = self.scale.unwrap_or(1);

        self.sizes
            .iter()
            .map(|(name, &size)| {
                size.checked_mul(scale)
                    .map(|size| (name.as_str(), size))
                    .ok_or_else(|| InventoryError::Overflow {
                        name: name.clone(),
                        scale,
                    })
            })
            .collect()
    }
}

impl Command for Inventory {
    const NAME: &'static str = "optbind-demo";

    fn declare(options: &mut Declarations<Self>) {
        standard_options(options);

        options
            .add(
                Opt::new()
                    .short('d')
                    .long("define")
                    .description("a named size; can be given once per name")
                    .label("NAME=SIZE")
                    .pattern(r"([^=]+)=([0-9]+)")
                    .multiple()
                    .action(Inventory::define),
            )
            .add(
                Opt::new()
                    .short('u')
                    .long("unit")
                    .description("the unit sizes are reported in")
                    .label("UNIT")
                    .action(|inventory: &mut Inventory, unit: String| inventory.unit = Some(unit)),
            )
            .add(
                Opt::new()
                    .long("scale")
                    .description("multiply every size by this factor")
                    .label("FACTOR")
                    .action(|inventory: &mut Inventory, scale: u64| {
                        inventory.scale = Some(scale)
                    }),
            )
            .add(
                Opt::new()
                    .short('t')
                    .long("tag")
                    .description("tag the report with a qualified name, such as {urn:example}size")
                    .label("QNAME")
                    .multiple()
                    .action(|inventory: &mut Inventory, tag: QualifiedName| {
                        inventory.tags.push(tag)
                    }),
            )
            .add(
                Opt::new()
                    .long("validate")
                    .description("exit with 0 if any size is defined and 2 otherwise")
                    .exit()
                    .action(Inventory::validate),
            );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        if self.sizes.is_empty() {
            return Err(InventoryError::Empty.into());
        }

        let sizes = self.scaled()?;
        let unit = self.unit.as_deref().unwrap_or("bytes");
        let total: u64 = sizes.values().sum();

        info!(count = sizes.len(), total, "reporting");

        let tags = &self.tags;
        let tags = lazy_format!("tag: {tag}\n" for tag in tags.iter());
        let lines = lazy_format!("{name}: {size} {unit}\n" for (name, size) in sizes.iter());

        println!("{tags}{lines}total: {total} {unit}");
        Ok(())
    }
}

impl Launcher for Inventory {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    fn verbosity_changed(&mut self, verbosity: Verbosity) {
        if let Some(handle) = FILTER.get()
            && let Err(error) = handle.reload(verbosity.level_filter())
        {
            warn!(%error, "failed to change the log level");
        }
    }
}

/// Log to stderr, at a level the `--quiet` and `--verbose` switches can
/// change later
fn init_tracing() -> anyhow::Result<()> {
    let (filter, handle) = reload::Layer::new(Verbosity::default().level_filter());

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .try_init()
        .context("failed to install the tracing subscriber")?;

    FILTER
        .set(handle)
        .map_err(|_| anyhow::anyhow!("the log filter was already installed"))
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let arguments = LoadedArguments::from_env();
    let binder = Binder::<Inventory>::new().context("invalid option declarations")?;

    debug!(program = arguments.argv0(), "starting");
    std::process::exit(arguments.main(&binder))
}
