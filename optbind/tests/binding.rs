//! End-to-end binding of command lines to commands: declaration, scanning,
//! conversion, replay, and usage text.

use std::collections::BTreeMap;

use optbind::launcher::standard_options;
use optbind::{
    ArgumentError, Binder, BoxError, Command, ConversionError, Declarations, Error, Failure,
    Launcher, Opt, ParseError, Verbosity,
};

#[derive(Debug, Default)]
struct Simple {
    ran: bool,
}

impl Command for Simple {
    const NAME: &'static str = "java -jar something.jar";

    fn declare(_: &mut Declarations<Self>) {}

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        self.ran = true;
        Ok(())
    }
}

#[test]
fn no_options_runs_the_command() {
    let (simple, code) = optbind::execute::<Simple>(Vec::<&str>::new()).unwrap();

    assert!(simple.ran);
    assert_eq!(code, 0);
}

#[test]
fn no_options_rejects_any_option() {
    let error = optbind::execute::<Simple>(["--anything"]).unwrap_err();

    assert!(error.is_input());
}

#[derive(Debug, Default)]
struct Sample {
    verbosity: Verbosity,
    usage: Option<String>,
    aaa: String,
    bbb: String,
    ccc: String,
    switched: bool,
    ran: bool,
}

impl Command for Sample {
    const NAME: &'static str = "java -jar sample.jar";

    fn declare(options: &mut Declarations<Self>) {
        standard_options(options);

        options
            .add(
                Opt::new()
                    .short('a')
                    .long("aaa")
                    .description("the A")
                    .action(|sample: &mut Sample, aaa: String| sample.aaa = aaa),
            )
            .add(
                Opt::new()
                    .long("bbb")
                    .description("the B")
                    .action(|sample: &mut Sample, bbb: String| sample.bbb = bbb),
            )
            .add(
                Opt::new()
                    .short('c')
                    .description("the C")
                    .action(|sample: &mut Sample, ccc: String| sample.ccc = ccc),
            )
            .add(
                Opt::new()
                    .short('s')
                    .long("switch")
                    .description("Some switch")
                    .exit()
                    .action(|sample: &mut Sample| sample.switched = true),
            );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        self.ran = true;
        Ok(())
    }
}

impl Launcher for Sample {
    fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    fn show_usage(&mut self, usage: &str) {
        self.usage = Some(usage.to_owned());
    }
}

#[test]
fn sample_binds_every_option() {
    let (sample, code) = optbind::execute::<Sample>([
        "-a", "AAA", "--bbb", "BBB", "-c", "CCC",
    ])
    .unwrap();

    assert_eq!(sample.aaa, "AAA");
    assert_eq!(sample.bbb, "BBB");
    assert_eq!(sample.ccc, "CCC");
    assert_eq!(sample.verbosity, Verbosity::Normal);
    assert!(sample.ran);
    assert_eq!(code, 0);
}

#[test]
fn sample_quiet() {
    let (sample, code) = optbind::execute::<Sample>([
        "-q", "-a", "AAA", "--bbb", "BBB", "-c", "CCC",
    ])
    .unwrap();

    assert_eq!(sample.aaa, "AAA");
    assert_eq!(sample.bbb, "BBB");
    assert_eq!(sample.ccc, "CCC");
    assert_eq!(sample.verbosity, Verbosity::Quiet);
    assert!(sample.ran);
    assert_eq!(code, 0);
}

#[test]
fn sample_help() {
    let (sample, code) = optbind::execute::<Sample>(["-h"]).unwrap();

    assert!(!sample.ran);
    assert_eq!(code, 0);

    let usage = sample.usage.unwrap();
    assert!(usage.starts_with("usage: java -jar sample.jar [options]\n"));
    assert!(usage.contains("\n -a --aaa VALUE               the A"));
}

#[test]
fn sample_unsupported_flag() {
    let error = optbind::execute::<Sample>(["-z"]).unwrap_err();

    assert!(matches!(
        error,
        Error::Parse(ParseError::UnknownOption { ref token }) if token == "-z"
    ));
}

#[test]
fn sample_switch_exits() {
    let (sample, code) = optbind::execute::<Sample>(["-s"]).unwrap();

    assert!(sample.switched);
    assert!(!sample.ran);
    assert_eq!(code, 0);
}

#[derive(Debug, Default)]
struct Values {
    boolean: bool,
    int: i32,
    string: String,
    double: f64,
}

impl Command for Values {
    const NAME: &'static str = "values";

    fn declare(options: &mut Declarations<Self>) {
        options
            .add(
                Opt::new()
                    .short('b')
                    .description("some boolean value")
                    .action(|values: &mut Values, boolean: bool| values.boolean = boolean),
            )
            .add(
                Opt::new()
                    .long("int")
                    .description("some int value")
                    .label("NUMBER")
                    .action(|values: &mut Values, int: i32| values.int = int),
            )
            .add(
                Opt::new()
                    .short('s')
                    .long("string")
                    .description("some String value")
                    .action(|values: &mut Values, string: String| values.string = string),
            )
            .add(
                Opt::new()
                    .short('d')
                    .description("some double value")
                    .action(|values: &mut Values, double: f64| values.double = double),
            );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[test]
fn arguments_are_converted_to_parameter_types() {
    let (values, code) = optbind::execute::<Values>([
        "-b", "true", "--int", "123", "--string", "abc", "-d", "1.0",
    ])
    .unwrap();

    assert!(values.boolean);
    assert_eq!(values.int, 123);
    assert_eq!(values.string, "abc");
    assert_eq!(values.double, 1.0);
    assert_eq!(code, 0);
}

#[test]
fn conversion_errors_are_input_errors() {
    let error = optbind::execute::<Values>(["--int", "abc"]).unwrap_err();

    assert!(matches!(
        error,
        Error::Parse(ParseError::Argument {
            ref token,
            ref argument,
            error: ArgumentError::Conversion(ConversionError::Format { type_name: "i32", .. }),
        }) if token == "--int" && argument == "abc"
    ));
    assert_eq!(error.exit_code(&Default::default()), 100);
}

#[test]
fn values_usage() {
    let binder = Binder::<Values>::new().unwrap();

    assert_eq!(
        binder.usage().to_string(),
        "usage: values [options]\n\
         \n -b VALUE                     some boolean value\
         \n    --int NUMBER              some int value\
         \n -s --string VALUE            some String value\
         \n -d VALUE                     some double value"
    );
}

#[derive(Debug, Default)]
struct Exit {
    exited: bool,
    ran: bool,
}

impl Command for Exit {
    const NAME: &'static str = "exit";

    fn declare(options: &mut Declarations<Self>) {
        options.add(
            Opt::new()
                .long("exit")
                .description("exit")
                .exit()
                .action(|exit: &mut Exit| exit.exited = true),
        );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        self.ran = true;
        Ok(())
    }
}

#[test]
fn exit_options_skip_the_entry_point() {
    let (exit, code) = optbind::execute::<Exit>(["--exit"]).unwrap();

    assert!(exit.exited);
    assert!(!exit.ran);
    assert_eq!(code, 0);
}

#[derive(Debug, Default)]
struct Pair {
    name: String,
    size: i32,
}

impl Command for Pair {
    const NAME: &'static str = "pair";

    fn declare(options: &mut Declarations<Self>) {
        options.add(
            Opt::new()
                .short('o')
                .description("option")
                .label("NAME=SIZE")
                .pattern("([a-zA-Z]+)=([0-9]+)")
                .action(|pair: &mut Pair, name: String, size: i32| {
                    pair.name = name;
                    pair.size = size;
                }),
        );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[test]
fn patterns_feed_several_parameters() {
    let (pair, _) = optbind::execute::<Pair>(["-o", "abc=4"]).unwrap();

    assert_eq!(pair.name, "abc");
    assert_eq!(pair.size, 4);
}

#[test]
fn pattern_mismatch_is_an_input_error() {
    let error = optbind::execute::<Pair>(["-o", "abc"]).unwrap_err();

    assert!(matches!(
        error,
        Error::Parse(ParseError::Argument {
            error: ArgumentError::Mismatch { .. },
            ..
        })
    ));
}

#[test]
fn pattern_pieces_are_converted() {
    let error = optbind::execute::<Pair>(["-o", "abc=def"]).unwrap_err();

    assert!(matches!(
        error,
        Error::Parse(ParseError::Argument {
            error: ArgumentError::Mismatch { .. },
            ..
        })
    ));

    let error = optbind::execute::<Pair>(["-o", "abc=99999999999"]).unwrap_err();

    assert!(matches!(
        error,
        Error::Parse(ParseError::Argument {
            error: ArgumentError::Conversion(ConversionError::Format { type_name: "i32", .. }),
            ..
        })
    ));
}

#[derive(Debug, Default)]
struct Sizes {
    sizes: BTreeMap<String, u64>,
    order: Vec<String>,
    output: Option<String>,
    checked: bool,
}

impl Command for Sizes {
    const NAME: &'static str = "sizes";

    fn declare(options: &mut Declarations<Self>) {
        options
            .add(
                Opt::new()
                    .short('D')
                    .long("define")
                    .description("define a size")
                    .label("NAME=SIZE")
                    .pattern("([a-z]+)=([0-9]+)")
                    .multiple()
                    .action(|sizes: &mut Sizes, name: String, size: u64| {
                        sizes.order.push(name.clone());
                        sizes.sizes.insert(name, size);
                    }),
            )
            .add(
                Opt::new()
                    .short('o')
                    .long("output")
                    .description("where to write")
                    .label("FILE")
                    .required()
                    .action(|sizes: &mut Sizes, output: String| sizes.output = Some(output)),
            )
            .add(
                Opt::new()
                    .long("check")
                    .description("check the sizes")
                    .action(|sizes: &mut Sizes| -> anyhow::Result<()> {
                        anyhow::ensure!(!sizes.sizes.is_empty(), "nothing to check");
                        sizes.checked = true;
                        Ok(())
                    }),
            )
            .add(
                Opt::new()
                    .long("limit")
                    .description("fail with code 3 when a size is over the limit")
                    .action(|sizes: &mut Sizes, limit: u64| -> Result<(), Failure> {
                        if sizes.sizes.values().any(|&size| size > limit) {
                            return Err(Failure::new(3, "over the limit"));
                        }

                        Ok(())
                    }),
            );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Self::default())
    }

    fn run(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[test]
fn multiple_options_replay_in_command_line_order() {
    let (sizes, _) = optbind::execute::<Sizes>([
        "-D", "c=3", "--output", "out.txt", "--define", "a=1", "-D", "b=2",
    ])
    .unwrap();

    assert_eq!(sizes.order, ["c", "a", "b"]);
    assert_eq!(sizes.sizes["a"], 1);
    assert_eq!(sizes.output.as_deref(), Some("out.txt"));
}

#[test]
fn single_options_can_only_appear_once() {
    let error = optbind::execute::<Sizes>(["-o", "a", "--output", "b"]).unwrap_err();

    assert!(matches!(
        error,
        Error::Parse(ParseError::Duplicate { ref token }) if token == "--output"
    ));
}

#[test]
fn required_options_must_appear() {
    let error = optbind::execute::<Sizes>(["-D", "a=1"]).unwrap_err();

    assert!(matches!(
        error,
        Error::Parse(ParseError::MissingRequired { ref option }) if option == "--output"
    ));
    assert!(error.is_input());
}

#[test]
fn action_errors_keep_their_cause() {
    let error = optbind::execute::<Sizes>(["-o", "x", "--check"]).unwrap_err();

    assert!(matches!(error, Error::Action { ref option, .. } if option == "--check"));
    assert_eq!(
        std::error::Error::source(&error).map(ToString::to_string),
        Some("nothing to check".to_owned())
    );
    assert_eq!(error.exit_code(&Default::default()), 1);
}

#[test]
fn failures_choose_the_exit_code() {
    let binder = Binder::<Sizes>::new().unwrap();

    assert_eq!(binder.main(["-o", "x", "-D", "a=10", "--limit", "5"]), 3);
    assert_eq!(binder.main(["-o", "x", "-D", "a=10", "--limit", "50"]), 0);
}

#[test]
fn sizes_usage() {
    let binder = Binder::<Sizes>::new().unwrap();

    assert_eq!(
        binder.usage().to_string(),
        "usage: sizes [options]\n\
         \n -D --define NAME=SIZE [+]    define a size\
         \n -o --output FILE             where to write\
         \n    --check                   check the sizes\
         \n    --limit VALUE             fail with code 3 when a size is over the limit\
         \n\n[+] marked option can be specified multiple times"
    );
}

#[derive(Debug)]
struct Broken;

impl Command for Broken {
    const NAME: &'static str = "broken";

    fn declare(options: &mut Declarations<Self>) {
        options
            .add(
                Opt::new()
                    .short('a')
                    .description("one")
                    .action(|_: &mut Broken| {}),
            )
            .add(
                Opt::new()
                    .short('a')
                    .description("two")
                    .action(|_: &mut Broken| {}),
            );
    }

    fn create() -> Result<Self, BoxError> {
        Ok(Broken)
    }

    fn run(&mut self) -> Result<(), BoxError> {
        Ok(())
    }
}

#[test]
fn broken_declarations_fail_before_scanning() {
    let error = optbind::execute::<Broken>(["--not-even-declared"]).unwrap_err();

    assert!(matches!(error, Error::Declaration(_)));
    assert!(!error.is_input());
}
