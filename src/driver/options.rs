use std::path::PathBuf;

use structopt::StructOpt;

#[derive(Debug, StructOpt)]
pub struct GenerateOptions {
    #[structopt(name = "CATALOG", help = "JSON catalog of operator schemas", parse(from_os_str))]
    pub catalog_path: PathBuf,

    #[structopt(
        long = "output-dir",
        short = "o",
        help = "Directory to write the generated files to",
        default_value = ".",
        parse(from_os_str)
    )]
    pub output_dir: PathBuf,

    #[structopt(
        long = "config",
        help = "JSON file replacing the built-in operator tables",
        parse(from_os_str)
    )]
    pub config_path: Option<PathBuf>,

    #[structopt(
        long = "dispatch-key",
        help = "Backend whose kernel bindings are used",
        default_value = "CPU"
    )]
    pub dispatch_key: String,

    #[structopt(
        long = "ops-file",
        help = "File name for the dispatch registrations",
        default_value = "generated_ops.cpp"
    )]
    pub ops_file: String,

    #[structopt(
        long = "tests-file",
        help = "File name for the generated tests",
        default_value = "test_generated_ops.cc"
    )]
    pub tests_file: String,

    #[structopt(long, help = "Only generate the dispatch registrations")]
    pub skip_tests: bool,
}

#[derive(Debug, StructOpt)]
pub struct ClassifyOptions {
    #[structopt(name = "CATALOG", help = "JSON catalog of operator schemas", parse(from_os_str))]
    pub catalog_path: PathBuf,

    #[structopt(
        long = "config",
        help = "JSON file replacing the built-in operator tables",
        parse(from_os_str)
    )]
    pub config_path: Option<PathBuf>,

    #[structopt(long, help = "Only print rejected groups")]
    pub rejected: bool,
}
