use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand, ValueEnum};

use platform_flags::{
    config, configure, BuildOptions, BuildTarget, Lto, Optimize, Platform, Precision,
    TargetConfig, Visibility,
};

/// platform-flags command-line interface
#[derive(Parser)]
#[command(
    name = "platform-flags",
    version,
    about = "Compiler and linker flags for linux and web extension builds"
)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Command,
}

/// Supported subcommands
#[derive(Subcommand)]
enum Command {
    /// Configure a build environment and print it
    Configure(ConfigureArgs),
    /// Print the shared library name a build produces
    Name(NameArgs),
    /// List the options a platform adds
    Options(PlatformArgs),
    /// Check that the platform toolchain is installed
    Check(PlatformArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Json,
    Shell,
}

/// Options shared by every subcommand that configures a build. Anything
/// given here overrides the config file.
#[derive(Args, Debug)]
struct OptionArgs {
    /// Path to a TOML options file (defaults to the nearest `platform-flags.toml`)
    #[arg(long, env = "PLATFORM_FLAGS_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "PLATFORM_FLAGS_PLATFORM", value_enum)]
    platform: Option<Platform>,

    /// Target architecture (aliases like `amd64` or `aarch64` are accepted)
    #[arg(long, env = "PLATFORM_FLAGS_ARCH")]
    arch: Option<String>,

    #[arg(long, env = "PLATFORM_FLAGS_TARGET", value_enum)]
    target: Option<BuildTarget>,

    #[arg(long, env = "PLATFORM_FLAGS_LTO", value_enum)]
    lto: Option<Lto>,

    #[arg(long, env = "PLATFORM_FLAGS_THREADS")]
    threads: Option<bool>,

    #[arg(long)]
    use_llvm: Option<bool>,

    #[arg(long)]
    use_hot_reload: Option<bool>,

    #[arg(long)]
    dev_build: Option<bool>,

    #[arg(long, value_enum)]
    optimize: Option<Optimize>,

    #[arg(long)]
    debug_symbols: Option<bool>,

    #[arg(long, value_enum)]
    symbols_visibility: Option<Visibility>,

    #[arg(long)]
    disable_exceptions: Option<bool>,

    #[arg(long, value_enum)]
    precision: Option<Precision>,
}

impl OptionArgs {
    fn resolve(&self) -> anyhow::Result<BuildOptions> {
        let cwd = std::env::current_dir().context("cannot read current directory")?;
        let mut opts = config::load(self.config.as_deref(), &cwd)?;

        if let Some(platform) = self.platform {
            opts.platform = platform;
        }
        if let Some(arch) = &self.arch {
            opts.arch = Some(arch.clone());
        }
        if let Some(target) = self.target {
            opts.target = target;
        }
        if let Some(lto) = self.lto {
            opts.lto = lto;
        }
        if let Some(threads) = self.threads {
            opts.threads = threads;
        }
        if let Some(use_llvm) = self.use_llvm {
            opts.use_llvm = use_llvm;
        }
        if self.use_hot_reload.is_some() {
            opts.use_hot_reload = self.use_hot_reload;
        }
        if let Some(dev_build) = self.dev_build {
            opts.dev_build = dev_build;
        }
        if self.optimize.is_some() {
            opts.optimize = self.optimize;
        }
        if self.debug_symbols.is_some() {
            opts.debug_symbols = self.debug_symbols;
        }
        if let Some(visibility) = self.symbols_visibility {
            opts.symbols_visibility = visibility;
        }
        if let Some(disable) = self.disable_exceptions {
            opts.disable_exceptions = disable;
        }
        if let Some(precision) = self.precision {
            opts.precision = precision;
        }

        Ok(opts)
    }
}

#[derive(Args, Debug)]
struct ConfigureArgs {
    #[command(flatten)]
    options: OptionArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "json")]
    format: Format,
}

#[derive(Args, Debug)]
struct NameArgs {
    /// Library stem, e.g. `example` for `libexample.linux.template_debug.x86_64.so`
    stem: String,

    #[command(flatten)]
    options: OptionArgs,
}

#[derive(Args, Debug)]
struct PlatformArgs {
    #[arg(long, value_enum, default_value = "linux")]
    platform: Platform,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Configure(args) => {
            let opts = args.options.resolve()?;
            let mut env = opts.to_env();
            configure(&mut env)?;
            match args.format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&env)?),
                Format::Shell => print!("{}", env.to_shell()),
            }
        }
        Command::Name(args) => {
            let opts = args.options.resolve()?;
            let mut env = opts.to_env();
            configure(&mut env)?;
            println!(
                "{}",
                TargetConfig::from_options(&opts).library_name(&args.stem, &env)
            );
        }
        Command::Options(args) => {
            let decls = args.platform.configurator().options();
            if decls.is_empty() {
                println!("{} adds no options", args.platform);
            }
            for decl in decls {
                println!("{}: {} (default: {})", decl.name, decl.help, decl.default);
            }
        }
        Command::Check(args) => {
            let configurator = args.platform.configurator();
            if !configurator.exists() {
                bail!("toolchain for {} not found", configurator.name());
            }
            log::info!("toolchain for {} found", configurator.name());
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
