use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Args;
use rayon::prelude::*;

use platform_flags::{configure, keys, BuildOptions, Lto, Platform};

#[derive(Args, Debug)]
pub struct MatrixArgs {
    /// Path to YAML config (defaults to `<workspace>/matrix.yaml`)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Only run matrix entries for these platforms (repeatable).
    ///
    /// Example: `xtask matrix -p web`
    #[arg(short = 'p', long = "platform", value_enum)]
    pub platforms: Vec<Platform>,

    /// Print the resulting flags of every combination
    #[arg(long)]
    pub verbose: bool,
}

#[derive(serde::Deserialize)]
struct MatrixConfig {
    entries: Vec<MatrixEntry>,
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum Values<T> {
    /// `arch: x86_64`
    One(T),
    /// `arch: [ ... ]` (supports scalars and nested lists, so YAML aliases can expand cleanly)
    Many(Vec<Values<T>>),
}

impl<T: Clone> Values<T> {
    fn flatten_into(&self, out: &mut Vec<T>) {
        match self {
            Values::One(v) => out.push(v.clone()),
            Values::Many(vs) => {
                for inner in vs {
                    inner.flatten_into(out);
                }
            }
        }
    }

    fn flatten(&self) -> Vec<T> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }
}

#[derive(serde::Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
enum Expect {
    #[default]
    Ok,
    Fail,
}

fn default_threads() -> Values<bool> {
    Values::One(true)
}

fn default_lto() -> Values<Lto> {
    Values::One(Lto::None)
}

#[derive(serde::Deserialize)]
struct MatrixEntry {
    platform: Platform,
    arch: Values<String>,
    #[serde(default = "default_threads")]
    threads: Values<bool>,
    #[serde(default = "default_lto")]
    lto: Values<Lto>,
    #[serde(default)]
    use_llvm: bool,
    #[serde(default)]
    expect: Expect,
}

fn load_config(path: &Path) -> anyhow::Result<MatrixConfig> {
    let bytes =
        std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_yaml::from_slice(&bytes).with_context(|| format!("cannot parse {}", path.display()))
}

struct Case {
    name: String,
    options: BuildOptions,
    expect: Expect,
}

fn expand(cfg: &MatrixConfig, platforms: &[Platform]) -> Vec<Case> {
    let mut cases = Vec::new();

    for entry in &cfg.entries {
        if !platforms.is_empty() && !platforms.contains(&entry.platform) {
            continue;
        }

        for arch in entry.arch.flatten() {
            for threads in entry.threads.flatten() {
                for lto in entry.lto.flatten() {
                    let options = BuildOptions {
                        platform: entry.platform,
                        arch: Some(arch.clone()),
                        lto,
                        threads,
                        use_llvm: entry.use_llvm,
                        ..Default::default()
                    };
                    let llvm = if entry.use_llvm { " llvm" } else { "" };
                    cases.push(Case {
                        name: format!(
                            "{} [{}] threads={} lto={}{}",
                            entry.platform, arch, threads, lto, llvm
                        ),
                        options,
                        expect: entry.expect,
                    });
                }
            }
        }
    }

    cases
}

struct Outcome {
    passed: bool,
    summary: String,
    flags: Option<String>,
}

fn run_case(case: &Case) -> Outcome {
    let mut env = case.options.to_env();
    match (configure(&mut env), case.expect) {
        (Ok(()), Expect::Ok) => Outcome {
            passed: true,
            summary: format!(
                "ok ({} ccflags, {} linkflags)",
                env.list(keys::CCFLAGS).len(),
                env.list(keys::LINKFLAGS).len()
            ),
            flags: Some(env.to_shell()),
        },
        (Err(e), Expect::Fail) => Outcome {
            passed: true,
            summary: format!("failed as expected: {}", e),
            flags: None,
        },
        (Ok(()), Expect::Fail) => Outcome {
            passed: false,
            summary: "MISMATCH: configured, expected failure".to_string(),
            flags: Some(env.to_shell()),
        },
        (Err(e), Expect::Ok) => Outcome {
            passed: false,
            summary: format!("MISMATCH: {}", e),
            flags: None,
        },
    }
}

pub fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let config_path = match args.config.clone() {
        Some(path) => path,
        None => crate::findup::workspace_root()?.join("matrix.yaml"),
    };
    let cfg = load_config(&config_path)?;

    let cases = expand(&cfg, &args.platforms);
    log::debug!("{} combinations from {}", cases.len(), config_path.display());

    let outcomes: Vec<Outcome> = cases.par_iter().map(run_case).collect();

    let mut failed = 0;
    for (i, (case, outcome)) in cases.iter().zip(&outcomes).enumerate() {
        println!("[{}/{}] {}: {}", i + 1, cases.len(), case.name, outcome.summary);
        if args.verbose {
            if let Some(flags) = &outcome.flags {
                print!("{}", flags);
            }
        }
        if !outcome.passed {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} combinations did not match", failed, cases.len());
    }

    println!("[matrix] done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKED_IN: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../matrix.yaml"));

    #[test]
    fn test_expand_cartesian_product() {
        let cfg: MatrixConfig = serde_yaml::from_str(
            r#"
entries:
  - platform: web
    arch: [wasm32, [wasm64]]
    threads: [true, false]
    lto: [none, auto]
  - platform: linux
    arch: x86_64
"#,
        )
        .unwrap();

        let all = expand(&cfg, &[]);
        assert_eq!(all.len(), 9);
        assert_eq!(all[0].name, "web [wasm32] threads=true lto=none");
        assert_eq!(all[8].name, "linux [x86_64] threads=true lto=none");

        let web_only = expand(&cfg, &[Platform::Web]);
        assert_eq!(web_only.len(), 8);
    }

    #[test]
    fn test_expected_failure_passes() {
        let case = Case {
            name: "web [x86_64]".to_string(),
            options: BuildOptions {
                platform: Platform::Web,
                arch: Some("x86_64".to_string()),
                ..Default::default()
            },
            expect: Expect::Fail,
        };
        let outcome = run_case(&case);
        assert!(outcome.passed);
        assert!(outcome.summary.contains("Only wasm32 and wasm64"));
    }

    #[test]
    fn test_checked_in_matrix_passes() {
        let cfg: MatrixConfig = serde_yaml::from_str(CHECKED_IN).unwrap();
        let cases = expand(&cfg, &[]);
        assert!(!cases.is_empty());
        for case in &cases {
            let outcome = run_case(case);
            assert!(outcome.passed, "{}: {}", case.name, outcome.summary);
        }
    }
}
