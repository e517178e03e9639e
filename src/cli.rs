use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, ValueHint};

use crate::locator;
use crate::meta::Image;
use crate::report;

/// Search roots used when neither `--root` nor the environment names any.
/// These are the fixed installation directories the tool always searched.
const DEFAULT_ROOTS: &[&str] = &[
    "/usr/share/dotnet/shared/Microsoft.NETCore.App/5.0.7",
    "/usr/share/dotnet/sdk/5.0.301/Microsoft/Microsoft.NET.Build.Extensions/net461/lib",
];

/// Environment override for the search roots, PATH-style separated.
const ROOTS_ENV: &str = "DNSPECT_ROOTS";

const USAGE: &str =
    "usage: dnspect <assembly> <type> [--root DIR]...  e.g. dnspect System System.String";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dnspect",
    version,
    about = "Dump the public shape of a .NET type straight from assembly metadata",
    long_about = None
)]
pub struct Args {
    /// Assembly name without extension, e.g. System.Runtime
    #[arg(value_name = "ASSEMBLY")]
    pub assembly: Option<String>,

    /// Fully qualified type name, e.g. System.String
    #[arg(value_name = "TYPE")]
    pub type_name: Option<String>,

    /// Search root; may be repeated, searched in the order given
    #[arg(long = "root", value_name = "DIR", value_hint = ValueHint::DirPath)]
    pub roots: Vec<PathBuf>,

    /// Verbose logging
    #[arg(long = "verbose", short = 'v', action = ArgAction::Count)]
    pub verbose: u8,
}

/// Runs the CLI application.
///
/// # Errors
/// Returns an error if the module cannot be located or parsed.
pub fn run() -> Result<()> {
    let args = Args::parse();

    let (Some(assembly), Some(type_name)) = (&args.assembly, &args.type_name) else {
        // Both names are required; the usage line goes to stdout.
        println!("{USAGE}");
        std::process::exit(1);
    };

    let roots = resolve_roots(&args.roots, env::var_os(ROOTS_ENV));
    if args.verbose > 0 {
        for root in &roots {
            eprintln!("search root: {}", root.display());
        }
    }

    let file_name = format!("{assembly}.dll");
    let Some(path) = locator::find_module(&roots, &file_name) else {
        bail!("could not locate {file_name} under any search root");
    };
    if args.verbose > 0 {
        eprintln!("module: {}", path.display());
    }

    let image = Image::open(&path).with_context(|| format!("load module: {}", path.display()))?;
    if args.verbose > 1 {
        eprintln!("types defined: {}", image.type_count());
        if let Some(mvid) = image.mvid() {
            let hex: String = mvid.iter().map(|b| format!("{b:02x}")).collect();
            eprintln!("mvid: {hex}");
        }
    }

    let Some(idx) = image.find_type(type_name) else {
        // Kept from the original tool: a missing type reports on stdout
        // and still exits 0, so existing scripts keep working.
        println!("Could not find {type_name} in {}", path.display());
        return Ok(());
    };

    print!("{}", report::format(&report::build(&image, idx)));
    Ok(())
}

/// Roots from `--root` flags, else the environment, else the defaults.
fn resolve_roots(flags: &[PathBuf], env_value: Option<std::ffi::OsString>) -> Vec<PathBuf> {
    if !flags.is_empty() {
        return flags.to_vec();
    }
    if let Some(joined) = env_value {
        let roots: Vec<PathBuf> = env::split_paths(&joined).collect();
        if !roots.is_empty() {
            return roots;
        }
    }
    DEFAULT_ROOTS.iter().map(PathBuf::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_take_priority_over_environment() {
        let flags = vec![PathBuf::from("/flag/root")];
        let env = Some(std::ffi::OsString::from("/env/root"));
        assert_eq!(
            resolve_roots(&flags, env),
            vec![PathBuf::from("/flag/root")]
        );
    }

    #[test]
    fn environment_splits_path_style() {
        let env = Some(std::ffi::OsString::from("/one:/two"));
        assert_eq!(
            resolve_roots(&[], env),
            vec![PathBuf::from("/one"), PathBuf::from("/two")]
        );
    }

    #[test]
    fn defaults_apply_when_nothing_is_configured() {
        let roots = resolve_roots(&[], None);
        assert_eq!(roots.len(), DEFAULT_ROOTS.len());
        assert_eq!(roots[0], PathBuf::from(DEFAULT_ROOTS[0]));
    }
}
