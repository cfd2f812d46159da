use anyhow::{Context, Result, ensure};
use dynlist::cli::Cli;
use dynlist::runtime::{BuiltinVisitor, int_type};
use dynlist::{DynamicArray, TypeDescriptor};
use std::error::Error as StdError;
use std::io::{self, Write};
use std::str::FromStr;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    if cli.demo {
        run_demo().context("Demo failed")?;
    } else {
        let kind = cli.kind;
        kind.dispatch(Session { cli: &cli })
            .with_context(|| format!("Failed to build `{}` array", kind.type_name()))?;
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `-v` raises the level from `warn`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

struct Session<'a> {
    cli: &'a Cli,
}

impl BuiltinVisitor for Session<'_> {
    type Output = Result<()>;

    fn visit<T>(self, ty: &'static TypeDescriptor<T>) -> Result<()>
    where
        T: FromStr + 'static,
        T::Err: StdError + Send + Sync + 'static,
    {
        let cli = self.cli;
        let mut array = DynamicArray::with_capacity(ty, cli.capacity.get())?;
        for raw in &cli.values {
            array.append(&parse(raw)?)?;
        }
        info!(len = array.len(), capacity = array.capacity(), "array built");

        for raw in &cli.remove {
            let removed = array.remove_all(&parse(raw)?);
            debug!(value = %raw, removed, "removed value");
        }
        if cli.unique {
            let removed = array.remove_dup();
            debug!(removed, "removed duplicates");
        }
        if cli.sort {
            array.qsort();
        }
        if cli.reverse {
            array.reverse();
        }

        let stdout = io::stdout();
        let mut out = stdout.lock();
        array.dump(&mut out)?;

        if let Some(raw) = &cli.find {
            let item = parse(raw)?;
            match (array.index(&item), array.index_last(&item)) {
                (Some(first), Some(last)) => writeln!(
                    out,
                    "{raw}: first at {first}, last at {last}, {} occurrence(s)",
                    array.count(&item)
                )?,
                _ => writeln!(out, "{raw}: not found")?,
            }
        }
        Ok(())
    }
}

fn parse<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: StdError + Send + Sync + 'static,
{
    raw.parse()
        .with_context(|| format!("Invalid value: {raw:?}"))
}

fn run_demo() -> Result<()> {
    let mut al = DynamicArray::new(int_type())?;
    ensure!(al.is_empty());
    al.print();

    for x in [3, 3, 1] {
        al.append(&x)?;
    }
    ensure!(al.len() == 3 && al.capacity() == 4);
    al.print();

    al.reserve(10)?;
    ensure!(al.capacity() == 10);

    al.insert(0, &-1)?;
    al.insert(2, &6)?;
    al.insert(al.len(), &10)?;
    al.print();

    ensure!(al.contains(&6) && !al.contains(&5));
    ensure!(al.index(&3) == Some(1) && al.index(&7).is_none());
    ensure!(al.index_last(&3) == Some(3) && al.index_last(&10) == Some(5));
    ensure!(al.count(&3) == 2 && al.count(&9) == 0);

    let mut copy = al.try_clone()?;
    copy.print();
    copy.set(0, &1)?;
    ensure!(*copy.get(0) == 1 && *al.get(0) == -1);
    copy.print();

    copy.pop(2);
    copy.print();
    copy.remove(&10);
    copy.print();
    copy.remove_last(&1);
    copy.print();
    copy.remove_all(&3);
    copy.print();
    copy.clear();
    copy.print();

    al.swap(2, 4);
    al.print();
    al.swap(5, 1);
    al.print();
    al.qsort();
    al.print();
    ensure!(al.bsearch(&1).is_some() && al.bsearch(&10).is_some());
    ensure!(al.bsearch(&5).is_none());

    let mut odd = al.filter(|x| x % 2 != 0)?;
    odd.print();
    odd.map(|x| *x = -*x);
    odd.print();

    info!("demo finished");
    Ok(())
}
