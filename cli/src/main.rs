mod args;
mod parse;

use anyhow::{bail, Context, Result};
use enclose_lib::{bisect, Interval};

fn expr_arg(m: &clap::ArgMatches) -> Result<parse::Expr> {
    let text: &String =
        m.get_one("expr").context("an expression is required")?;
    parse::parse(text)
}

fn main() -> Result<()> {
    env_logger::init();
    let matches = args::build_cli().get_matches();
    match matches.subcommand() {
        Some(("eval", m)) => {
            let expr = expr_arg(m)?;
            println!("{}", parse::eval(&expr, None)?);
        }
        Some(("split", m)) => {
            let expr = expr_arg(m)?;
            let interval = parse::eval(&expr, None)?;
            let pieces: u32 =
                *m.get_one("pieces").context("piece count is required")?;
            for piece in interval.split(pieces) {
                println!("{piece}");
            }
        }
        Some(("roots", m)) => {
            let expr = expr_arg(m)?;
            let text: &String =
                m.get_one("domain").context("a domain is required")?;
            let domain = parse::eval(&parse::parse(text)?, None)?;
            let tol: f64 = *m.get_one("tol").context("tol is required")?;
            let depth: u32 =
                *m.get_one("depth").context("depth is required")?;
            // Surface bad expressions once, up front; during the search
            // an evaluation error just means no value, hence no root.
            parse::eval(&expr, Some(&domain))?;
            let enclosures = bisect(
                |x| {
                    parse::eval(&expr, Some(x))
                        .unwrap_or_else(|_| Interval::empty())
                },
                &domain,
                tol,
                depth,
            );
            if enclosures.is_empty() {
                println!("no roots in {domain}");
            }
            for e in &enclosures {
                println!("{e}");
            }
        }
        Some((other, _)) => bail!("unknown command {other}"),
        None => bail!("a command is required"),
    }
    Ok(())
}
