use clap::{arg, Arg, Command};

pub(crate) fn build_cli() -> Command {
    Command::new("enclose")
        .version("0.1")
        .about("Evaluate expressions with sound interval arithmetic")
        .subcommand_required(true)
        .flatten_help(true) // show help for all subcommands
        .arg_required_else_help(true) // show full help if nothing given
        .subcommand(
            Command::new("eval")
                .about("Evaluate an interval expression")
                .arg(
                    Arg::new("expr")
                        .value_name("EXPR")
                        .required(true)
                        .help(
                            "Expression over interval literals, \
                             e.g. '[1,2] * sin([0, 3.15]) + 0.5'",
                        ),
                ),
        )
        .subcommand(
            Command::new("split")
                .about("Cut an interval into pieces of equal width")
                .arg(
                    Arg::new("expr")
                        .value_name("EXPR")
                        .required(true)
                        .help("Expression whose result gets split"),
                )
                .arg(
                    arg!(-n --pieces [COUNT] "Number of pieces")
                        .default_value("10")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("roots")
                .about("Enclose every zero of an expression in x")
                .arg(
                    Arg::new("expr")
                        .value_name("EXPR")
                        .required(true)
                        .help("Expression in the variable x, e.g. 'x^2 - 2'"),
                )
                .arg(
                    arg!(-d --domain [INTERVAL] "Where to search")
                        .default_value("[-1e6, 1e6]"),
                )
                .arg(
                    arg!(--tol [WIDTH] "Stop splitting below this width")
                        .default_value("1e-9")
                        .value_parser(clap::value_parser!(f64)),
                )
                .arg(
                    arg!(--depth [N] "Maximum number of splits per box")
                        .default_value("80")
                        .value_parser(clap::value_parser!(u32)),
                ),
        )
}
