use clap::{Parser, ValueEnum};
use decimath::{
    FunctionRegistry, MathContext, Mode, ParseError, Rounding, Variables, fold_constants,
    interpreter::evaluator::function::builtin::BUILTIN_FUNCTIONS, parse,
};
use tracing::Level;

/// decimath evaluates an arithmetic formula with binary floats or with
/// arbitrary-precision decimals.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The formula to evaluate, e.g. "price * (1 + rate) ^ years".
    formula: String,

    /// Binds a variable, as name=value. The value is read as decimal text.
    #[arg(short, long = "var", value_name = "NAME=VALUE")]
    vars: Vec<String>,

    /// Evaluates with decimal arithmetic instead of f64.
    #[arg(short, long)]
    decimal: bool,

    /// Significant digits kept by decimal arithmetic.
    #[arg(short, long, default_value_t = 34)]
    precision: usize,

    /// Rounding mode of decimal arithmetic.
    #[arg(short, long, value_enum, default_value_t = RoundingArg::HalfEven)]
    rounding: RoundingArg,

    /// Prints the formula with its constant parts folded instead of
    /// evaluating it.
    #[arg(short, long)]
    fold: bool,

    /// Logs parsing and evaluation steps to stderr.
    #[arg(long)]
    verbose: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum RoundingArg {
    HalfEven,
    HalfAway,
    TowardZero,
    AwayFromZero,
    Up,
    Down,
}

impl From<RoundingArg> for Rounding {
    fn from(value: RoundingArg) -> Self {
        match value {
            RoundingArg::HalfEven => Self::HalfEven,
            RoundingArg::HalfAway => Self::HalfAway,
            RoundingArg::TowardZero => Self::TowardZero,
            RoundingArg::AwayFromZero => Self::AwayFromZero,
            RoundingArg::Up => Self::Up,
            RoundingArg::Down => Self::Down,
        }
    }
}

fn bind(pairs: &[String]) -> Result<Variables, String> {
    let mut variables = Variables::new();
    for pair in pairs {
        let (name, value) = pair.split_once('=')
                                .ok_or_else(|| format!("Expected NAME=VALUE, found '{pair}'."))?;
        variables.set_text(name.trim(), value.trim())
                 .map_err(|text| format!("'{text}' is not a number."))?;
    }
    Ok(variables)
}

fn main() {
    let args = Args::parse();

    tracing_subscriber::fmt().with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
                             .with_writer(std::io::stderr)
                             .init();

    let variables = bind(&args.vars).unwrap_or_else(|e| {
                                        eprintln!("{e}");
                                        std::process::exit(2);
                                    });

    let expr = parse(&args.formula, &FunctionRegistry::default()).unwrap_or_else(|e| {
                   eprintln!("{e}");
                   if matches!(e, ParseError::UnknownFunction { .. }) {
                       eprintln!("Known functions: {}.", BUILTIN_FUNCTIONS.join(", "));
                   }
                   std::process::exit(1);
               });

    let ctx = MathContext::new(args.precision, args.rounding.into());
    if args.fold {
        println!("{}", fold_constants(&expr, &ctx));
        return;
    }

    let mode = if args.decimal { Mode::Decimal(ctx) } else { Mode::Double };
    match expr.evaluate(&variables, &mode) {
        Ok(value) => println!("{value}"),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
