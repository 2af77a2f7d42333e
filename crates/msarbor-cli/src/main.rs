use msarbor::{CostMatrix, Objective, ReducedCosts, Solver};
use serde::Serialize;
use std::io::{Read, Write};
use tracing_subscriber::filter::LevelFilter;

mod instance;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Parse(instance::ParseError),
    Solve(msarbor::Error),
    Check(msarbor::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Parse(err) => write!(f, "invalid instance: {err}"),
            CliError::Solve(err) => write!(f, "{err}"),
            CliError::Check(err) => write!(f, "check failed: {err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<instance::ParseError> for CliError {
    fn from(value: instance::ParseError) -> Self {
        Self::Parse(value)
    }
}

impl From<msarbor::Error> for CliError {
    fn from(value: msarbor::Error) -> Self {
        Self::Solve(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug)]
struct Args {
    input: Option<String>,
    json: bool,
    pretty: bool,
    duals: bool,
    reduced_costs: bool,
    check: bool,
    log_level: LevelFilter,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            input: None,
            json: false,
            pretty: false,
            duals: false,
            reduced_costs: false,
            check: false,
            log_level: LevelFilter::WARN,
        }
    }
}

#[derive(Serialize)]
struct DualOut<'a> {
    aux_nodes: usize,
    parents: &'a [Option<usize>],
    values: &'a [Objective],
}

#[derive(Serialize)]
struct SolutionOut<'a> {
    nodes: usize,
    root: usize,
    objective: Objective,
    feasible: bool,
    predecessors: &'a [usize],
    #[serde(skip_serializing_if = "<[usize]>::is_empty")]
    missing_arc_heads: &'a [usize],
    #[serde(skip_serializing_if = "Option::is_none")]
    duals: Option<DualOut<'a>>,
    /// One backward star per non-root head, indexed by tail.
    #[serde(skip_serializing_if = "Option::is_none")]
    reduced_costs: Option<Vec<&'a [Option<Objective>]>>,
}

fn usage() -> &'static str {
    "msarbor-cli\n\
\n\
USAGE:\n\
  msarbor-cli [--json] [--pretty] [--duals] [--reduced-costs] [--check] [--log-level <level>] [<path>|-]\n\
\n\
INPUT:\n\
  n, then n rows (tails 0..n-1) of n-1 costs (heads 0..n-2). The root is n-1.\n\
  The entry of a row for its own node is ignored; costs >= 2147483646 mean \"no arc\".\n\
\n\
NOTES:\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - Text output is `n<TAB>objective`, then the predecessors of nodes 0..n-2.\n\
  - --check re-verifies the tree, the objective and the dual sum; failures exit with 1.\n\
  - --log-level takes off|error|warn|info|debug|trace (default: warn); logs go to stderr.\n\
"
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "--json" => args.json = true,
            "--pretty" => args.pretty = true,
            "--duals" => args.duals = true,
            "--reduced-costs" => args.reduced_costs = true,
            "--check" => args.check = true,
            "--log-level" => {
                let Some(level) = it.next() else {
                    return Err(CliError::Usage(usage()));
                };
                args.log_level = level
                    .parse::<LevelFilter>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            "-" if args.input.is_none() => args.input = Some("-".to_string()),
            other if other.starts_with('-') => return Err(CliError::Usage(usage())),
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn reduced_stars(reduced: &ReducedCosts) -> Vec<&[Option<Objective>]> {
    (0..reduced.node_count().saturating_sub(1))
        .map(|head| reduced.backward_star(head))
        .collect()
}

fn join<T: std::fmt::Display>(items: impl IntoIterator<Item = T>) -> String {
    items
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

fn write_text(
    out: &mut impl Write,
    args: &Args,
    solver: &Solver,
    reduced: Option<&ReducedCosts>,
) -> std::io::Result<()> {
    writeln!(out, "{}\t{}", solver.node_count(), solver.objective())?;
    writeln!(out, "{}", join(solver.predecessors()))?;

    if args.duals {
        let parents = solver
            .aux_parents()
            .iter()
            .map(|p| p.map_or_else(|| "-".to_string(), |p| p.to_string()));
        writeln!(out, "aux {}", solver.aux_node_count())?;
        writeln!(out, "{}", join(parents))?;
        writeln!(out, "{}", join(solver.duals()))?;
    }

    if let Some(reduced) = reduced {
        for star in reduced_stars(reduced) {
            let line = star
                .iter()
                .map(|rc| rc.map_or_else(|| "-".to_string(), |rc| rc.to_string()));
            writeln!(out, "{}", join(line))?;
        }
    }
    Ok(())
}

fn write_json(
    out: &mut impl Write,
    args: &Args,
    solver: &Solver,
    reduced: Option<&ReducedCosts>,
) -> Result<(), CliError> {
    let value = SolutionOut {
        nodes: solver.node_count(),
        root: solver.root(),
        objective: solver.objective(),
        feasible: solver.is_feasible(),
        predecessors: solver.predecessors(),
        missing_arc_heads: solver.missing_arc_heads(),
        duals: args.duals.then(|| DualOut {
            aux_nodes: solver.aux_node_count(),
            parents: solver.aux_parents(),
            values: solver.duals(),
        }),
        reduced_costs: reduced.map(reduced_stars),
    };
    if args.pretty {
        serde_json::to_writer_pretty(&mut *out, &value)?;
    } else {
        serde_json::to_writer(&mut *out, &value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let text = read_input(args.input.as_deref())?;
    let costs: CostMatrix = instance::parse_instance(&text)?;
    tracing::info!(nodes = costs.node_count(), "instance loaded");

    let mut solver = Solver::new(costs.node_count())?;
    let reduced = if args.reduced_costs {
        let mut reduced = ReducedCosts::new(costs.node_count())?;
        solver.solve_with_reduced_costs(&costs, &mut reduced)?;
        Some(reduced)
    } else {
        solver.solve(&costs)?;
        None
    };

    if args.check {
        solver.verify(&costs).map_err(CliError::Check)?;
        tracing::info!("solution verified");
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.json {
        write_json(&mut out, &args, &solver, reduced.as_ref())?;
    } else {
        write_text(&mut out, &args, &solver, reduced.as_ref())?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}
