use std::path::{Path, PathBuf};

use reckon::config::{self, ReckonConfig};
use reckon::logging;
use reckon::mcp::McpServer;
use reckon::repl::Repl;
use reckon::{CalcError, Calculator};

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "reckon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Four-operation calculator with a session history")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write a default config to <path>/.reckon/config.toml
    Init(InitArgs),
    /// Compute a single calculation and print it
    Eval(EvalArgs),
    /// Start the interactive prompt (default)
    Repl(SessionArgs),
    /// Serve calculator tools as JSON-RPC over stdio
    Serve(SessionArgs),
}

#[derive(Debug, Args)]
struct InitArgs {
    path: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct EvalArgs {
    #[arg(allow_negative_numbers = true)]
    operand1: f64,
    operator: String,
    #[arg(allow_negative_numbers = true)]
    operand2: f64,
    #[arg(short = 'j', long = "json")]
    json: bool,
    #[arg(short = 'p', long = "path")]
    path: Option<PathBuf>,
}

#[derive(Debug, Args, Default)]
struct SessionArgs {
    #[arg(short = 'p', long = "path")]
    path: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Repl(SessionArgs::default())) {
        Command::Init(args) => run_init(args),
        Command::Eval(args) => run_eval(args),
        Command::Repl(args) => run_repl(args),
        Command::Serve(args) => run_serve(args),
    }
}

fn run_init(args: InitArgs) {
    let project_root = resolve_project_root(args.path);
    match config::init_project(&project_root) {
        Ok(path) => println!("Initialized Reckon config at {}", path.display()),
        Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => {
            eprintln!("{err}");
        }
        Err(err) => {
            eprintln!("Failed to initialize config: {err}");
            std::process::exit(1);
        }
    }
}

fn run_eval(args: EvalArgs) {
    let cfg = load_config_or_exit(&resolve_project_root(args.path));
    let _guard = logging::init_logging(&cfg.logging);

    if !args.operand1.is_finite() || !args.operand2.is_finite() {
        eprintln!("Error: operands must be finite numbers");
        std::process::exit(1);
    }

    let mut calculator = Calculator::new();
    let calculation = calculator
        .calculate(args.operand1, args.operand2, &args.operator)
        .unwrap_or_else(|err: CalcError| {
            eprintln!("Error: {err}");
            std::process::exit(1);
        });

    if args.json {
        let json = serde_json::to_string_pretty(&calculation).unwrap_or_default();
        println!("{json}");
    } else {
        println!("{}", calculation.formatted_result().unwrap_or_default());
    }
}

fn run_repl(args: SessionArgs) {
    let cfg = load_config_or_exit(&resolve_project_root(args.path));
    let _guard = logging::init_logging(&cfg.logging);

    println!("Reckon {}. Type 'help' for usage.", env!("CARGO_PKG_VERSION"));
    let mut repl = Repl::from_config(&cfg);
    let stdin = std::io::stdin();
    if let Err(err) = repl.run(stdin.lock(), std::io::stdout()) {
        eprintln!("Prompt failed: {err}");
        std::process::exit(1);
    }
}

fn run_serve(args: SessionArgs) {
    let cfg = load_config_or_exit(&resolve_project_root(args.path));
    let _guard = logging::init_logging(&cfg.logging);

    let mut server = McpServer::new(Calculator::shared());
    if let Err(err) = server.start() {
        eprintln!("Failed to run tool server: {err}");
        std::process::exit(1);
    }
}

fn load_config_or_exit(project_root: &Path) -> ReckonConfig {
    config::load_config(project_root).unwrap_or_else(|err| {
        eprintln!(
            "Failed to load config {}: {err}",
            config::config_path(project_root).display()
        );
        std::process::exit(1);
    })
}

fn resolve_project_root(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}
