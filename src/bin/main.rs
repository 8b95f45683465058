use std::{
    fs,
    io::{self, Read},
    path::PathBuf,
    process,
};
use clap::Parser;
use log::{debug, LevelFilter};
use pr7rs::{Config, Engine};

#[derive(Parser, Debug)]
#[command(name = "pr7rs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Evaluate a single Scheme expression", long_about = None)]
struct Args {
    #[arg(value_name = "EXPR")]
    expr: Option<String>,

    #[arg(short, long, value_name = "FILE", conflicts_with = "expr")]
    file: Option<PathBuf>,

    /// Log the token stream before parsing
    #[arg(long = "tokens")]
    tokens: bool,

    /// Log the parsed syntax tree before evaluation
    #[arg(long = "tree")]
    tree: bool,

    /// Maximum application depth; 0 disables the limit
    #[arg(long = "max-depth", value_name = "N")]
    max_depth: Option<usize>,

    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

impl Args {
    fn config(&self) -> Config {
        let max_depth = match self.max_depth {
            Some(0) => None,
            Some(n) => Some(n),
            None => Config::default().max_depth,
        };

        Config::default()
            .with_max_depth(max_depth)
            .with_dump_tokens(self.tokens)
            .with_dump_tree(self.tree)
    }

    fn read_program(&self) -> Result<String, String> {
        if let Some(expr) = &self.expr {
            debug!("reading program from command-line argument");
            Ok(expr.clone())
        } else if let Some(file) = &self.file {
            debug!("reading program from {}", file.display());
            fs::read_to_string(file)
                .map_err(|e| format!("could not read file '{}': {}", file.display(), e))
        } else {
            debug!("reading program from stdin");
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("failed to read from stdin: {}", e))?;
            Ok(buf)
        }
    }
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose || args.tokens || args.tree {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let code = match args.read_program() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(1);
        },
    };

    match Engine::new(args.config()).execute(&code) {
        Ok(value) => println!("{}", value),
        Err(err) => {
            eprintln!("error: {}", err.in_context(&code));
            process::exit(1);
        },
    }
}
