// exparse: arithmetic expression front end with a terminal explorer

use std::io;
use std::process;

use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};

use exparse::parser::{parse_tokens, tokenize_with, Dialect};
use exparse::ui::format::{token_table, tree_string};
use exparse::ui::App;

fn print_usage(program_name: &str) {
    eprintln!("Usage: {} [--basic] [EXPRESSION...]", program_name);
    eprintln!();
    eprintln!("With no expression, starts the interactive explorer.");
    eprintln!("With expressions, prints the tokens and syntax tree of each.");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --basic    recognize only the keywords var, if, else");
    eprintln!("  -h, --help show this message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} \"(10 + 2) * 5\"", program_name);
    eprintln!("  {} \"x = 10\" \"result = x + y\"", program_name);
}

/// Print tokens and tree for one expression. Returns false on error.
fn explain(source: &str, dialect: Dialect) -> bool {
    println!("Input: \"{}\"", source);

    let tokens = match tokenize_with(source, dialect) {
        Ok(tokens) => tokens,
        Err(e) => {
            eprintln!("Lexer error: {}", e);
            return false;
        }
    };
    println!("{}", token_table(&tokens));

    match parse_tokens(tokens) {
        Ok(ast) => {
            println!("Valid");
            println!("{}", tree_string(&ast));
            true
        }
        Err(e) => {
            eprintln!("Parser error: {}", e);
            false
        }
    }
}

fn run_explorer(dialect: Dialect) -> Result<(), Box<dyn std::error::Error>> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(dialect);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let program_name = args.first().map(|s| s.as_str()).unwrap_or("exparse");

    let mut dialect = Dialect::Extended;
    let mut expressions = Vec::new();

    for arg in args.iter().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(program_name);
                return Ok(());
            }
            "--basic" => dialect = Dialect::Basic,
            flag if flag.starts_with("--") => {
                eprintln!("Error: Unknown option '{}'", flag);
                eprintln!();
                print_usage(program_name);
                process::exit(1);
            }
            expr => expressions.push(expr.to_string()),
        }
    }

    if expressions.is_empty() {
        return run_explorer(dialect);
    }

    let mut failures = 0;
    for (i, source) in expressions.iter().enumerate() {
        if i > 0 {
            println!();
        }
        if !explain(source, dialect) {
            failures += 1;
        }
    }

    if failures > 0 {
        eprintln!("{} of {} expression(s) failed", failures, expressions.len());
        process::exit(1);
    }

    Ok(())
}
