use std::{env, fs, process};
use anyhow::Context;
use tracing_subscriber::EnvFilter;

use ncmachine::parse::parse;
use ncmachine::interp::Interpreter;
use ncmachine::machine::Status;

fn run(filename: &str) -> anyhow::Result<()> {
    let input = fs::read_to_string(filename)
        .with_context(|| format!("cannot read {}", filename))?;
    let prog = parse(filename, &input)?;

    match prog.number {
        Some(n) => println!("Running the G-code program #{} (total {} commands).\n",
                            n, prog.command_count()),
        None => println!("Running the G-code program (total {} commands).\n",
                         prog.command_count()),
    }

    let mut interp = Interpreter::new(|status: Status| println!("----> {}", status));
    let mut errors = 0;
    for (i, block) in prog.blocks.iter().enumerate() {
        let count = block.commands.len();
        println!("Executing code block #{} ({} command{})",
                 i + 1, count, if count > 1 { "s" } else { "" });
        println!("{}", "-".repeat(50));
        for command in &block.commands {
            println!("{}", command);
            if interp.execute(command).is_err() {
                errors += 1;
            }
        }
    }
    println!("\n{} commands executed, {} errors.", prog.command_count(), errors);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env()
                         .unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let filename = match env::args().nth(1) {
        Some(f) => f,
        None => {
            eprintln!("Error: G-code file missing.");
            eprintln!("Usage: ncm-run <filename>");
            process::exit(1);
        }
    };
    if let Err(e) = run(&filename) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
