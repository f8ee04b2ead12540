use clap::Parser;
use std::path::Path;
use tapevm::head::Head;
use tapevm::loader::ProgramLoader;
use tapevm::machine::Machine;
use tapevm::program::{tape_window, Program, RunOutcome};
use tapevm::programs::ProgramManager;
use tapevm::tape::InfiniteTape;
use tapevm::types::Symbol;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The program file to run
    program: Option<String>,

    /// Run an embedded program by name instead of a file
    #[clap(short, long, conflicts_with = "program")]
    builtin: Option<String>,

    /// List the embedded programs and exit
    #[clap(short, long)]
    list: bool,

    /// Replace the initial tape, one symbol per character, `_` for blank
    #[clap(short, long)]
    tape: Option<String>,

    /// Override the initial head position
    #[clap(long)]
    head: Option<i64>,

    /// Stop after at most this many steps
    #[clap(short, long)]
    steps: Option<usize>,

    /// Print state and tape after every step
    #[clap(short = 'd', long)]
    debug: bool,

    /// Print the outcome as JSON
    #[clap(short, long)]
    json: bool,
}

fn main() {
    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    if cli.list {
        return list_programs();
    }

    let mut program = load_program(&cli)?;

    if let Some(tape) = &cli.tape {
        program.tape = tape.chars().map(parse_symbol).collect();
    }
    if let Some(head) = cli.head {
        program.head = head;
    }

    if !cli.json {
        println!("Program: {}", program.name);
        if !program.tape.is_empty() {
            let cells: Vec<String> = program.tape.iter().map(|s| s.to_string()).collect();
            println!("Initial: {}", cells.join(" "));
        }
    }

    let (outcome, halted) = if cli.debug || cli.steps.is_some() {
        run_stepwise(&program, &cli)?
    } else {
        (program.run()?, true)
    };

    report(&outcome, halted, cli.json)
}

fn load_program(cli: &Cli) -> Result<Program, Box<dyn std::error::Error>> {
    if let Some(name) = &cli.builtin {
        return Ok(ProgramManager::get_program_by_name(name)?);
    }
    match &cli.program {
        Some(path) => Ok(ProgramLoader::load_program(Path::new(path))?),
        None => Err("no program given; pass a file or --builtin (try --list)".into()),
    }
}

fn list_programs() -> Result<(), Box<dyn std::error::Error>> {
    for index in 0..ProgramManager::get_program_count() {
        let info = ProgramManager::get_program_info(index)?;
        println!(
            "{:>3}  {}  ({} states, {} rules)",
            info.index, info.name, info.state_count, info.rule_count
        );
        if !info.initial_tape.is_empty() {
            println!("     tape: {}", info.initial_tape);
        }
    }
    Ok(())
}

/// Drives the machine step by step, honoring the step limit. Returns the
/// outcome and whether the machine actually halted.
fn run_stepwise(
    program: &Program,
    cli: &Cli,
) -> Result<(RunOutcome, bool), Box<dyn std::error::Error>> {
    let table = program.table();
    let mut head = Head::new(program.initial_tape(), program.head);
    let mut machine = Machine::new(&mut head, &table, program.initial_state.clone());

    if cli.debug {
        println!("{:>5}  {}  {}", 0, machine.state(), tape_line(machine.head()));
    }

    while !machine.is_halted() {
        if let Some(limit) = cli.steps {
            if machine.steps() >= limit {
                break;
            }
        }
        machine.step()?;
        if cli.debug {
            println!(
                "{:>5}  {}  {}",
                machine.steps(),
                machine.state(),
                tape_line(machine.head())
            );
        }
    }

    if cli.debug {
        let (lo, hi) = window(machine.head());
        println!();
        print!("{}", machine.head().render(lo, hi)?);
    }

    let halted = machine.is_halted();
    let outcome = RunOutcome {
        state: machine.state().clone(),
        steps: machine.steps(),
        pos: machine.head().pos(),
        min_pos: machine.head().min_pos(),
        max_pos: machine.head().max_pos(),
        tape: tape_window(
            machine.head().tape(),
            machine.head().min_pos(),
            machine.head().max_pos(),
        ),
    };

    Ok((outcome, halted))
}

fn report(outcome: &RunOutcome, halted: bool, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    if halted {
        println!(
            "Halted in state {} after {} steps.",
            outcome.state, outcome.steps
        );
    } else {
        println!(
            "Stopped in state {} after {} steps without halting.",
            outcome.state, outcome.steps
        );
    }
    println!(
        "Head at {}, visited {}..={}.",
        outcome.pos, outcome.min_pos, outcome.max_pos
    );
    println!("Tape: {}", outcome.tape);
    Ok(())
}

fn parse_symbol(c: char) -> Symbol<char> {
    match c {
        '_' => Symbol::Blank,
        c => Symbol::Value(c),
    }
}

/// The union of the visited extent and the written extent.
fn window(head: &Head<InfiniteTape<char>>) -> (i64, i64) {
    let (mut lo, mut hi) = (head.min_pos(), head.max_pos());
    if let Some((tape_lo, tape_hi)) = head.tape().bounds() {
        lo = lo.min(tape_lo);
        hi = hi.max(tape_hi);
    }
    (lo, hi)
}

/// One line of tape cells with the head's cell bracketed.
fn tape_line(head: &Head<InfiniteTape<char>>) -> String {
    let (lo, hi) = window(head);
    let mut cells = Vec::new();
    for i in lo..=hi {
        let symbol = head.tape().get(i);
        if i == head.pos() {
            cells.push(format!("[{symbol}]"));
        } else {
            cells.push(symbol.to_string());
        }
    }
    cells.join(" ")
}
