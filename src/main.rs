//! OS Simulator - Demo Entry Point
//!
//! Usage: os-sim [OPTIONS]
//!
//! Runs a small canned workload through the scheduling and virtual memory
//! simulation and prints the resulting report.
//!
//! Options:
//!   --cpu <fcfs|rr>       CPU scheduling algorithm (default: rr)
//!   --memory <fifo|lru>   Page replacement algorithm (default: fifo)
//!   --frames <N>          Physical frame count, 4-32 (default: 16)
//!   --quantum <N>         Round-Robin time quantum, 1-10 (default: 3)
//!   -v, --verbose         Print the full execution trace
//!   -h, --help            Print help information

use std::env;
use std::process;

use os_sim::{
    run_simulation, CpuAlgorithm, CpuConfig, MemoryConfig, Pid, Process, ReplacementAlgorithm,
    SimulationReport,
};

struct Config {
    cpu: CpuAlgorithm,
    memory: ReplacementAlgorithm,
    frames: usize,
    quantum: u32,
    verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cpu: CpuAlgorithm::RoundRobin,
            memory: ReplacementAlgorithm::Fifo,
            frames: 16,
            quantum: 3,
            verbose: false,
        }
    }
}

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&config) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn print_help(program: &str) {
    eprintln!("OS Simulator - CPU scheduling and virtual memory demo");
    eprintln!();
    eprintln!("Usage: {} [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --cpu <fcfs|rr>       CPU scheduling algorithm (default: rr)");
    eprintln!("  --memory <fifo|lru>   Page replacement algorithm (default: fifo)");
    eprintln!("  --frames <N>          Physical frame count, 4-32 (default: 16)");
    eprintln!("  --quantum <N>         Round-Robin time quantum, 1-10 (default: 3)");
    eprintln!("  -v, --verbose         Print the full execution trace");
    eprintln!("  -h, --help            Print this help message");
}

fn parse_args() -> Result<Config, String> {
    let args: Vec<String> = env::args().collect();
    let program = &args[0];

    let mut config = Config::default();
    let mut iter = args[1..].iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help(program);
                process::exit(0);
            }
            "-v" | "--verbose" => config.verbose = true,
            "--cpu" => {
                config.cpu = match iter.next().map(String::as_str) {
                    Some("fcfs") => CpuAlgorithm::Fcfs,
                    Some("rr") => CpuAlgorithm::RoundRobin,
                    other => return Err(format!("--cpu expects fcfs or rr, got {:?}", other)),
                };
            }
            "--memory" => {
                config.memory = match iter.next().map(String::as_str) {
                    Some("fifo") => ReplacementAlgorithm::Fifo,
                    Some("lru") => ReplacementAlgorithm::Lru,
                    other => return Err(format!("--memory expects fifo or lru, got {:?}", other)),
                };
            }
            "--frames" => {
                config.frames = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .ok_or("--frames expects a number")?;
            }
            "--quantum" => {
                config.quantum = iter
                    .next()
                    .and_then(|v| v.parse().ok())
                    .ok_or("--quantum expects a number")?;
            }
            _ => {
                return Err(format!(
                    "Unknown option: {}\nUse --help for usage information.",
                    arg
                ));
            }
        }
    }

    Ok(config)
}

fn run(config: &Config) -> Result<(), String> {
    let cpu_config = CpuConfig::new(config.cpu, config.quantum).map_err(|e| e.to_string())?;
    let memory_config =
        MemoryConfig::new(config.frames, config.memory).map_err(|e| e.to_string())?;

    let processes = vec![
        Process::new(Pid(0), "text-editor", 6, 12).map_err(|e| e.to_string())?,
        Process::new(Pid(1), "compiler", 10, 24).map_err(|e| e.to_string())?,
        Process::new(Pid(2), "browser", 8, 16).map_err(|e| e.to_string())?,
    ];

    println!("=== OS Simulator ===");
    println!("CPU algorithm:    {}", config.cpu);
    if config.cpu == CpuAlgorithm::RoundRobin {
        println!("Time quantum:     {}", config.quantum);
    }
    println!("Memory algorithm: {}", config.memory);
    println!("Physical frames:  {}", config.frames);
    println!();

    let report =
        run_simulation(processes, cpu_config, memory_config).map_err(|e| e.to_string())?;

    if config.verbose {
        println!("Execution trace:");
        for event in report.events() {
            println!(
                "  [t={:3}] {} page {} -> {} (frame {})",
                event.time, event.pid, event.page, event.outcome, event.frame
            );
        }
        println!();
    }

    print_report(&report);
    Ok(())
}

fn print_report(report: &SimulationReport) {
    println!("Process completion (in order):");
    for stats in &report.per_process {
        println!(
            "  {} {:12} completion={:3}  turnaround={:3}  waiting={:3}",
            stats.pid, stats.name, stats.completion_time, stats.turnaround_time, stats.waiting_time
        );
    }
    println!();
    println!("CPU:");
    println!("  Total time:              {}", report.total_time);
    println!("  Context switches:        {}", report.context_switches);
    println!(
        "  Average waiting time:    {:.2}",
        report.average_waiting_time()
    );
    println!(
        "  Average turnaround time: {:.2}",
        report.average_turnaround_time()
    );
    println!();
    println!("Memory:");
    println!("  Accesses:  {}", report.memory.total_accesses());
    println!("  Hits:      {}", report.memory.hits);
    println!("  Faults:    {}", report.memory.faults);
    println!("  Hit ratio: {:.2}%", report.memory.hit_ratio() * 100.0);
}
