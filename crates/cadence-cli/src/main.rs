use clap::Parser;

use cadence_core::{Config, PhasePlan, Session, TimerSettings};

mod app;
mod common;
mod view;

#[derive(Parser)]
#[command(name = "cadence", version, about = "A lightweight pomodoro-style interval timer")]
struct Cli {
    /// Work phase length in minutes
    #[arg(short = 'w', long, value_name = "MINUTES")]
    work: Option<u64>,

    /// Short break length in minutes
    #[arg(short = 's', long, value_name = "MINUTES")]
    short_break: Option<u64>,

    /// Long break length in minutes
    #[arg(short = 'l', long, value_name = "MINUTES")]
    long_break: Option<u64>,

    /// Phases per cycle (work and break phases count separately)
    #[arg(short = 'p', long)]
    phases_per_cycle: Option<usize>,

    /// Total number of cycles
    #[arg(short = 'c', long)]
    cycles: Option<usize>,

    /// Acknowledgment window in seconds after each phase change (0 disables it)
    #[arg(long, value_name = "SECONDS")]
    ack: Option<u64>,

    /// Print the planned phases and exit
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    /// Overlay flag values on top of the file-backed configuration.
    fn merge_into(&self, config: &mut Config) {
        if let Some(minutes) = self.work {
            config.work_minutes = minutes;
        }
        if let Some(minutes) = self.short_break {
            config.short_break_minutes = minutes;
        }
        if let Some(minutes) = self.long_break {
            config.long_break_minutes = minutes;
        }
        if let Some(phases) = self.phases_per_cycle {
            config.phases_per_cycle = phases;
        }
        if let Some(cycles) = self.cycles {
            config.total_cycles = cycles;
        }
        if let Some(secs) = self.ack {
            config.acknowledgment_secs = secs;
        }
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    cli.merge_into(&mut config);

    if cli.dry_run {
        let plan = PhasePlan::build(&config)?;
        print!("{}", plan_table(&plan, &config));
        return Ok(());
    }

    let session = Session::new(config)?;
    let finished = app::run(session)?;
    if finished {
        println!("All done!");
    }
    Ok(())
}

/// Render the plan as an aligned table: one row per entry, in plan order.
fn plan_table(plan: &PhasePlan, settings: &impl TimerSettings) -> String {
    let cycle_width = "Cycle".len();
    let phase_width = "Short break".len(); // Longest label
    let duration_width = "99m59s".len();

    let mut out = String::new();
    out.push_str(&format!(
        "{:<cycle_width$}  {:<phase_width$}  {:<duration_width$}\n",
        "Cycle", "Phase", "Duration"
    ));

    for entry in plan.entries() {
        let phase = entry.phase;
        out.push_str(&format!(
            "{:<cycle_width$}  {:<phase_width$}  {:<duration_width$}\n",
            phase.cycle_index,
            phase.kind.to_string(),
            common::format_duration(phase.duration(settings)),
        ));
    }

    out
}
