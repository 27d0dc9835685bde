use breathwork_core::catalog::{
    builtin_techniques, category_counts, load_techniques_file, resolve_technique,
};
use breathwork_core::progress::{phase_visual, SessionSnapshot};
use breathwork_core::{
    recommend, BreathingSession, BreathworkConfig, Category, PresentationConfig,
    SessionCommand, SessionController, SessionObserver, SessionRunner,
    SessionSummary, Technique,
};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::thread;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "breathwork", about = "Guided breathing sessions in the terminal")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List techniques, optionally for one category
    List {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Suggest techniques for how you feel
    Recommend { text: Vec<String> },
    /// Run a session
    Run {
        id: String,
        /// Extra techniques file with [[technique]] tables
        #[arg(long)]
        techniques: Option<PathBuf>,
    },
    /// Print the effective configuration
    Config {},
}

fn init_logging() {
    let mut filter = EnvFilter::from_default_env();
    if let Ok(d) = "breathwork_core=warn".parse() {
        filter = filter.add_directive(d);
    }
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn print_technique(t: &Technique) {
    let p = &t.pattern;
    let mut timing = format!("in {}", p.inhale);
    if let Some(h) = p.hold.filter(|h| *h > 0) {
        timing.push_str(&format!(" / hold {}", h));
    }
    timing.push_str(&format!(" / out {}", p.exhale));
    if let Some(s) = p.pause.filter(|s| *s > 0) {
        timing.push_str(&format!(" / pause {}", s));
    }
    println!(
        "{} {:<22} [{}] {}  ({}, {})",
        t.icon,
        t.id,
        t.category,
        t.name,
        timing,
        breathwork_core::format_time(t.duration_seconds)
    );
    println!("    {}", t.description);
}

/// Closing line for one run; only facts of that run are reported.
fn summary_line(summary: &SessionSummary) -> String {
    format!(
        "{}: {} cycles, {} of {} practised{}",
        summary.technique_name,
        summary.cycles,
        breathwork_core::format_time(summary.elapsed_seconds),
        breathwork_core::format_time(summary.duration_seconds),
        if summary.completed { "" } else { " (ended early)" }
    )
}

/// Prints one line per state change.
struct TerminalView {
    presentation: PresentationConfig,
}

impl SessionObserver for TerminalView {
    fn on_close(&mut self) {
        println!("\nSession closed.");
    }

    fn on_complete(&mut self) {
        println!("\nSession complete. Well done.");
    }

    fn on_update(&mut self, s: &SessionSnapshot) {
        let visual = phase_visual(s.phase, &self.presentation);
        let bar_width = 20usize;
        let filled = ((s.progress_percent / 100.0) * bar_width as f32).round() as usize;
        let filled = filled.min(bar_width);
        print!(
            "\r{:<12} {:>3}s  x{:.2}  {}  [{}{}] {}{}   ",
            visual.instruction,
            s.time_left_in_phase,
            visual.scale,
            s.cycle_label(),
            "#".repeat(filled),
            "-".repeat(bar_width - filled),
            s.elapsed_label(),
            if s.is_active { "" } else { "  (paused)" }
        );
        let _ = io::stdout().flush();
    }
}

/// Reads keys from stdin: Enter/p toggles, s skips, q closes.
fn spawn_keyboard(ctl: SessionController) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let cmd = match line.trim() {
                "" | "p" => SessionCommand::Toggle,
                "s" => SessionCommand::Skip,
                "q" => SessionCommand::Close,
                other => {
                    log::warn!("Unknown key: {}", other);
                    continue;
                }
            };
            if !ctl.send(cmd) || cmd == SessionCommand::Close {
                break;
            }
        }
    });
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();
    let config = BreathworkConfig::load_layered(None, cli.config.as_deref())?;

    match cli.cmd {
        Commands::List { category } => {
            let techniques = builtin_techniques();
            for (cat, count) in category_counts() {
                if category.map_or(false, |c| c != cat) {
                    continue;
                }
                println!("{} ({})", cat.label(), count);
                for t in techniques.iter().filter(|t| t.category == cat) {
                    print_technique(t);
                }
                println!();
            }
        }
        Commands::Recommend { text } => {
            let input = text.join(" ");
            for t in recommend(&input) {
                print_technique(&t);
            }
        }
        Commands::Run { id, techniques } => {
            let extra = match techniques {
                Some(path) => load_techniques_file(path)?,
                None => Vec::new(),
            };
            let technique = resolve_technique(&id, &extra)?;

            println!("{} {}", technique.icon, technique.name);
            println!("{}", technique.instructions);
            println!("Keys: Enter/p = start/pause, s = skip phase, q = quit\n");

            let view = TerminalView {
                presentation: config.presentation.clone(),
            };
            let session = BreathingSession::new(technique, view)?;
            let (runner, ctl) = SessionRunner::new(session, &config.session);
            spawn_keyboard(ctl);

            let (summary, _) = runner.run();
            println!("{}", summary_line(&summary));
        }
        Commands::Config {} => {
            print!("{}", config.to_toml_string()?);
        }
    }
    Ok(())
}
