use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::Parser;
use frame_ring::common::collections::HashSet;
use frame_ring::common::config::{Config, config_file};
use frame_ring::common::log;
use frame_ring::controller::SnapshotController;
use frame_ring::controller::command::RingCommand;
use frame_ring::host::sim::SimHost;
use frame_ring::host::{Host, Prompt, Selection};
use tracing::{debug, warn};

#[derive(Parser)]
#[command(name = "frame-ring")]
#[command(about = "Drive per-frame layout rings against an in-memory host")]
struct Cli {
    /// Config file to use instead of ~/.frame-ring.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the configured ring capacity.
    #[arg(long)]
    capacity: Option<usize>,

    /// Read commands from this file instead of stdin.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Load and validate the config, then exit.
    #[arg(long)]
    validate: bool,
}

/// Line-oriented input shared by the command loop and name prompts.
struct Input {
    reader: Box<dyn BufRead>,
    echo: bool,
}

impl Input {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let line = line.trim().to_string();
        if self.echo {
            println!("{line}");
        }
        Ok(Some(line))
    }

    fn ask(&mut self, prompt: &str) -> String {
        print!("{prompt}");
        let _ = io::stdout().flush();
        match self.next_line() {
            Ok(line) => line.unwrap_or_default(),
            Err(e) => {
                warn!("failed to read answer: {e}");
                String::new()
            }
        }
    }
}

impl Prompt for Input {
    fn prompt_for_name(&mut self, prompt: &str, disallowed: &HashSet<String>) -> String {
        loop {
            let answer = self.ask(prompt);
            if !disallowed.contains(&answer) {
                return answer;
            }
            println!("\"{answer}\" is already taken");
        }
    }

    fn prompt_for_existing_name(
        &mut self,
        prompt: &str,
        choices: &[String],
        allow_current: bool,
    ) -> Selection {
        if !choices.is_empty() {
            println!("saved: {}", choices.join(", "));
        }
        match self.ask(prompt) {
            answer if answer.is_empty() && allow_current => Selection::Current,
            answer => Selection::Name(answer),
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let path = cli.config.clone().unwrap_or_else(config_file);
    let mut config = if path.exists() {
        Config::read(&path).with_context(|| format!("reading {}", path.display()))?
    } else {
        if cli.config.is_some() {
            bail!("config file {} does not exist", path.display());
        }
        Config::builtin()?
    };

    if let Some(capacity) = cli.capacity {
        config.settings.ring_capacity = capacity;
    }

    let issues = config.validate();
    for issue in &issues {
        warn!("config: {issue}");
    }
    if !issues.is_empty() && !cli.validate {
        let fixes = config.auto_fix_values();
        warn!("applied {fixes} config fix(es)");
    }
    Ok(config)
}

fn run(controller: &mut SnapshotController<SimHost>, input: &mut Input) -> anyhow::Result<()> {
    loop {
        if let Some(label) = controller.status_label() {
            print!("{label} ");
        }
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = input.next_line()? else {
            return Ok(());
        };
        let (command, arg) = match line.split_once(' ') {
            Some((command, arg)) => (command, Some(arg.trim())),
            None => (line.as_str(), None),
        };
        debug!(command, ?arg, "input");

        let result = match (command, arg) {
            ("", _) => Ok(()),
            ("quit" | "exit", _) => return Ok(()),
            ("new", Some(name)) => controller.create(Some(name)),
            ("new", None) => controller.handle_command(RingCommand::NewConfiguration, input),
            ("dup", Some(name)) => controller.duplicate(Some(name)),
            ("dup", None) => controller.handle_command(RingCommand::DuplicateConfiguration, input),
            ("next", _) => controller.next(),
            ("prev", _) => controller.previous(),
            ("jump", Some(name)) => controller.jump_to(name),
            ("jump", None) => controller.handle_command(RingCommand::JumpToConfiguration, input),
            ("delete", Some(name)) => controller.delete(name),
            ("delete", None) => controller.handle_command(RingCommand::DeleteConfiguration, input),
            ("rename", Some(name)) => controller.rename(name),
            ("rename", None) => controller.handle_command(RingCommand::RenameConfiguration, input),
            ("frame", Some(id)) => {
                match id.parse() {
                    Ok(id) => controller.host_mut().select_frame(id),
                    Err(_) => println!("frame id must be a number"),
                }
                Ok(())
            }
            ("open", Some(pane)) => {
                controller.host_mut().open(pane);
                Ok(())
            }
            ("cursor", Some(position)) => {
                match position.parse() {
                    Ok(position) => controller.host_mut().set_cursor_position(position),
                    Err(_) => println!("cursor must be a number"),
                }
                Ok(())
            }
            ("show", _) => {
                println!("{}", serde_json::to_string_pretty(&controller.summary())?);
                println!("panes: {}", controller.host().panes().join(" | "));
                Ok(())
            }
            (other, _) => {
                println!("unknown command: {other}");
                Ok(())
            }
        };

        if let Err(e) = result {
            println!("error: {e}");
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    log::init_logging();

    let config = load_config(&cli)?;
    if cli.validate {
        if config.validate().is_empty() {
            println!("config ok");
            return Ok(());
        }
        bail!("config has issues");
    }

    let mut input = match &cli.script {
        Some(path) => Input {
            reader: Box::new(BufReader::new(
                File::open(path).with_context(|| format!("opening {}", path.display()))?,
            )),
            echo: true,
        },
        None => Input {
            reader: Box::new(io::stdin().lock()),
            echo: false,
        },
    };

    let mut controller = SnapshotController::new(SimHost::new(), config.settings);
    run(&mut controller, &mut input)
}
