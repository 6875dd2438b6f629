mod cli;
mod config;
mod keybindings;

use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{Receiver, RecvTimeoutError};
use kitchen_core::{AudioStatus, SessionEvent, TimerSession, ToneEvent, ToneKind};
use kitchen_engine::CpalBackend;
use kitchen_render::{render_event, write_wav};
use kitchen_tone::generate_chord;
use rand::{SeedableRng, rngs::StdRng};

use crate::cli::Args;
use crate::config::Config;
use crate::keybindings::{Action, help_text, parse_line};

const RENDER_SAMPLE_RATE: u32 = 48000;
const RENDER_CHANNELS: u16 = 2;
/// Longest the loop waits for input before advancing the session.
const MAX_WAIT: Duration = Duration::from_millis(250);

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_millis()
        .init();
}

fn render(args: &Args) -> anyhow::Result<()> {
    if let Some(path) = &args.render_chime {
        let buffer = render_event(&ToneEvent::chime(), RENDER_SAMPLE_RATE, RENDER_CHANNELS);
        write_wav(&buffer, path).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote chime to {} ({:.2}s)", path.display(), buffer.duration_secs());
    }
    if let Some(path) = &args.render_chord {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let event = generate_chord(&mut rng);
        let buffer = render_event(&event, RENDER_SAMPLE_RATE, RENDER_CHANNELS);
        write_wav(&buffer, path).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {:?} to {} ({:.2}s)", event.kind, path.display(), buffer.duration_secs());
    }
    Ok(())
}

fn spawn_input() -> Receiver<Action> {
    let (tx, rx) = crossbeam_channel::unbounded();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            for action in parse_line(&line) {
                if tx.send(action).is_err() {
                    return;
                }
            }
        }
        // stdin closed
        let _ = tx.send(Action::Quit);
    });
    rx
}

fn report(session: &TimerSession<CpalBackend>, event: SessionEvent) {
    match event {
        SessionEvent::Tick { remaining_secs } => {
            print!("\r{}  ", session.clock());
            let _ = std::io::stdout().flush();
            if remaining_secs % 60 == 0 {
                log::debug!("{} minutes left", remaining_secs / 60);
            }
        }
        SessionEvent::Completed => {
            let title = session.recipe_title().unwrap_or("Your dish");
            println!("\n{title} is ready!");
        }
        SessionEvent::Tone(ToneKind::Chime) => log::debug!("completion chime"),
        SessionEvent::Tone(_) => {}
        SessionEvent::AmbientStopped => log::info!("ambient tones off"),
    }
}

fn run(session: &mut TimerSession<CpalBackend>, input: &Receiver<Action>) -> anyhow::Result<()> {
    let mut last = Instant::now();
    loop {
        let wait = session.time_to_next().map_or(MAX_WAIT, |t| t.min(MAX_WAIT));
        let action = match input.recv_timeout(wait) {
            Ok(action) => Some(action),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => Some(Action::Quit),
        };

        let now = Instant::now();
        for event in session.advance(now - last) {
            report(session, event);
        }
        last = now;

        match action {
            None => {}
            Some(Action::StartPause) => {
                session.toggle_running();
            }
            Some(Action::Reset) => {
                session.reset();
                println!("{}", session.clock());
            }
            Some(Action::ToggleAmbient) => {
                let active = session.toggle_ambient();
                if !active && session.audio_status() == AudioStatus::Unavailable {
                    println!("ambient sound off: no audio output");
                }
            }
            Some(Action::StepUp) => {
                session.step_up();
                println!("{}", session.clock());
            }
            Some(Action::StepDown) => {
                session.step_down();
                println!("{}", session.clock());
            }
            Some(Action::PrintSnapshot) => {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            }
            Some(Action::Help) => println!("{}", help_text()),
            Some(Action::Quit) => return Ok(()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.renders() {
        return render(&args);
    }

    let config = Config::load();
    if args.save_config {
        config.save().context("saving config")?;
        log::info!("config saved");
    }
    if args.list {
        for (i, recipe) in config.recipes.iter().enumerate() {
            println!(
                "{:>2}  {:<36} {:>3} min  {:?}",
                i + 1,
                recipe.title,
                recipe.cook_time_minutes,
                recipe.difficulty
            );
        }
        return Ok(());
    }

    let recipe = args
        .recipe
        .map(|n| {
            config
                .recipes
                .get(n as usize - 1)
                .with_context(|| format!("no recipe {n}, there are {}", config.recipes.len()))
        })
        .transpose()?;

    let backend = CpalBackend::new(config.engine_config());
    let settings = config.session_settings(args.seed);
    let mut session = match recipe {
        Some(recipe) => TimerSession::for_recipe(backend, Some(recipe), settings),
        None => TimerSession::new(backend, config.default_duration_secs(), settings),
    };
    if let Some(minutes) = args.minutes {
        session.configure(minutes.saturating_mul(60));
    }

    if let Some(title) = session.recipe_title() {
        println!("{title}");
    }
    println!("{}  (h for help)", session.clock());

    let input = spawn_input();
    let result = run(&mut session, &input);
    session.close();
    result
}
