// Copyright (c) 2026 rezky_nightky

mod cell;
mod charset;
mod cloud;
mod config;
mod droplet;
mod error;
mod frame;
mod palette;
mod runtime;
mod session;
mod terminal;

use std::fs::File;
use std::io::stdout;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyEventKind};
use log::{error, info};

use crate::charset::print_list_charsets;
use crate::config::{clap_styles, color_enabled_stdout, Args, Settings};
use crate::error::Result;
use crate::palette::print_list_colors;
use crate::session::Session;
use crate::terminal::{restore_terminal_best_effort, RawMode};

const TICK: Duration = Duration::from_millis(50);

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

const KEYS_HELP: &str = "\
KEYS:
  1-5      charset (ascii, binary, braille, emoji, katakana)
  v / h    vertical / horizontal rain
  up/down  next / previous palette
  g b p    jump to green / blue / purple
  q, Esc   quit";

fn init_logging(args: &Args) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or("DIGITAL_RAIN_LOG", "warn"),
    );
    builder.format_timestamp_micros();
    if let Some(path) = &args.log_file {
        let file = File::create(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

/// SIGINT, SIGTERM and SIGHUP raise the returned flag; the tick loop polls it.
fn install_signal_flag() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));

    #[cfg(unix)]
    {
        use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
        for sig in [SIGINT, SIGTERM, SIGHUP] {
            if let Err(e) = signal_hook::flag::register(sig, Arc::clone(&flag)) {
                log::warn!("failed to register handler for signal {}: {}", sig, e);
            }
        }
    }

    #[cfg(windows)]
    {
        let f = Arc::clone(&flag);
        if let Err(e) = ctrlc::set_handler(move || f.store(true, Ordering::SeqCst)) {
            log::warn!("failed to install Ctrl-C handler: {}", e);
        }
    }

    flag
}

fn print_info() {
    println!("Version: v{}", env!("CARGO_PKG_VERSION"));
    let sha = env!("DIGITAL_RAIN_GIT_SHA");
    if sha.is_empty() {
        println!("Build: {}", env!("DIGITAL_RAIN_BUILD"));
    } else {
        println!("Build: {} ({})", env!("DIGITAL_RAIN_BUILD"), sha);
    }
    println!("License: {}", env!("CARGO_PKG_LICENSE"));
    println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
}

fn run(settings: &Settings, stop: &AtomicBool) -> Result<()> {
    let _raw = RawMode::enable()?;
    let (w, h) = terminal::size()?;
    let mut session = Session::new(stdout(), settings, w, h);
    session.start()?;

    let result = rain_loop(&mut session, settings, stop);
    session.stop()?;
    info!(
        "exiting with {} droplets live",
        session.cloud().droplets().len()
    );
    result
}

fn rain_loop(
    session: &mut Session<std::io::Stdout>,
    settings: &Settings,
    stop: &AtomicBool,
) -> Result<()> {
    let end_time = settings.duration.map(|d| Instant::now() + d);
    let mut next_frame = Instant::now();

    while session.is_running() {
        loop {
            while terminal::poll_event(Duration::from_millis(0))? {
                match terminal::read_event()? {
                    Event::Resize(nw, nh) => session.resize(nw, nh),
                    Event::Key(k) if k.kind == KeyEventKind::Press => session.handle_key(k)?,
                    _ => {}
                }
            }

            if stop.load(Ordering::SeqCst) {
                info!("termination signal received");
                session.stop()?;
            }
            if end_time.is_some_and(|end| Instant::now() >= end) {
                session.stop()?;
            }
            if !session.is_running() {
                return Ok(());
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }
            let mut timeout = next_frame - now;
            if let Some(end) = end_time {
                timeout = timeout.min(end.saturating_duration_since(now));
            }
            let _ = terminal::poll_event(timeout)?;
        }

        session.tick()?;

        next_frame += TICK;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }
    Ok(())
}

fn main() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let mut cmd = Args::command()
        .styles(clap_styles())
        .help_template(help_template)
        .after_help(KEYS_HELP);
    cmd.build();
    for id in ["help", "version"] {
        if cmd.get_arguments().any(|a| a.get_id().as_str() == id) {
            cmd = cmd.mut_arg(id, |a| a.help_heading("HELP"));
        }
    }
    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_charsets {
        print_list_charsets();
        return;
    }
    if args.list_colors {
        print_list_colors();
        return;
    }
    if args.info {
        print_info();
        return;
    }

    if let Err(e) = init_logging(&args) {
        eprintln!("failed to open log file: {}", e);
        std::process::exit(1);
    }

    let settings = match Settings::from_args(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!(
        "starting: {} {} palette={} density={} colors={}",
        settings.direction,
        settings.charset,
        settings.palette_name(),
        settings.density,
        settings.color_mode.label()
    );

    let stop = install_signal_flag();
    if let Err(e) = run(&settings, &stop) {
        error!("{}", e);
        eprintln!("{}", e);
        std::process::exit(if e.is_usage() { 1 } else { 2 });
    }
}
