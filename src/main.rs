use std::{
    fs,
    io::{self, BufWriter, Write},
    thread,
};

mod console;
mod options;
mod stats;

use polylife::{Coord, Generation, GridStore, PositionEncoder, RunLengthEncoded, patterns};
use stats::Recorder;
use tracing_subscriber::EnvFilter;

fn to_io(err: polylife::Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, err)
}

fn seed_store(args: &options::Args, store: &mut GridStore) -> io::Result<()> {
    if let Some(file_name) = args.input_file() {
        let encoded_str = fs::read_to_string(&file_name)?;
        if file_name.ends_with(".json") {
            let snapshot = Generation::from_json(&encoded_str).map_err(to_io)?;
            return store.import_snapshot(&snapshot).map_err(to_io);
        }

        let pattern = RunLengthEncoded::default()
            .decode(&encoded_str)
            .map_err(to_io)?;
        // a rule given on the command line wins over the pattern's own
        if let (Some(rule), None) = (pattern.rule, args.rule()?) {
            store.set_rules(rule);
        }
        return store.seed(pattern.cells).map_err(to_io);
    }

    if let Some(name) = args.pattern() {
        let pattern = patterns::find(&name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::InvalidInput, format!("unknown pattern {name}"))
        })?;
        // center the pattern in the grid
        let config = store.config();
        let center = Coord::new(config.width as i32 / 2, config.height as i32 / 2);
        let cells: Vec<_> = pattern.cells_at(center).collect();
        return store.seed(cells).map_err(to_io);
    }

    // setup the alive cells based on args
    let config = store.config();
    let alive = args.fill_mode()?.create_alive(config.width, config.height);
    store.seed(alive).map_err(to_io)
}

fn save_store(file_name: &str, store: &GridStore) -> io::Result<()> {
    let encoded = if file_name.ends_with(".json") {
        store.export_snapshot().to_json().map_err(to_io)?
    } else {
        let alive: Vec<_> = store.live_cells().collect();
        let encoder = RunLengthEncoded::default()
            .set_name("polylife generated pattern")
            .set_rule(store.rules());
        encoder.encode(&alive)
    };
    fs::write(file_name, encoded)
}

fn main() -> io::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("polylife=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let Some(args) = options::Args::from_env()? else {
        return Ok(());
    };

    let mut store = GridStore::new(args.config()?).map_err(to_io)?;
    seed_store(&args, &mut store)?;
    tracing::info!(alive = store.alive_count(), "starting simulation");

    // setup the reporting metrics and outputs
    let mut console = if args.console() {
        Some(console::ConsoleRender::new()?)
    } else {
        None
    };
    let sleep = args.sleep()?;
    let threads = args.multithreading();
    let mut deltas = match args.deltas_file() {
        Some(file_name) => Some(BufWriter::new(fs::File::create(file_name)?)),
        None => None,
    };

    let mut stats = stats::SwitchRecorder::new(store.alive_count(), args.stats_file().is_some());
    let mut paused = false;
    'generations: for _ in 0..args.generations()? {
        let mut single_step = false;
        // render the console if in console mode
        if let Some(ref mut console) = console {
            loop {
                while let Some(cmd) = console.poll_events()? {
                    match cmd {
                        console::ConsoleCommand::Exit => break 'generations,
                        console::ConsoleCommand::Pause => paused = !paused,
                        console::ConsoleCommand::Step => single_step = true,
                        console::ConsoleCommand::Handled => {}
                    }
                }
                console.render(&store)?;
                if !paused || single_step {
                    break;
                }
                thread::sleep(std::time::Duration::from_millis(20));
            }
        }

        // report metrics every 500ms or always if in console mode
        if stats.has_report() {
            let report = stats.report();
            if let Some(ref mut console) = console {
                console.set_report(report);
            } else {
                println!("{}", report);
            }
        }

        // compute the next generation
        let delta = if threads {
            store.step_parallel()
        } else {
            store.step()
        }
        .map_err(to_io)?;
        if let Some(ref mut out) = deltas {
            writeln!(out, "{}", delta.to_json().map_err(to_io)?)?;
        }
        stats.record(store.alive_count(), delta.len());
        if let Some(time) = sleep {
            thread::sleep(time);
        }
    }
    std::mem::drop(console);

    if let Some(mut out) = deltas {
        out.flush()?;
    }
    if let Some(file_name) = args.output_file() {
        save_store(&file_name, &store)?;
    }
    if let Some(file_name) = args.stats_file() {
        stats.save(file_name)?;
    }
    tracing::info!(
        generation = store.generation(),
        alive = store.alive_count(),
        "finished simulation"
    );

    Ok(())
}
