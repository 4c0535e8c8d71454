use std::{io, time::Duration};

use polylife::{Adjacency, BoundsPolicy, Config, Coord, RuleTable, TileShape};

fn invalid<T: std::fmt::Display>(msg: T) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.to_string())
}

pub struct Args {
    matches: getopts::Matches,
}

impl Args {
    fn new<T: AsRef<str>>(args: &[T]) -> io::Result<Option<Self>> {
        let mut opts = getopts::Options::new();
        opts.optflag("", "help", "print this help menu");
        opts.optflag("c", "console", "run in console mode");
        opts.optflag("t", "threads", "enables multi-threading");
        opts.optopt("o", "output", "output file (.json snapshot or .rle)", "FILE");
        opts.optopt("i", "input", "input file (.json snapshot or .rle)", "FILE");
        opts.optopt("w", "width", "set grid width", "WIDTH");
        opts.optopt("h", "height", "set grid height", "HEIGHT");
        opts.optopt("f", "fill", "set fill type", "TYPE");
        opts.optopt("p", "pattern", "seed with a named pattern", "NAME");
        opts.optopt("", "shape", "tile shape: square, hexagon, triangle", "SHAPE");
        opts.optopt("", "adjacency", "neighborhood: moore, von_neumann", "MODE");
        opts.optopt("", "bounds", "edge policy: unbounded, wrap, clip", "POLICY");
        opts.optopt("r", "rule", "rule string, e.g. B3/S23", "RULE");
        opts.optopt(
            "s",
            "sleep",
            "the amount of time to sleep between generations",
            "MILLIS",
        );
        opts.optopt("g", "gens", "max number of generations", "COUNT");
        opts.optopt("", "stats", "write stats csv to file", "FILE");
        opts.optopt("", "deltas", "append every delta as a JSON line", "FILE");

        let matches = opts
            .parse(args.iter().map(T::as_ref))
            .map_err(invalid)?;
        if matches.opt_present("help") {
            println!("{}", opts.usage("usage: polylife [options]"));
            Ok(None)
        } else {
            Ok(Some(Self { matches }))
        }
    }
    pub fn from_env() -> io::Result<Option<Self>> {
        let env = std::env::args().collect::<Vec<_>>();
        Self::new(&env[1..])
    }

    fn get<T: std::str::FromStr>(&self, name: &str) -> io::Result<Option<T>>
    where
        T::Err: std::fmt::Display,
    {
        self.matches
            .opt_get(name)
            .map_err(|e| invalid(format!("--{name}: {e}")))
    }
    fn named<T>(&self, name: &str, parse: impl Fn(&str) -> Option<T>) -> io::Result<Option<T>> {
        match self.matches.opt_str(name) {
            Some(s) => parse(&s)
                .map(Some)
                .ok_or_else(|| invalid(format!("--{name}: unknown value {s:?}"))),
            None => Ok(None),
        }
    }

    pub fn console(&self) -> bool {
        self.matches.opt_present("console")
    }
    pub fn multithreading(&self) -> bool {
        self.matches.opt_present("threads")
    }

    pub fn generations(&self) -> io::Result<usize> {
        Ok(self.get("gens")?.unwrap_or(usize::MAX)) // kinda hacky way of saying "infinity"
    }
    pub fn sleep(&self) -> io::Result<Option<Duration>> {
        Ok(match self.get("sleep")? {
            Some(millis) => Some(Duration::from_millis(millis)),
            None if self.console() => Some(Duration::from_millis(100)),
            None => None,
        })
    }

    pub fn grid_size(&self) -> io::Result<(u32, u32)> {
        let default = if self.console() {
            let (cols, rows) = crossterm::terminal::size()?;
            (cols as u32, rows.saturating_sub(1) as u32)
        } else {
            (500, 500)
        };

        Ok((
            self.get("width")?.unwrap_or(default.0),
            self.get("height")?.unwrap_or(default.1),
        ))
    }

    /// The explicitly requested rule, if any
    pub fn rule(&self) -> io::Result<Option<RuleTable>> {
        match self.matches.opt_str("rule") {
            Some(s) => RuleTable::parse(s).map(Some).map_err(invalid),
            None => Ok(None),
        }
    }

    pub fn config(&self) -> io::Result<Config> {
        let (width, height) = self.grid_size()?;
        let shape = self.named("shape", |s| TileShape::from_name(s))?.unwrap_or(TileShape::Square);
        let mut config = Config::new(shape, width, height);
        if let Some(adjacency) = self.named("adjacency", |s| Adjacency::from_name(s))? {
            config = config.with_adjacency(adjacency);
        }
        if let Some(bounds) = self.named("bounds", |s| BoundsPolicy::from_name(s))? {
            config = config.with_bounds(bounds);
        }
        if let Some(rule) = self.rule()? {
            config = config.with_rules(rule);
        }
        Ok(config)
    }

    pub fn fill_mode(&self) -> io::Result<FillMode> {
        Ok(self.named("fill", |s| FillMode::new(s))?.unwrap_or(FillMode::Random))
    }
    pub fn pattern(&self) -> Option<String> {
        self.matches.opt_str("pattern")
    }

    pub fn output_file(&self) -> Option<String> {
        self.matches.opt_str("output")
    }
    pub fn input_file(&self) -> Option<String> {
        self.matches.opt_str("input")
    }

    pub fn stats_file(&self) -> Option<String> {
        self.matches.opt_str("stats")
    }
    pub fn deltas_file(&self) -> Option<String> {
        self.matches.opt_str("deltas")
    }
}

pub enum FillMode {
    Random,
    Alternating,
    All,
    Empty,
}
impl FillMode {
    fn new<S: AsRef<str>>(s: S) -> Option<Self> {
        match s.as_ref() {
            "random" => Some(Self::Random),
            "alternating" => Some(Self::Alternating),
            "all" => Some(Self::All),
            "empty" => Some(Self::Empty),
            _ => None,
        }
    }

    fn reserve_size(&self, w: u32, h: u32) -> usize {
        let total = (w as usize) * (h as usize);
        match self {
            Self::Random => total.div_ceil(2),
            Self::Alternating => total.div_ceil(2),
            Self::All => total,
            Self::Empty => 0,
        }
    }
    fn fill_cell<R: rand::Rng>(&self, cell: Coord, rng: &mut R) -> bool {
        match self {
            Self::Random => rng.random_bool(0.5),
            Self::Alternating => (cell.col + cell.row) % 2 == 0,
            Self::All => true,
            Self::Empty => false,
        }
    }
    pub fn create_alive(self, w: u32, h: u32) -> Vec<Coord> {
        let mut alive = Vec::new();
        let reserve_size = self.reserve_size(w, h);
        if reserve_size == 0 {
            // reserve_size indicates this will produce no alive cells
            return alive;
        }

        let mut rng = rand::rng();
        alive.reserve(reserve_size);
        for row in 0..h as i32 {
            for col in 0..w as i32 {
                let cell = Coord { col, row };
                if self.fill_cell(cell, &mut rng) {
                    alive.push(cell);
                }
            }
        }
        alive
    }
}
