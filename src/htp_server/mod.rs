mod options;

use std::process::exit;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use itertools::Itertools;
pub use options::HTPServerOptions;

use crate::prelude::*;

pub struct HTPServer {
    agent: HexAgent,
    board: Option<Board>,
    past_boards: Vec<Board>,
    config: HTPServerOptions,
    search_epoch: Arc<AtomicU64>,
}

impl HTPServer {
    /// Produces a new HTP server with the given engine configuration.
    pub fn new(options: HTPServerOptions) -> Result<HTPServer> {
        Ok(HTPServer {
            agent: HexAgent::new(options.agent_config())?,
            board: None,
            past_boards: vec![],
            config: options,
            search_epoch: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Runs hexer in engine mode until stdin closes or `quit` arrives.
    pub fn run(&mut self) -> Result<()> {
        loop
        {
            let mut cmdstr: String = String::new();
            if std::io::stdin().read_line(&mut cmdstr)? == 0 {
                return Ok(());
            }

            let args: Vec<&str> = cmdstr.split_whitespace().filter(|s| !s.is_empty()).collect();
            let cmd = *args.first().unwrap_or(&"");

            self.apply(cmd, &args[1..])?;
        }
    }

    /// Runs a command.
    fn apply(&mut self, cmd: &str, args: &[&str]) -> Result<()> {
        let result = match cmd
        {
            | "" => Ok(()),
            | "genmove" => self.generate_move(args),
            | "info" => self.info(),
            | "name" => self.name(),
            | "newgame" => self.new_game(args),
            | "play" => self.play_move(args),
            | "quit" => exit(0),
            | "score" => self.score(args),
            | "setup" => self.setup(args),
            | "showboard" => self.show_board(args),
            | "undo" => self.undo_move(args),
            | "validmoves" => self.valid_moves(args),
            | _ => Err(anyhow!("unrecognized command {cmd}")),
        };

        match result
        {
            Ok(_) => {
                log::debug!("command completed successfully: {cmd} {}", args.join(" "));
                self.ok()
            },
            Err(err) => {
                log::warn!("encountered recoverable error:\n{err}");
                self.err(&err)
            },
        }
    }

    /// Searches the current position and plays the chosen move.
    fn generate_move(&mut self, args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        let mut budget = Some(Duration::from_millis(self.config.movetime));
        if args.len() >= 2 {
            match args[0] {
                "depth" => {
                    let depth = args[1].parse::<u8>()?;
                    self.agent.set_max_depth(depth)?;
                    budget = None;
                },
                "time" => {
                    budget = Some(Duration::from_millis(args[1].parse::<u64>()?));
                },
                _ => { return Err(anyhow!("unrecognized search option {}", args[0])); }
            };
        }

        self.agent.clear_timeout();
        let armed = self.search_epoch.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(budget) = budget {
            let agent = self.agent.clone();
            let epoch = self.search_epoch.clone();
            std::thread::spawn(move || {
                std::thread::sleep(budget);
                // A stale timer must never cancel a later search.
                if epoch.load(Ordering::SeqCst) == armed {
                    agent.on_timeout();
                }
            });
        }

        let (mv, stats) = self.agent.choose_move(self.get())?;
        self.search_epoch.fetch_add(1, Ordering::SeqCst);

        log::info!(
            "{}: depth {} value {} over {} nodes ({})",
            format_move(mv), stats.depth_reached, stats.value, stats.nodes_explored, stats.search_type
        );

        self.past_boards.push(self.get().clone());
        self.get_mut().play(mv)?;

        println!("{}", format_move(mv));
        Ok(())
    }

    /// Starts a new game on an empty board.
    fn new_game(&mut self, args: &[&str]) -> Result<()> {
        let size = match args.first() {
            Some(s) => s.parse::<usize>()?,
            None => self.config.size.unwrap_or(DEFAULT_BOARD_SIZE),
        };

        self.board = Some(self.agent.new_game(size)?);
        self.past_boards = vec![];

        println!("{}", self.get().notate());
        Ok(())
    }

    fn play_move(&mut self, args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        let Some(movestr) = args.first() else {
            return Err(anyhow!("no move provided"));
        };
        let mv = parse_move(movestr, self.get().size())?;

        self.past_boards.push(self.get().clone());
        if let Err(err) = self.get_mut().play(mv) {
            self.past_boards.pop();
            return Err(err);
        }

        println!("{}", self.get().notate());
        Ok(())
    }

    /// Prints the static evaluation of the position from Black's point of view.
    fn score(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        let board = self.get();
        let score = self.agent.evaluate(board) * board.side_to_move().perspective();
        println!("{}", score);
        Ok(())
    }

    /// Adopts a position from grid notation, e.g. `setup .B./.W./... B`.
    fn setup(&mut self, args: &[&str]) -> Result<()> {
        let [grid, side] = args else {
            return Err(anyhow!("expected a grid and a side to move"));
        };
        let Some(side_to_move) = Side::parse(side)? else {
            return Err(anyhow!("expected a side to move, received {side}"));
        };

        self.board = Some(parse_board(grid, side_to_move)?);
        self.past_boards = vec![];

        println!("{}", self.get().notate());
        Ok(())
    }

    fn show_board(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_started()?;
        print!("{}", self.get().pretty());
        Ok(())
    }

    fn undo_move(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        let Some(previous) = self.past_boards.pop() else {
            return Err(anyhow!("no move to undo"));
        };
        self.board = Some(previous);

        println!("{}", self.get().notate());
        Ok(())
    }

    fn valid_moves(&mut self, _args: &[&str]) -> Result<()> {
        self.ensure_started()?;

        let board = self.get();
        let moves = if board.is_terminal() { vec![] } else { board.legal_moves() };
        let movestr = moves.iter().map(|&mv| format_move(mv)).join(" ");

        println!("{}", moves.len());
        println!("{}", movestr);
        Ok(())
    }

    // accessors

    fn ensure_started(&mut self) -> Result<&mut Board> {
        if self.board.is_none() {
            Err(anyhow!("no game in progress"))
        } else {
            Ok(self.get_mut())
        }
    }

    /// Retrieves the board in a shared context.
    fn get(&self) -> &Board {
        self.board.as_ref().unwrap()
    }

    /// Retrieves the board in a mutable context.
    fn get_mut(&mut self) -> &mut Board {
        self.board.as_mut().unwrap()
    }

    // basic printers

    /// Prints the agent's identifier.
    fn name(&self) -> Result<()> {
        println!("{}", self.agent.name());
        Ok(())
    }

    /// Prints the server's ID.
    fn info(&self) -> Result<()>
    {
        println!(
            "id {} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        Ok(())
    }

    /// Prints an error to the HTP stream.
    fn err(&self, err: &Error) -> Result<()>
    {
        println!("err\n{}", err);
        self.ok()
    }

    /// Prints the ok footer to the HTP stream.
    fn ok(&self) -> Result<()>
    {
        println!("ok");
        Ok(())
    }
}
