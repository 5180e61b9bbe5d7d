//! Mochi Match entry point
//!
//! Native builds run a headless auto-play session: the board follows its own
//! hints until no swap matches or the move limit is reached. The browser
//! build is driven from JavaScript through `mochi_match::web`.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::Path;

    use mochi_match::sim::{BoardEvent, Controller};
    use mochi_match::{BoardPort, Cue, Rules};

    const MAX_MOVES: u32 = 50;

    /// Logs everything the board emits
    struct LogPort {
        big_clears: u32,
    }

    impl BoardPort for LogPort {
        fn emit(&mut self, event: &BoardEvent) {
            match event {
                BoardEvent::TilesCleared {
                    total_count,
                    combo_index,
                    caption,
                    pivot,
                    ..
                } => log::info!("{} ({} tiles, combo {}, at {})", caption, total_count, combo_index, pivot),
                BoardEvent::BoardSettled { falls, .. } => log::debug!("{} tiles fell", falls.len()),
                BoardEvent::CascadeFinished(summary) => log::debug!("Cascade: {:?}", summary),
                BoardEvent::InvalidMove { reason } => log::debug!("Move rejected: {}", reason),
            }
        }

        fn cue(&mut self, cue: Cue) {
            if cue == Cue::BigClear {
                self.big_clears += 1;
            }
            log::trace!("cue {:?}", cue);
        }
    }

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let seed = args
            .next()
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or_else(rand::random);
        let rules = match args.next() {
            Some(path) => Rules::load(Path::new(&path)).unwrap_or_else(|e| {
                log::warn!("Failed to load rules from {}: {}", path, e);
                Rules::headless()
            }),
            None => Rules::headless(),
        };

        let mut ctrl = Controller::new(seed, rules, LogPort { big_clears: 0 });
        println!("Seed {}\n{}", seed, ctrl.board().grid());

        let mut moves = 0;
        while moves < MAX_MOVES {
            let Some((a, b)) = ctrl.hint() else {
                log::info!("No swap left that makes a match");
                break;
            };
            moves += 1;
            let from = (a.row as i64, a.col as i64);
            let to = (b.row as i64, b.col as i64);
            match ctrl.request_swap(from, to) {
                Ok(Some(summary)) => log::info!(
                    "Move {}: {} <-> {} cleared {} over {} steps",
                    moves,
                    a,
                    b,
                    summary.total_cleared,
                    summary.steps
                ),
                Ok(None) => log::warn!("Move {}: hinted swap {} <-> {} did not match", moves, a, b),
                Err(e) => {
                    log::error!("Move {} rejected: {}", moves, e);
                    break;
                }
            }
        }

        println!("{}", ctrl.board().grid());
        println!(
            "{} moves, {} tiles cleared, {} big clears",
            moves,
            ctrl.clear_count(),
            ctrl.port().big_clears
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mochi Match (native) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is mochi_match::web::start, this is just to satisfy the compiler
}
