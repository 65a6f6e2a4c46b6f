//! Mathfall headless demo
//!
//! Runs the auto-pilot against the core sim for a stretch of simulated
//! time, prints round activity, and dumps the final snapshot as JSON.
//! Pass a seed as the first argument to replay a specific run.

use mathfall::GameSession;
use mathfall::consts::SIM_DT;
use mathfall::problem::Operation;
use mathfall::sim::GamePhase;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xC0FFEE);
    log::info!("Mathfall demo starting (seed {})", seed);

    let mut session = GameSession::new(seed);
    session.set_auto_pilot(true);
    session.start_game();

    // Two minutes of simulated play at 60 Hz
    let mut last_prompt = String::new();
    for _ in 0..(120 * 60) {
        session.frame(SIM_DT);

        if let Some(problem) = session.problem() {
            if problem.display != last_prompt {
                last_prompt = problem.display.clone();
                println!(
                    "level {:2}  {:<24} = {}",
                    session.score().level,
                    problem.display,
                    problem.answer.display
                );
            }
        }
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    let stats = session.stats();
    println!();
    println!(
        "score {}  level {}  correct {}  wrong {}  missed {}  accuracy {:.0}%",
        session.score().score,
        session.score().level,
        stats.total_correct(),
        stats.total_wrong(),
        stats.total_missed(),
        stats.accuracy() * 100.0
    );
    for op in Operation::ALL {
        let tally = stats.tally(op);
        if tally.total() > 0 {
            println!(
                "  {:<18} correct {:3}  wrong {}  missed {}",
                op.as_str(),
                tally.correct,
                tally.wrong,
                tally.missed
            );
        }
    }

    match serde_json::to_string_pretty(&session.snapshot()) {
        Ok(json) => println!("\n{}", json),
        Err(err) => log::error!("Snapshot serialization failed: {}", err),
    }
}
