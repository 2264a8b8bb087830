//! Match drivers for the `play` and `simulate` commands

use std::io::{BufRead, Write};
use std::time::Instant;

use anyhow::{Context, Result};
use rps_core::{
    GameConfig, GameHistory, GameMode, HistorySink, KeyBindings, Match, MatchStatistics,
    MatchSummary, Move, Player, RandomSource, RoundReport, SeededRng, Tactic,
};
use serde::Serialize;
use tracing::{debug, warn};

pub struct Options {
    pub mode: GameMode,
    pub rounds: u32,
    pub seed: u64,
    pub json: bool,
}

/// Everything `--json` prints for one match
#[derive(Serialize)]
struct MatchReport {
    seed: u64,
    rounds: Vec<RoundLine>,
    statistics: MatchStatistics,
    summary: MatchSummary,
}

#[derive(Serialize)]
struct RoundLine {
    #[serde(flatten)]
    report: RoundReport,
    tactic: Option<Tactic>,
}

/// Play a match from key presses: one input line per round.
/// A missing line (EOF) is a round where nobody pressed anything.
pub fn play<I: BufRead, W: Write>(
    config: &GameConfig,
    options: &Options,
    input: I,
    out: &mut W,
) -> Result<()> {
    let keys = KeyBindings::default();
    let rng = SeededRng::new(options.seed);
    let mut game = Match::with_config(config, options.mode, options.rounds, rng)
        .context("cannot start match")?;
    let mut lines = input.lines();

    if !options.json {
        let mode = options.mode.display_name();
        writeln!(out, "{} - {} rounds", mode, game.total_rounds())?;
        writeln!(out, "{}", key_help(&keys, options.mode))?;
    }

    run(&mut game, options, out, |game, out| {
        if !options.json {
            let (round, total) = (game.current_round(), game.total_rounds());
            writeln!(out, "Round {}/{}:", round, total)?;
            out.flush()?;
        }
        let line = match lines.next() {
            Some(line) => line.context("failed to read key presses")?,
            None => String::new(),
        };
        for key in line.chars().filter(|c| !c.is_whitespace()) {
            match keys.resolve(game.mode(), key) {
                Some((player, m)) => game.submit_move(player, m),
                None => warn!(%key, "unbound key ignored"),
            }
        }
        Ok(())
    })
}

/// Play the computer with a scripted human that cycles through `pattern`
pub fn simulate<W: Write>(
    config: &GameConfig,
    options: &Options,
    pattern: &[Move],
    out: &mut W,
) -> Result<()> {
    anyhow::ensure!(!pattern.is_empty(), "pattern needs at least one move");
    let rng = SeededRng::new(options.seed);
    let mut game = Match::with_config(config, GameMode::Pvc, options.rounds, rng)
        .context("cannot start simulation")?;
    let mut script = pattern.iter().copied().cycle();

    run(&mut game, options, out, |game, _| {
        if let Some(m) = script.next() {
            game.submit_move(Player::One, m);
        }
        Ok(())
    })
}

/// Drive every round of `game`, letting `submit` fill each open round
fn run<R, W, F>(game: &mut Match<R>, options: &Options, out: &mut W, mut submit: F) -> Result<()>
where
    R: RandomSource,
    W: Write,
    F: FnMut(&mut Match<R>, &mut W) -> Result<()>,
{
    let started = Instant::now();
    let mut rounds = Vec::with_capacity(game.total_rounds() as usize);

    while game.has_more_rounds() {
        game.start_new_round().context("round did not open")?;
        submit(game, out)?;
        let report = game.finish_round().context("round did not resolve")?;
        let tactic = game.opponent().and_then(|ai| ai.last_tactic());
        debug!(round = report.round, outcome = %report.outcome, ?tactic, "round resolved");

        if !options.json {
            writeln!(out, "{}", describe_round(game.mode(), &report))?;
            writeln!(out, "{}", game.score_text())?;
        }
        rounds.push(RoundLine { report, tactic });
    }

    let summary = game.summary(started.elapsed());
    let statistics = game.statistics();
    let mut history = GameHistory::new();
    history.record(summary.clone());

    if options.json {
        let report = MatchReport {
            seed: options.seed,
            rounds,
            statistics,
            summary,
        };
        serde_json::to_writer_pretty(&mut *out, &report).context("failed to encode report")?;
        writeln!(out)?;
    } else {
        writeln!(out)?;
        writeln!(out, "{}", summary.winner_label)?;
        writeln!(out)?;
        writeln!(out, "{}", statistics.summary())?;
        writeln!(out)?;
        writeln!(out, "{}", history.stats_summary())?;
    }
    out.flush()?;
    Ok(())
}

fn key_help(keys: &KeyBindings, mode: GameMode) -> String {
    let p1 = keys.player1;
    let mut help = format!(
        "Player 1 keys: {} rock, {} paper, {} scissors",
        p1.rock, p1.paper, p1.scissors
    );
    if mode == GameMode::Pvp {
        let p2 = keys.player2;
        help.push_str(&format!(
            "\nPlayer 2 keys: {} rock, {} paper, {} scissors",
            p2.rock, p2.paper, p2.scissors
        ));
    }
    help
}

fn describe_round(mode: GameMode, report: &RoundReport) -> String {
    let (first, second) = match mode {
        GameMode::Pvc => ("You", "Computer"),
        GameMode::Pvp => ("Player 1", "Player 2"),
    };
    let shown = |m: Option<Move>, cheated: bool| {
        let name = m.map(Move::name).unwrap_or("nothing");
        if cheated {
            format!("{} (changed move)", name)
        } else {
            name.to_string()
        }
    };
    format!(
        "  {} {} vs {} {}: {}",
        first,
        shown(report.player1_move, report.player1_cheated),
        second,
        shown(report.player2_move, report.player2_cheated),
        report.outcome
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn options(mode: GameMode, rounds: u32, json: bool) -> Options {
        Options {
            mode,
            rounds,
            seed: 42,
            json,
        }
    }

    fn run_play(mode: GameMode, rounds: u32, json: bool, input: &str) -> Result<Vec<u8>> {
        let config = GameConfig::default();
        let options = options(mode, rounds, json);
        let mut out = Vec::new();
        play(&config, &options, Cursor::new(input), &mut out)?;
        Ok(out)
    }

    fn run_simulate(
        config: &GameConfig,
        rounds: u32,
        json: bool,
        pattern: &[Move],
    ) -> Result<Vec<u8>> {
        let options = options(GameMode::Pvc, rounds, json);
        let mut out = Vec::new();
        simulate(config, &options, pattern, &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_pvp_play_from_key_lines() {
        let out = run_play(GameMode::Pvp, 3, false, "a l\ns l\nd j\n").unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Player 2 keys: J rock, K paper, L scissors"));
        assert!(text.contains("\n1 - 2\n"));
        assert!(text.contains("Player 2 Wins!"));
        assert!(text.contains("Total Rounds: 3"));
    }

    #[test]
    fn test_eof_rounds_are_walkovers_for_the_computer() {
        let out = run_play(GameMode::Pvc, 2, true, "").unwrap();

        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["summary"]["player2_score"], 2);
        assert_eq!(report["summary"]["winner_label"], "Computer Wins!");
        assert_eq!(report["rounds"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_simulate_reports_tactics() {
        let pattern = [Move::Rock, Move::Paper];
        let out = run_simulate(&GameConfig::default(), 6, true, &pattern).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        let rounds = report["rounds"].as_array().unwrap();
        assert_eq!(rounds.len(), 6);
        assert_eq!(rounds[0]["tactic"], "Opening");
        assert_eq!(rounds[1]["player1_move"], "Paper");
        assert_eq!(report["statistics"]["rounds"], 6);
    }

    #[test]
    fn test_simulate_rejects_empty_pattern() {
        assert!(run_simulate(&GameConfig::default(), 3, false, &[]).is_err());
    }

    #[test]
    fn test_round_limit_comes_from_config() {
        let json = r#"{"max_rounds": 2, "default_rounds": 2}"#;
        let config = GameConfig::from_json(json).unwrap();
        let err = run_simulate(&config, 3, false, &[Move::Rock]).unwrap_err();
        assert!(err.to_string().contains("cannot start simulation"));
    }
}
