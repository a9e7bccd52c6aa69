//! # Play Command
//!
//! Plays one round of Clock Patience in the terminal.
//!
//! - **Automatic**: the session's auto-play controller shuffles, deals and plays
//!   on its own timer; the command feeds it simulated 60 Hz frames and prints
//!   what happens.
//! - **Manual**: the player types `shuffle`, `deal`, `play`, `reveal`,
//!   `move <pile>`, `piles` or `q`; animations complete instantly.
//!
//! Either way the round ends on the result screen, whose answer ("yes" for a
//! win) is printed and optionally written to a JSONL round log.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use clockpatience_engine::cards::{CardSet, PileIndex};
use clockpatience_engine::config::AutoStrategy;
use clockpatience_engine::feedback::Feedback;
use clockpatience_engine::game::{GameMode, ModeChoice, Session};
use clockpatience_engine::logger::{RoundLogger, RoundOutcome};
use clockpatience_engine::rules::{LossReason, MoveOutcome, RevealOutcome};

use crate::cli::Mode;
use crate::config::Config;
use crate::error::CliError;
use crate::io_utils::{load_card_identifiers, read_stdin_line};
use crate::ui;

/// One simulated display frame.
const FRAME: Duration = Duration::from_micros(16_667);

/// Simulated time after which an automatic round is considered stuck.
const MAX_AUTO_TIME: Duration = Duration::from_secs(60 * 60);

/// Arguments of the `play` command after clap parsing.
#[derive(Debug, Clone)]
pub struct PlayOptions {
    pub mode: Mode,
    pub seed: Option<u64>,
    pub question: Option<String>,
    pub output: Option<PathBuf>,
    pub cards_dir: Option<PathBuf>,
}

/// Handle the play command.
///
/// The seed comes from [`Config::resolve_seed`]. An invalid card directory is
/// refused before anything is played.
///
/// # Errors
///
/// - `CliError::Engine` when the card identifiers do not form a valid set
/// - `CliError::InvalidInput` when no question is available
/// - `CliError::Interrupted` when the player quits a manual round
/// - `CliError::Io` on output or round-log failures
pub fn handle_play_command(
    opts: PlayOptions,
    config: &Config,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    let seed = config.resolve_seed(opts.seed);
    let cards = match &opts.cards_dir {
        Some(dir) => {
            let names = load_card_identifiers(dir).map_err(CliError::InvalidInput)?;
            CardSet::from_identifiers(&names)
                .map_err(|e| CliError::Engine(format!("Unusable card set: {}", e)))?
        }
        None => CardSet::standard(),
    };
    let mut session = Session::new(cards, seed, config.session_config());

    writeln!(
        out,
        "play: mode={} seed={} strategy={}",
        opts.mode.as_str(),
        seed,
        config.strategy
    )?;

    match opts.mode {
        Mode::Auto => play_automatic(&mut session, opts.question, out, err, stdin)?,
        Mode::Manual => play_manual(&mut session, opts.question, out, err, stdin)?,
    }

    write_result(&session, out)?;
    if let Some(path) = &opts.output {
        log_round(&session, path)?;
        writeln!(out, "Round saved to {}", path.display())?;
    }
    Ok(())
}

fn ask_question(
    given: Option<String>,
    out: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Option<String> {
    if let Some(q) = given.filter(|q| !q.trim().is_empty()) {
        return Some(q);
    }
    let _ = write!(out, "Ask your question: ");
    let _ = out.flush();
    read_stdin_line(stdin).filter(|q| !q.is_empty())
}

fn play_automatic(
    session: &mut Session,
    question: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    session.choose(ModeChoice::Automatic);
    if session.config().auto_strategy == AutoStrategy::Reveal {
        ui::display_warning(
            err,
            "the reveal strategy leaves cards in place, so a round can never be won; \
             set CLOCKPATIENCE_STRATEGY=move to play cards onto their piles",
        )?;
    }
    let Some(question) = ask_question(question, out, stdin) else {
        return Err(CliError::InvalidInput("a question is required".into()));
    };
    session.type_text(&question);
    session.submit_question();
    writeln!(out, "Question: {}", question)?;

    while session.mode() == GameMode::Automatic {
        if session.clock() > MAX_AUTO_TIME {
            return Err(CliError::Engine("automatic round did not finish".into()));
        }
        let from = session.table().pointer();
        session.tick(FRAME);
        report_feedback(session, from, out)?;
    }
    Ok(())
}

fn report_feedback(
    session: &mut Session,
    from: PileIndex,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut landed = false;
    for event in session.take_feedback() {
        match event {
            Feedback::ShuffleStarted => writeln!(out, "Shuffling...")?,
            Feedback::ShuffleStopped => writeln!(out, "Shuffle complete")?,
            Feedback::CardDealt { .. } => landed = true,
            Feedback::PlayedCard(card) => writeln!(
                out,
                "Play: {} {} -> {}",
                session.cards().name(card),
                ui::pile_label(from),
                ui::pile_label(session.table().pointer())
            )?,
            Feedback::RejectedMove => writeln!(out, "Move rejected")?,
            _ => {}
        }
    }
    if landed && !session.deal_engine().is_active() {
        writeln!(out, "Dealt {} cards", session.table().card_count())?;
    }
    Ok(())
}

/// Pile named by the player: `1`..`12` around the clock, `13` or `c` for the center.
pub fn parse_pile(input: &str) -> Option<PileIndex> {
    let s = input.trim().to_ascii_lowercase();
    if s == "c" || s == "center" {
        return Some(PileIndex::CENTER);
    }
    let n: usize = s.parse().ok()?;
    if n == 0 {
        return None;
    }
    PileIndex::new(n - 1)
}

fn play_manual(
    session: &mut Session,
    question: Option<String>,
    out: &mut dyn Write,
    err: &mut dyn Write,
    stdin: &mut dyn BufRead,
) -> Result<(), CliError> {
    session.choose(ModeChoice::Manual);
    writeln!(
        out,
        "Commands: shuffle, deal, play, reveal, move <pile>, piles, q"
    )?;
    let mut question = question;

    while session.mode() == GameMode::Manual {
        if session.prompt().open {
            let Some(q) = ask_question(question.take(), out, stdin) else {
                return Err(CliError::Interrupted("no question asked".into()));
            };
            if q == "q" {
                return Err(CliError::Interrupted("player quit".into()));
            }
            session.type_text(&q);
            session.submit_question();
            writeln!(out, "Question: {}", q)?;
            continue;
        }

        write!(out, "> ")?;
        out.flush()?;
        let Some(line) = read_stdin_line(stdin) else {
            return Err(CliError::Interrupted("input closed".into()));
        };
        let mut words = line.split_whitespace();
        let cmd = words.next().unwrap_or("");
        match cmd {
            "" => {}
            "q" | "quit" => return Err(CliError::Interrupted("player quit".into())),
            "shuffle" => {
                if session.request_shuffle() {
                    session.finish_animations();
                    writeln!(out, "Shuffled")?;
                } else {
                    ui::write_error(err, "shuffle is not available now")?;
                }
            }
            "deal" => {
                if session.request_deal() {
                    session.finish_animations();
                    ui::write_piles(out, session.cards(), session.table())?;
                } else {
                    ui::write_error(err, "deal is not available now")?;
                }
            }
            "play" => {
                if session.start_round() {
                    writeln!(out, "Round started at the center pile")?;
                } else {
                    ui::write_error(err, "deal and ask your question first")?;
                }
            }
            "piles" => ui::write_piles(out, session.cards(), session.table())?,
            "reveal" => {
                let from = session.table().pointer();
                match session.reveal() {
                    RevealOutcome::NotPlaying => ui::write_error(err, "the round has not started")?,
                    RevealOutcome::Continue { card, next } => writeln!(
                        out,
                        "Revealed {}: {} -> {}",
                        session.cards().name(card),
                        ui::pile_label(from),
                        ui::pile_label(next)
                    )?,
                    RevealOutcome::Win | RevealOutcome::Lose(_) => {}
                }
            }
            "move" => {
                let Some(dest) = words.next().and_then(parse_pile) else {
                    ui::write_error(err, "usage: move <1-12|c>")?;
                    continue;
                };
                let Some(card) = session.table().current_card() else {
                    ui::write_error(err, "no card to move")?;
                    continue;
                };
                let name = session.cards().name(card).to_string();
                match session.move_card(card, dest) {
                    MoveOutcome::Rejected(reason) => {
                        ui::write_error(err, &format!("cannot move {}: {:?}", name, reason))?;
                    }
                    MoveOutcome::Continue { to, .. } => {
                        writeln!(out, "Moved {} to {}", name, ui::pile_label(to))?;
                        if let Some(next) = session.table().current_card() {
                            writeln!(out, "Next card: {}", session.cards().name(next))?;
                        }
                    }
                    MoveOutcome::Win | MoveOutcome::Lose(_) => {
                        writeln!(out, "Moved {} to {}", name, ui::pile_label(dest))?;
                    }
                }
            }
            other => ui::write_error(err, &format!("unknown command '{}'", other))?,
        }
    }
    Ok(())
}

fn loss_text(reason: LossReason) -> &'static str {
    match reason {
        LossReason::EmptyPile => "the current pile was empty",
        LossReason::DuplicateTop => "the current pile's top card was already revealed",
        LossReason::PileExhausted => "no unrevealed card was left on the current pile",
    }
}

fn write_result(session: &Session, out: &mut dyn Write) -> Result<(), CliError> {
    let Some(result) = session.result() else {
        return Ok(());
    };
    match result.outcome {
        RoundOutcome::Won => writeln!(out, "Result: won")?,
        RoundOutcome::Lost(reason) => writeln!(out, "Result: lost ({})", loss_text(reason))?,
    }
    writeln!(out, "Revealed: {}/{}", result.revealed, session.cards().len())?;
    writeln!(out, "Answer: {}", result.outcome.answer().to_uppercase())?;
    Ok(())
}

fn log_round(session: &Session, path: &Path) -> Result<(), CliError> {
    let mut logger = RoundLogger::create(path)?;
    let id = logger.next_id();
    if let Some(record) = session.round_record(id) {
        logger.write(&record)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn opts(mode: Mode) -> PlayOptions {
        PlayOptions {
            mode,
            seed: Some(42),
            question: Some("Will it work?".into()),
            output: None,
            cards_dir: None,
        }
    }

    #[test]
    fn test_parse_pile_accepts_clock_positions() {
        assert_eq!(parse_pile("1"), PileIndex::new(0));
        assert_eq!(parse_pile("12"), PileIndex::new(11));
        assert_eq!(parse_pile("13"), Some(PileIndex::CENTER));
        assert_eq!(parse_pile("C"), Some(PileIndex::CENTER));
        assert_eq!(parse_pile("0"), None);
        assert_eq!(parse_pile("14"), None);
        assert_eq!(parse_pile("x"), None);
    }

    #[test]
    fn test_automatic_round_prints_answer() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"");
        let result = handle_play_command(
            opts(Mode::Auto),
            &Config::default(),
            &mut out,
            &mut err,
            &mut input,
        );
        assert!(result.is_ok(), "{:?}", result);

        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("play: mode=auto seed=42"));
        assert!(output.contains("Shuffle complete"));
        assert!(output.contains("Dealt 52 cards"));
        assert!(output.contains("Answer: NO"));
        assert!(String::from_utf8(err).unwrap().contains("WARNING"));
    }

    #[test]
    fn test_move_strategy_skips_warning() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"");
        let config = Config {
            strategy: AutoStrategy::Move,
            ..Config::default()
        };
        handle_play_command(opts(Mode::Auto), &config, &mut out, &mut err, &mut input).unwrap();
        assert!(String::from_utf8(err).unwrap().is_empty());
        assert!(String::from_utf8(out).unwrap().contains("strategy=move"));
    }

    #[test]
    fn test_automatic_reads_question_from_stdin() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"Is it sunny?\n");
        let mut o = opts(Mode::Auto);
        o.question = None;
        handle_play_command(o, &Config::default(), &mut out, &mut err, &mut input).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Question: Is it sunny?"));
    }

    #[test]
    fn test_automatic_without_question_fails() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"");
        let mut o = opts(Mode::Auto);
        o.question = None;
        let result = handle_play_command(o, &Config::default(), &mut out, &mut err, &mut input);
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_manual_quit_is_interrupted() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"shuffle\nq\n");
        let result = handle_play_command(
            opts(Mode::Manual),
            &Config::default(),
            &mut out,
            &mut err,
            &mut input,
        );
        assert!(matches!(result, Err(CliError::Interrupted(_))));
        assert!(String::from_utf8(out).unwrap().contains("Shuffled"));
    }

    #[test]
    fn test_manual_reveals_until_result() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let script = "shuffle\ndeal\nplay\n".to_string() + &"reveal\n".repeat(60);
        let mut input = Cursor::new(script.into_bytes());
        let result = handle_play_command(
            opts(Mode::Manual),
            &Config::default(),
            &mut out,
            &mut err,
            &mut input,
        );
        assert!(result.is_ok(), "{:?}", result);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Question: Will it work?"));
        assert!(output.contains("Revealed "));
        assert!(output.contains("Result: lost"));
        assert!(output.contains("Answer: NO"));
    }

    #[test]
    fn test_manual_rejects_wrong_pile() {
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(b"deal\nplay\nmove 99\nq\n");
        let result = handle_play_command(
            opts(Mode::Manual),
            &Config::default(),
            &mut out,
            &mut err,
            &mut input,
        );
        assert!(matches!(result, Err(CliError::Interrupted(_))));
        assert!(String::from_utf8(err).unwrap().contains("usage: move"));
    }

    /// Card images whose sorted names give a load order that an unshuffled
    /// deal turns into a winning table: Aces in the center, rank `p + 2` on
    /// pile `p`, Kings on pile 11. Decreasing zero padding keeps the sort
    /// order equal to the index order.
    fn winning_cards_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..52 {
            let pile = i % 13;
            let rank = if pile == 12 { 1 } else { pile + 2 };
            let name = format!("{}{}_{}.png", "0".repeat(60 - i), rank, i);
            std::fs::write(dir.path().join(name), b"").unwrap();
        }
        dir
    }

    #[test]
    fn test_manual_moves_win_and_answer_yes() {
        let dir = winning_cards_dir();
        let mut script = String::from("deal\nplay\n");
        for _ in 0..4 {
            for pile in 1..=12 {
                script.push_str(&format!("move {}\n", pile));
            }
            script.push_str("move c\n");
        }
        let mut out = Vec::new();
        let mut err = Vec::new();
        let mut input = Cursor::new(script.into_bytes());
        let mut o = opts(Mode::Manual);
        o.cards_dir = Some(dir.path().to_path_buf());

        let result = handle_play_command(o, &Config::default(), &mut out, &mut err, &mut input);
        assert!(result.is_ok(), "{:?}", result);
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("Result: won"), "{}", output);
        assert!(output.contains("Revealed: 52/52"));
        assert!(output.contains("Answer: YES"));
        assert!(String::from_utf8(err).unwrap().is_empty());
    }
}
