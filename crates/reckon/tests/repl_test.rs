//! Integration tests for the interactive prompt

use chrono::NaiveDateTime;
use reckon::config::ReckonConfig;
use reckon::repl::{HISTORY_TIME_FORMAT, Repl};

fn quiet_config() -> ReckonConfig {
    ReckonConfig {
        prompt: String::new(),
        ..ReckonConfig::default()
    }
}

fn run_session(config: &ReckonConfig, input: &str) -> (Repl, String) {
    run_session_bytes(config, input.as_bytes())
}

fn run_session_bytes(config: &ReckonConfig, input: &[u8]) -> (Repl, String) {
    let mut repl = Repl::from_config(config);
    let mut output = Vec::new();
    repl.run(input, &mut output).unwrap();
    (repl, String::from_utf8(output).unwrap())
}

/// Replace each history line's `[<local time>]` with `[TIME]`, checking that
/// the stamp parses.
fn mask_timestamps(transcript: &str) -> String {
    transcript
        .lines()
        .map(|line| {
            let (Some(open), Some(close)) = (line.find(". ["), line.find("] ")) else {
                return line.to_string();
            };
            let stamp = &line[open + 3..close];
            assert!(
                NaiveDateTime::parse_from_str(stamp, HISTORY_TIME_FORMAT).is_ok(),
                "bad history timestamp {stamp:?}"
            );
            format!("{}[TIME]{}", &line[..open + 2], &line[close + 1..])
        })
        .map(|line| line + "\n")
        .collect()
}

#[test]
fn test_calculations_and_history() {
    let (repl, transcript) = run_session(
        &quiet_config(),
        "5 + 3\n6 / 2\n10 / 0\n5 % 3\nhistory\nexit\n",
    );

    insta::assert_snapshot!(mask_timestamps(&transcript), @r"
    5 + 3 = 8
    6 / 2 = 3
    Error: Division by zero is not allowed.
    Error: Unsupported operation: %
    1. [TIME] 5 + 3 = 8
    2. [TIME] 6 / 2 = 3
    Goodbye.
    ");
    assert_eq!(repl.calculator().history().len(), 2);
}

#[test]
fn test_invalid_input_is_reported_and_loop_continues() {
    let (repl, transcript) = run_session(&quiet_config(), "abc + 1\n1 +\n\n2 * 4\n");

    assert_eq!(
        transcript,
        "Error: Invalid input 'abc'. Please enter a valid number.\n\
         Error: Expected '<number> <operator> <number>', got 2 token(s). Type 'help' for usage.\n\
         2 * 4 = 8\n\
         \n\
         Goodbye.\n"
    );
    assert_eq!(repl.calculator().history().len(), 1);
}

#[test]
fn test_clear_then_history_is_empty() {
    let (repl, transcript) = run_session(&quiet_config(), "1 + 1\nclear\nhistory\nquit\n");

    assert!(transcript.contains("History cleared.\nHistory is empty.\n"));
    assert!(repl.calculator().history().is_empty());
}

#[test]
fn test_prompt_is_written_before_each_line() {
    let config = ReckonConfig {
        prompt: "> ".to_string(),
        ..ReckonConfig::default()
    };
    let (_, transcript) = run_session(&config, "2 - 5\nexit\n");

    assert_eq!(transcript, "> 2 - 5 = -3\n> Goodbye.\n");
}

#[test]
fn test_show_history_on_exit() {
    let config = ReckonConfig {
        show_history_on_exit: true,
        ..quiet_config()
    };
    let (_, transcript) = run_session(&config, "3 * 3\nexit\n");

    assert_eq!(
        mask_timestamps(&transcript),
        "3 * 3 = 9\n1. [TIME] 3 * 3 = 9\nGoodbye.\n"
    );
}

#[test]
fn test_help_lists_commands() {
    let (_, transcript) = run_session(&quiet_config(), "help\n");
    for command in ["history", "clear", "help", "exit"] {
        assert!(transcript.contains(command), "help should mention {command}");
    }
}

#[test]
fn test_invalid_utf8_line_is_reported_and_loop_continues() {
    let (repl, transcript) =
        run_session_bytes(&quiet_config(), b"1 + 1\n\xff\xfe\n2 + 2\nexit\n");

    assert_eq!(
        transcript,
        "1 + 1 = 2\nError: Input is not valid UTF-8.\n2 + 2 = 4\nGoodbye.\n"
    );
    assert_eq!(repl.calculator().history().len(), 2);
}
