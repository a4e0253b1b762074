use super::*;
use crate::foundation::error::QuizError;

fn chars(s: &str) -> QuizResult<f32> {
    Ok(s.chars().count() as f32 * 10.0)
}

fn wrap(text: &str, max_width: f32) -> Vec<String> {
    wrap_text(text, max_width, chars).unwrap()
}

fn normalized(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn empty_text_has_no_lines() {
    assert!(wrap("", 100.0).is_empty());
    assert!(wrap(" \n\t ", 100.0).is_empty());
}

#[test]
fn short_text_stays_on_one_line() {
    assert_eq!(
        wrap("Qui suis je", 200.0),
        vec!["Qui suis je".to_string()]
    );
}

#[test]
fn greedy_breaks_at_max_width() {
    // "aaa bbb" is exactly 70px and fits; adding " cc" does not.
    let lines = wrap("aaa bbb cc dddd", 70.0);
    assert_eq!(lines, vec!["aaa bbb", "cc dddd"]);
}

#[test]
fn oversized_word_gets_its_own_line() {
    let lines = wrap("a supercalifragilistic b", 50.0);
    assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
}

#[test]
fn lines_fit_and_reconstruct_the_text() {
    let texts = [
        "Qui suis je en Europe",
        "Je suis le plus grand pays du monde et je m'étends sur deux continents",
        "  spaces   and\ttabs\nand newlines  ",
        "one",
    ];
    for max in [40.0, 90.0, 150.0, 1000.0] {
        for text in texts {
            let lines = wrap(text, max);
            for line in &lines {
                let fits = chars(line).unwrap() <= max;
                let single_word = !line.contains(' ');
                assert!(fits || single_word, "line {line:?} exceeds {max}");
            }
            assert_eq!(lines.join(" "), normalized(text));
        }
    }
}

#[test]
fn accumulator_matches_batch_wrap() {
    let text = "Je suis le plus grand pays du monde et je m'étends sur deux continents";
    let mut acc = LineAccumulator::new(120.0);
    let mut breaks = 0;
    for (i, word) in text.split_whitespace().enumerate() {
        match acc.push_word(word, chars).unwrap() {
            WordPlacement::Started => assert_eq!(i, 0),
            WordPlacement::Appended => {}
            WordPlacement::Broke => breaks += 1,
        }
        assert_eq!(
            acc.text_so_far(),
            text.split_whitespace().take(i + 1).collect::<Vec<_>>().join(" ")
        );
    }
    assert_eq!(acc.lines().len(), breaks);
    assert!(!acc.current().is_empty());

    let lines = acc.finish();
    assert_eq!(lines, wrap(text, 120.0));
}

#[test]
fn measurement_errors_abort_wrapping() {
    let mut calls = 0;
    let err = wrap_text("Qui suis je", 100.0, |s| {
        calls += 1;
        if s.contains("suis") {
            Err(QuizError::asset("no font registered for Question"))
        } else {
            chars(s)
        }
    })
    .unwrap_err();
    assert!(matches!(err, QuizError::Asset(_)));
    assert_eq!(calls, 2);
}
