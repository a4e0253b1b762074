use super::*;
use crate::test_support::FixedAdvance;

fn style() -> QuizStyle {
    QuizStyle::default()
}

fn spec(entry: &TimelineEntry) -> &FrameSpec {
    match &entry.source {
        FrameSource::Render(s) => s,
        FrameSource::RepeatPrevious => panic!("entry has no frame spec"),
    }
}

#[test]
fn end_to_end_scenario_has_ten_entries_and_lasts_8_9s() {
    let mut m = FixedAdvance::default();
    let t = build_timeline("Qui suis je en Europe", 2, &style(), &mut m).unwrap();

    assert_eq!(t.entries.len(), 10);
    assert_eq!(t.total(), Millis(8900));
    assert_eq!(t.lines, vec!["Qui suis je en Europe".to_string()]);

    let phases: Vec<Phase> = t.entries.iter().map(|e| e.phase).collect();
    assert_eq!(
        phases,
        vec![
            Phase::Accumulating,
            Phase::Accumulating,
            Phase::Accumulating,
            Phase::Accumulating,
            Phase::Accumulating,
            Phase::Pause,
            Phase::Reveal,
            Phase::Blink,
            Phase::Blink,
            Phase::Blink,
        ]
    );

    assert_eq!(spec(&t.entries[0]).question, "Qui");
    assert_eq!(spec(&t.entries[2]).question, "Qui suis je");
    assert_eq!(spec(&t.entries[4]).question, "Qui suis je en Europe");
    for e in &t.entries[..5] {
        assert_eq!(e.duration, Millis(500));
        assert_eq!(spec(e).picture, 1);
        assert!(!spec(e).show_answer);
    }

    assert_eq!(t.entries[5].source, FrameSource::RepeatPrevious);
    assert_eq!(t.entries[5].duration, Millis(2000));

    let reveal = spec(&t.entries[6]);
    assert!(reveal.show_answer);
    assert_eq!(reveal.answer_size, 48.0);
    assert_eq!(reveal.question, "Qui suis je en Europe");
    assert_eq!(t.entries[6].duration, Millis(3500));

    let sizes: Vec<f32> = t.entries[7..].iter().map(|e| spec(e).answer_size).collect();
    assert_eq!(sizes, vec![52.0, 57.0, 62.0]);
    assert!(t.entries[7..].iter().all(|e| e.duration == Millis(300)));
}

#[test]
fn entry_count_and_total_follow_the_formula() {
    let text = "un deux trois quatre cinq six sept huit neuf dix onze douze treize";
    let mut s = style();
    s.timing.word_secs = 0.25;
    s.timing.pause_secs = 1.5;
    s.timing.reveal_extra_secs = 2.0;
    s.timing.blink_secs = 0.1;
    s.timing.blink_increments = vec![5, 10];

    let t = build_timeline(text, 3, &s, &mut FixedAdvance::default()).unwrap();
    let w = 13u64;
    let k = 2u64;
    assert_eq!(t.entries.len() as u64, w + 2 + k);
    assert_eq!(
        t.total(),
        Millis(w * 250 + 1500 + (250 + 2000) + k * 100)
    );
}

#[test]
fn pictures_cycle_every_c_words_and_wrap() {
    let text = (0..13).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
    let t = build_timeline(&text, 2, &style(), &mut FixedAdvance::default()).unwrap();

    let pics: Vec<usize> = t.entries[..13].iter().map(|e| spec(e).picture).collect();
    assert_eq!(pics, vec![1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 1]);
    assert_eq!(spec(&t.entries[14]).picture, 1);

    for i in 0..40 {
        assert_eq!(picture_after_word(i, 6, 4), (i / 6 + 1) % 4);
        assert!(picture_after_word(i, 3, 1) == 0);
    }
}

#[test]
fn lines_wrap_at_text_width() {
    // 24 px per char at size 48; 980 px fits 40 chars.
    let word = "abcdefghij";
    let text = vec![word; 9].join(" ");
    let t = build_timeline(&text, 1, &style(), &mut FixedAdvance::default()).unwrap();

    assert_eq!(t.lines.len(), 3);
    assert!(t.lines.iter().all(|l| l.chars().count() * 24 <= 980));
    assert_eq!(t.lines.join(" "), text);
    assert_eq!(spec(&t.entries[8]).question, text);
}

#[test]
fn empty_blink_list_emits_no_blinks() {
    let mut s = style();
    s.timing.blink_increments.clear();
    let t = build_timeline("a b", 1, &s, &mut FixedAdvance::default()).unwrap();
    assert_eq!(t.entries.len(), 4);
    assert_eq!(t.entries.last().map(|e| e.phase), Some(Phase::Reveal));
}

#[test]
fn empty_text_and_missing_pictures_are_rejected() {
    let err = build_timeline("  \n ", 2, &style(), &mut FixedAdvance::default()).unwrap_err();
    assert!(matches!(err, QuizError::Validation(ref m) if m.contains("question text is empty")));

    let err = build_timeline("a", 0, &style(), &mut FixedAdvance::default()).unwrap_err();
    assert!(matches!(err, QuizError::Validation(_)));
}

#[test]
fn boundaries_and_repeat_resolution() {
    let t = build_timeline("a b", 1, &style(), &mut FixedAdvance::default()).unwrap();
    let b = t.boundaries();
    assert_eq!(b.len(), t.entries.len() + 1);
    assert_eq!(b[0], Millis::ZERO);
    assert_eq!(b[2], Millis(1000));
    assert_eq!(*b.last().unwrap(), t.total());

    let paused = t.resolve_spec(2).unwrap();
    assert_eq!(paused, spec(&t.entries[1]));
    assert!(t.resolve_spec(99).is_none());
}

#[test]
fn timeline_serializes_for_planning() {
    let t = build_timeline("a", 1, &style(), &mut FixedAdvance::default()).unwrap();
    let v = serde_json::to_value(&t).unwrap();
    assert_eq!(v["entries"][0]["phase"], "accumulating");
    assert_eq!(v["entries"][1]["source"], "repeat_previous");
    assert_eq!(v["entries"][0]["duration"], 500);
}

#[test]
fn measurement_errors_fail_the_build() {
    let mut engine = crate::assets::store::TextLayoutEngine::new();
    let err = build_timeline("Qui suis je", 1, &style(), &mut engine).unwrap_err();
    assert!(matches!(err, QuizError::Asset(_)), "{err}");
}

#[derive(Clone, Default)]
struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn over_width_word_is_reported_once_per_job() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let long = "x".repeat(50);
    let text = format!("Qui {long} suis");
    let s = style();
    tracing::subscriber::with_default(subscriber, || {
        let mut m = FixedAdvance::default();
        let t = build_timeline(&text, 1, &s, &mut m).unwrap();
        assert_eq!(t.lines, vec!["Qui".to_string(), long.clone(), "suis".to_string()]);

        for i in 0..t.entries.len() {
            let spec = t.resolve_spec(i).unwrap();
            let inputs = crate::layout::frame::FrameInputs {
                title: "Qui suis-je ?",
                question: &spec.question,
                answer: "La Russie",
                show_answer: spec.show_answer,
                answer_size: spec.answer_size,
                picture_aspect: Some(1.0),
            };
            crate::layout::frame::FrameLayout::compute(&s.layout, &inputs, &mut m).unwrap();
        }
    });

    let out = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
    assert_eq!(out.matches("word is wider than a line").count(), 1, "{out}");
}
