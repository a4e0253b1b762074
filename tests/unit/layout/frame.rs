use super::*;
use crate::test_support::FixedAdvance;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-3
}

fn inputs<'a>(question: &'a str, show_answer: bool, aspect: Option<f64>) -> FrameInputs<'a> {
    FrameInputs {
        title: "Qui suis-je ?",
        question,
        answer: "La Russie",
        show_answer,
        answer_size: 48.0,
        picture_aspect: aspect,
    }
}

#[test]
fn default_layout_places_title_box_picture_and_answer() {
    let cfg = LayoutConfig::default();
    let mut m = FixedAdvance::default();
    let layout = FrameLayout::compute(
        &cfg,
        &inputs("Qui suis je en Europe", true, Some(1.0)),
        &mut m,
    )
    .unwrap();

    let title = layout.title.as_ref().unwrap();
    assert!(approx(title.origin.x, 345.0));
    assert!(approx(title.origin.y, 50.0));

    assert_eq!(layout.question_lines.len(), 1);
    let line = &layout.question_lines[0];
    assert_eq!(line.text, "Qui suis je en Europe");
    assert!(approx(line.origin.x, 288.0));
    assert!(approx(line.origin.y, 152.0));

    let bx = layout.question_box.unwrap();
    assert!(approx(bx.x0, 30.0) && approx(bx.x1, 1050.0));
    assert!(approx(bx.y0, 132.0));
    assert!(approx(bx.y1, 229.6));

    let pic = layout.picture.unwrap();
    assert_eq!((pic.width, pic.height), (980, 980));
    assert_eq!(pic.x, 50);
    assert_eq!(pic.y, 358);

    let answer = layout.answer.as_ref().unwrap();
    assert!(approx(answer.origin.x, 432.0));
    assert!(approx(answer.origin.y, 1812.4));
    assert!(!layout.answer_clipped);
}

#[test]
fn tall_picture_is_downscaled_and_clears_the_answer() {
    let cfg = LayoutConfig::default();
    let mut m = FixedAdvance::default();
    let layout = FrameLayout::compute(
        &cfg,
        &inputs("Qui suis je en Europe", true, Some(0.5)),
        &mut m,
    )
    .unwrap();

    let pic = layout.picture.unwrap();
    assert_eq!((pic.width, pic.height), (683, 1366));
    assert_eq!(pic.x, 198);
    assert_eq!(pic.y, 396);

    let answer = layout.answer.unwrap();
    assert!(pic.rect().y1 + cfg.picture_bottom_gap <= answer.origin.y + 1e-9);
    // The 10% margin separates the picture from the question box.
    assert!(pic.rect().y0 - layout.question_box.unwrap().y1 >= cfg.space_after_text);
}

#[test]
fn hidden_answer_still_reserves_its_slot() {
    let cfg = LayoutConfig::default();
    let mut m = FixedAdvance::default();
    let shown = FrameLayout::compute(&cfg, &inputs("Qui suis", true, Some(0.5)), &mut m).unwrap();
    let hidden = FrameLayout::compute(&cfg, &inputs("Qui suis", false, Some(0.5)), &mut m).unwrap();
    assert!(hidden.answer.is_none());
    assert_eq!(shown.picture, hidden.picture);
}

#[test]
fn enlarged_answer_shrinks_the_picture_to_keep_the_gap() {
    let cfg = LayoutConfig::default();
    let mut m = FixedAdvance::default();
    let base = FrameLayout::compute(&cfg, &inputs("Qui suis je", true, Some(0.4)), &mut m).unwrap();
    let mut big_inputs = inputs("Qui suis je", true, Some(0.4));
    big_inputs.answer_size = 62.0;
    let big = FrameLayout::compute(&cfg, &big_inputs, &mut m).unwrap();

    let (a, b) = (base.answer.unwrap(), big.answer.unwrap());
    assert!(b.extent.width > a.extent.width);
    assert!(b.origin.y < a.origin.y);
    assert!(approx(b.rect().y1, a.rect().y1));

    let (pa, pb) = (base.picture.unwrap(), big.picture.unwrap());
    assert!(pb.height < pa.height);
    assert!(pa.rect().y1 + cfg.picture_bottom_gap <= a.origin.y + 1e-9);
    assert!(pb.rect().y1 + cfg.picture_bottom_gap <= b.origin.y + 1e-9);
}

#[test]
fn measurement_failure_is_propagated() {
    let cfg = LayoutConfig::default();
    let mut engine = crate::assets::store::TextLayoutEngine::new();
    let err = FrameLayout::compute(&cfg, &inputs("Qui", false, None), &mut engine).unwrap_err();
    assert!(matches!(err, crate::QuizError::Asset(_)), "{err}");
}

#[test]
fn long_question_wraps_inside_the_box() {
    let cfg = LayoutConfig::default();
    let mut m = FixedAdvance::default();
    let question = "Je suis le plus grand pays du monde et je m'étends sur deux continents différents";
    let layout = FrameLayout::compute(&cfg, &inputs(question, false, Some(1.0)), &mut m).unwrap();

    assert!(layout.question_lines.len() > 1);
    let bx = layout.question_box.unwrap();
    for pair in layout.question_lines.windows(2) {
        let gap = pair[1].origin.y - pair[0].rect().y1;
        assert!(approx(gap, cfg.line_spacing));
    }
    for line in &layout.question_lines {
        assert!(f64::from(line.extent.width) <= cfg.text_width());
        assert!(line.rect().x0 >= bx.x0 && line.rect().x1 <= bx.x1);
        assert!(line.rect().y0 >= bx.y0 && line.rect().y1 <= bx.y1);
    }
    let joined: Vec<_> = layout.question_lines.iter().map(|l| l.text.as_str()).collect();
    assert_eq!(joined.join(" "), question);
}

#[test]
fn no_room_means_no_picture() {
    let cfg = LayoutConfig {
        canvas: crate::Canvas {
            width: 400,
            height: 300,
        },
        ..LayoutConfig::default()
    };
    let mut m = FixedAdvance::default();
    let layout = FrameLayout::compute(&cfg, &inputs("Qui suis je", true, Some(1.0)), &mut m).unwrap();
    assert!(layout.picture.is_none());
}

#[test]
fn oversized_answer_is_flagged_as_clipped() {
    let cfg = LayoutConfig::default();
    let mut m = FixedAdvance::default();
    let mut i = inputs("Qui", true, None);
    i.answer = "La Fédération de Russie, le plus grand pays du monde";
    i.answer_size = 120.0;
    let layout = FrameLayout::compute(&cfg, &i, &mut m).unwrap();
    assert!(layout.answer_clipped);
    assert!(layout.picture.is_none());
}

#[test]
fn empty_title_is_skipped() {
    let cfg = LayoutConfig::default();
    let mut m = FixedAdvance::default();
    let mut i = inputs("Qui", false, None);
    i.title = "";
    let layout = FrameLayout::compute(&cfg, &i, &mut m).unwrap();
    assert!(layout.title.is_none());
    assert!(approx(layout.question_lines[0].origin.y, 80.0));
}
