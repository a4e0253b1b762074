use super::*;
use serde_json::json;

fn minimal_job() -> serde_json::Value {
    json!({
        "title": "Qui suis-je ?",
        "question_path": "example.txt",
        "answer": "La Russie",
        "pictures": ["img1.png", "img2.png"],
        "audio": "audio.mp3"
    })
}

#[test]
fn minimal_job_fills_defaults() {
    let job: QuizJob = serde_json::from_value(minimal_job()).unwrap();
    job.validate().unwrap();

    assert_eq!(job.fps, 24);
    assert_eq!(job.out, PathBuf::from("output_video.mp4"));
    assert_eq!(job.style, QuizStyle::default());

    let layout = &job.style.layout;
    assert_eq!(layout.canvas.width, 1080);
    assert_eq!(layout.canvas.height, 1920);
    assert_eq!(layout.text_width(), 980.0);
    assert_eq!(layout.output_canvas().width, 1100);
    assert_eq!(layout.box_color, ColorDef::rgba(255, 255, 255, 180));

    let d = job.style.timing.durations().unwrap();
    assert_eq!(d.word, Millis(500));
    assert_eq!(d.pause, Millis(2000));
    assert_eq!(d.reveal_extra, Millis(3000));
    assert_eq!(d.blink, Millis(300));
    assert_eq!(job.style.timing.blink_increments, vec![10, 20, 30]);
    assert_eq!(job.style.timing.picture_cycle, 6);
}

#[test]
fn partial_style_overrides_merge_with_defaults() {
    let mut v = minimal_job();
    v["style"] = json!({
        "layout": { "border_width": 4, "gradient_end": "#102030", "gradient_direction": "horizontal" },
        "timing": { "blink_increments": [50] }
    });
    let job: QuizJob = serde_json::from_value(v).unwrap();
    job.validate().unwrap();

    assert_eq!(job.style.layout.border_width, 4);
    assert_eq!(job.style.layout.gradient_end, ColorDef::rgb(0x10, 0x20, 0x30));
    assert_eq!(
        job.style.layout.gradient_direction,
        GradientDirection::Horizontal
    );
    assert_eq!(job.style.layout.text_size, 48.0);
    assert_eq!(job.style.timing.blink_increments, vec![50]);
    assert_eq!(job.style.timing.word_secs, 0.5);
}

#[test]
fn unknown_fields_are_rejected() {
    let mut v = minimal_job();
    v["style"] = json!({ "layout": { "border_colour": "#000000" } });
    assert!(serde_json::from_value::<QuizJob>(v).is_err());
}

#[test]
fn validation_catches_bad_jobs() {
    let base: QuizJob = serde_json::from_value(minimal_job()).unwrap();

    let mut j = base.clone();
    j.pictures.clear();
    assert!(matches!(j.validate(), Err(QuizError::Validation(_))));

    let mut j = base.clone();
    j.question = Some("inline".to_string());
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.question_path = None;
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.answer = "  ".to_string();
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.fps = 0;
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.style.timing.picture_cycle = 0;
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.style.timing.word_secs = 0.0;
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.style.timing.pause_secs = -1.0;
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.style.layout.side_margin = 600.0;
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.style.layout.answer_size = 0.0;
    assert!(j.validate().is_err());

    let mut j = base.clone();
    j.style.layout.picture_margin_ratio = 1.0;
    assert!(j.validate().is_err());

    let mut j = base;
    j.style.layout.canvas.width = 1081;
    assert!(matches!(j.validate(), Err(QuizError::Validation(_))));
}

#[test]
fn font_roles_fall_back_to_text_font() {
    let fonts = FontPaths {
        text: PathBuf::from("body.ttf"),
        title: Some(PathBuf::from("title.ttf")),
        answer: None,
    };
    assert_eq!(fonts.for_role(FontRole::Title), Path::new("title.ttf"));
    assert_eq!(fonts.for_role(FontRole::Question), Path::new("body.ttf"));
    assert_eq!(fonts.for_role(FontRole::Answer), Path::new("body.ttf"));
}

#[test]
fn loaded_job_resolves_relative_paths_and_reads_question() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("example.txt"), "Qui suis je en Europe\n").unwrap();
    let job_path = dir.path().join("job.json");
    std::fs::write(&job_path, serde_json::to_vec(&minimal_job()).unwrap()).unwrap();

    let loaded = LoadedJob::from_path(&job_path).unwrap();
    assert_eq!(loaded.base_dir, dir.path());
    assert_eq!(
        loaded.resolve(Path::new("img1.png")),
        dir.path().join("img1.png")
    );
    let abs = dir.path().join("abs.png");
    assert_eq!(loaded.resolve(&abs), abs);
    assert_eq!(loaded.question_text().unwrap(), "Qui suis je en Europe\n");
}

#[test]
fn missing_question_file_is_an_asset_error() {
    let job: QuizJob = serde_json::from_value(minimal_job()).unwrap();
    let loaded = LoadedJob::new(job, "definitely/not/here");
    assert!(matches!(loaded.question_text(), Err(QuizError::Asset(_))));
}

#[test]
fn inline_question_skips_filesystem() {
    let mut v = minimal_job();
    v.as_object_mut().unwrap().remove("question_path");
    v["question"] = json!("Qui suis je");
    let job: QuizJob = serde_json::from_value(v).unwrap();
    job.validate().unwrap();
    let loaded = LoadedJob::new(job, ".");
    assert_eq!(loaded.question_text().unwrap(), "Qui suis je");
}

#[test]
fn malformed_job_file_is_a_validation_error() {
    let dir = tempfile::tempdir().unwrap();
    let job_path = dir.path().join("job.json");
    std::fs::write(&job_path, b"{ not json").unwrap();
    assert!(matches!(
        LoadedJob::from_path(&job_path),
        Err(QuizError::Validation(_))
    ));
}
