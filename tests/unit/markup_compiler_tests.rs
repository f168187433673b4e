/*!
 * Tests for ASS script compilation
 */

use subcraft::markup::{compile, MarkupCompiler, StyleSpec, VideoGeometry};
use subcraft::segmenter::CaptionCue;
use crate::common::sample_cues;

const PORTRAIT: VideoGeometry = VideoGeometry { width: 1080, height: 1920 };

fn style_line(script: &str) -> &str {
    script
        .lines()
        .find(|line| line.starts_with("Style: "))
        .expect("style line present")
}

#[test]
fn test_compile_withDefaultStyle_shouldProduceExactScript() {
    let cues = vec![CaptionCue::new("1", "Hello world", 0.0, 1.5)];

    let document = compile(&StyleSpec::default(), Some(PORTRAIT), &cues);

    let expected = concat!(
        "[Script Info]\n",
        "ScriptType: v4.00+\n",
        "PlayResX: 1080\n",
        "PlayResY: 1920\n",
        "WrapStyle: 0\n",
        "ScaledBorderAndShadow: yes\n",
        "\n",
        "[V4+ Styles]\n",
        "Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding\n",
        "Style: Default,Arial,72,&H00FFFFFF,&H00FFFFFF,&H80000000,&H80000000,0,0,0,0,100,100,0,0,1,3,2,2,10,10,288,1\n",
        "\n",
        "[Events]\n",
        "Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n",
        "Dialogue: 0,0:00:00.00,0:00:01.50,Default,,0,0,0,,{\\fnArial\\fs72\\1c&HFFFFFF&\\1a&H00&\\3c&H000000&\\3a&H80&\\4c&H000000&\\4a&H80&\\bord3\\shad2\\pos(540,1632)}Hello world\n",
    );

    assert_eq!(document.to_string(), expected);
}

#[test]
fn test_compile_withGreenText_shouldEmitGreenPrimaryColour() {
    let style = StyleSpec::builder().text_color("#00FF00").build();

    let script = compile(&style, Some(PORTRAIT), &sample_cues()).to_string();

    assert!(style_line(&script).contains(",&H0000FF00,&H0000FF00,"));
    assert!(script.contains("\\1c&H00FF00&\\1a&H00&"));
}

#[test]
fn test_compile_withPositionFifteen_shouldAnchorAtEightyFivePercent() {
    let script = compile(&StyleSpec::default(), Some(PORTRAIT), &sample_cues()).to_string();
    assert!(script.contains("\\pos(540,1632)"));
}

#[test]
fn test_compile_withBoxMode_shouldUseOpaqueBoxAndBackgroundColour() {
    let style = StyleSpec::builder()
        .has_background(true)
        .highlight_color("#112233")
        .background_opacity(0.8)
        .build();

    let script = compile(&style, Some(PORTRAIT), &sample_cues()).to_string();
    let line = style_line(&script);

    assert!(line.ends_with(",&H33332211,&H33332211,0,0,0,0,100,100,0,0,3,8,0,2,10,10,288,1"));
    assert!(script.contains("\\3c&H332211&\\3a&H33&\\4c&H332211&\\4a&H33&\\bord8\\shad0"));
}

#[test]
fn test_compile_withOutlineMode_shouldIgnoreHighlightColour() {
    let style = StyleSpec::builder()
        .has_background(false)
        .highlight_color("#FF00FF")
        .build();

    let script = compile(&style, Some(PORTRAIT), &sample_cues()).to_string();

    assert!(style_line(&script).contains(",&H80000000,&H80000000,0,0,0,0,100,100,0,0,1,3,2,"));
    assert!(!script.contains("FF00FF"));
}

#[test]
fn test_compile_withAnimation_shouldAppendPopIn() {
    let animated = StyleSpec::builder().has_animation(true).build();
    let pop_in = "\\t(0,150,\\fscx110\\fscy110)\\t(150,300,\\fscx100\\fscy100)}";

    let with = compile(&animated, Some(PORTRAIT), &sample_cues()).to_string();
    let without = compile(&StyleSpec::default(), Some(PORTRAIT), &sample_cues()).to_string();

    assert_eq!(with.matches(pop_in).count(), 2);
    assert!(!without.contains("\\fscx110"));
}

#[test]
fn test_compile_withLandscapeVideo_shouldScaleFromShortSide() {
    let style = StyleSpec::builder().font_size(20.0).position_y(50.0).build();

    let script = compile(&style, Some(VideoGeometry::new(1920, 1080)), &sample_cues()).to_string();

    // 20 * (1080 / 540) * 1.5 = 60
    assert!(script.contains("PlayResX: 1920\nPlayResY: 1080\n"));
    assert!(script.contains("\\fs60\\"));
    assert!(script.contains("\\pos(960,540)"));
    assert!(style_line(&script).ends_with(",2,10,10,540,1"));
}

#[test]
fn test_compile_withoutGeometry_shouldUsePortraitFallback() {
    let script = compile(&StyleSpec::default(), None, &sample_cues()).to_string();

    assert!(script.contains("PlayResX: 1080\n"));
    assert!(script.contains("PlayResY: 1920\n"));
}

#[test]
fn test_compile_withZeroSizedGeometry_shouldUseFallback() {
    let document = compile(&StyleSpec::default(), Some(VideoGeometry::new(0, 720)), &sample_cues());
    let fallback = compile(&StyleSpec::default(), None, &sample_cues());

    assert_eq!(document, fallback);
}

#[test]
fn test_compiler_withConfiguredFallback_shouldUseItForMissingGeometry() {
    let compiler = MarkupCompiler::with_fallback_geometry(VideoGeometry::new(720, 1280));

    let script = compiler.compile(&StyleSpec::default(), None, &sample_cues()).to_string();

    assert!(script.contains("PlayResX: 720\nPlayResY: 1280\n"));
}

#[test]
fn test_compile_withNoCues_shouldProduceHeaderOnly() {
    let document = compile(&StyleSpec::default(), Some(PORTRAIT), &[]);

    assert!(document.is_empty());
    assert_eq!(document.to_string(), document.header());
    assert!(document.to_string().ends_with("Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text\n"));
    assert!(!document.to_string().contains("Dialogue:"));
}

#[test]
fn test_compile_withSameInputsTwice_shouldBeByteIdentical() {
    let style = StyleSpec::builder()
        .font_family("Noto Sans")
        .has_background(true)
        .has_animation(true)
        .build();

    let first = compile(&style, Some(PORTRAIT), &sample_cues()).to_string();
    let second = compile(&style, Some(PORTRAIT), &sample_cues()).to_string();

    assert_eq!(first, second);
}

#[test]
fn test_compile_withCues_shouldKeepInputOrderAndTiming() {
    let cues = vec![
        CaptionCue::new("1", "later", 5.0, 6.0),
        CaptionCue::new("2", "earlier", 1.0, 2.0),
    ];

    let document = compile(&StyleSpec::default(), Some(PORTRAIT), &cues);

    assert_eq!(document.events().len(), 2);
    assert!(document.events()[0].starts_with("Dialogue: 0,0:00:05.00,0:00:06.00,Default,,0,0,0,,{"));
    assert!(document.events()[0].ends_with("}later"));
    assert!(document.events()[1].ends_with("}earlier"));
}

#[test]
fn test_compile_withHostileCueText_shouldStaySingleLine() {
    let cues = vec![
        CaptionCue::new("1", "{\\b1}bold|next\nline", 0.0, 1.0),
        CaptionCue::new("2", "C:\\New folder\\hello", 1.0, 2.0),
        CaptionCue::new("3", "soft\\nbreak\\hspace", 2.0, 3.0),
        CaptionCue::new("4", "windows\r\nline", 3.0, 4.0),
    ];

    let document = compile(&StyleSpec::default(), Some(PORTRAIT), &cues);
    let events = document.events();

    assert!(events[0].ends_with("}\\b1bold next line"));
    assert_eq!(events[0].matches('{').count(), 1);
    assert!(events[1].ends_with("}C:\\\u{2060}New folder\\\u{2060}hello"));
    assert!(events[2].ends_with("}soft\\\u{2060}nbreak\\\u{2060}hspace"));
    assert!(events[3].ends_with("}windows line"));
    for escape in ["\\N", "\\n", "\\h"] {
        assert!(events.iter().all(|e| !e.contains(escape)), "{} reached the renderer", escape);
    }
    assert_eq!(document.to_string().lines().filter(|l| l.starts_with("Dialogue:")).count(), 4);
}

#[test]
fn test_compile_withBraceOnlyCue_shouldSkipEmptyEvent() {
    let cues = vec![
        CaptionCue::new("1", "before", 0.0, 1.0),
        CaptionCue::new("2", "{}", 1.0, 2.0),
        CaptionCue::new("3", "| {\n}", 2.0, 3.0),
        CaptionCue::new("4", "after", 3.0, 4.0),
    ];

    let document = compile(&StyleSpec::default(), Some(PORTRAIT), &cues);

    assert_eq!(document.events().len(), 2);
    assert!(document.events()[0].ends_with("}before"));
    assert!(document.events()[1].ends_with("}after"));
    assert!(document.events().iter().all(|e| !e.ends_with('}')));
}

#[test]
fn test_compile_withLongTimestamps_shouldFormatHours() {
    let cues = vec![CaptionCue::new("1", "late", 3723.456, 3725.0)];

    let document = compile(&StyleSpec::default(), Some(PORTRAIT), &cues);

    assert!(document.events()[0].starts_with("Dialogue: 0,1:02:03.46,1:02:05.00,"));
}
