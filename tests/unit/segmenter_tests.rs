/*!
 * Tests for segment chunking and cue timing
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use subcraft::segmenter::{assign_ids, ChunkPolicy, CueDraft, SegmentText, Segmenter};
use subcraft::transcript::TranscriptSegment;
use crate::common::assert_close;

fn original(segments: &[TranscriptSegment]) -> Vec<SegmentText> {
    segments.iter().map(|s| SegmentText::Original(s.text.clone())).collect()
}

#[test]
fn test_segment_withElevenWordsOverFourSeconds_shouldSplitIntoFiveFiveOne() {
    let segments = vec![TranscriptSegment::new(
        "this is a very long sentence with many words in it",
        0.0,
        4.0,
    )];

    let cues = Segmenter::default().segment(&segments, &original(&segments));

    assert_eq!(cues.len(), 3);
    assert_eq!(cues[0].text, "this is a very long");
    assert_eq!(cues[1].text, "sentence with many words in");
    assert_eq!(cues[2].text, "it");

    let per_word = 4.0 / 11.0;
    assert_close(cues[0].start, 0.0);
    assert_close(cues[0].end, 5.0 * per_word);
    assert_close(cues[1].start, 5.0 * per_word);
    assert_close(cues[1].end, 10.0 * per_word);
    assert_close(cues[2].start, 10.0 * per_word);
    assert!(cues[2].end <= 4.0);
    assert_close(cues[2].end, 4.0);

    let ids: Vec<&str> = cues.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[test]
fn test_segment_withSingleSlowWord_shouldEmitOneFullSpanCue() {
    let segments = vec![TranscriptSegment::new("Hi", 0.0, 2.0)];

    let cues = Segmenter::default().segment(&segments, &original(&segments));

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "Hi");
    assert_eq!(cues[0].start, 0.0);
    assert_eq!(cues[0].end, 2.0);
}

#[test]
fn test_segment_withShortModerateSegment_shouldKeepItWhole() {
    // 3 words in 1.5s is 120 wpm: default chunk of 3 covers the segment
    let segments = vec![TranscriptSegment::new("see you soon", 6.5, 8.0)];

    let cues = Segmenter::default().segment(&segments, &original(&segments));

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "see you soon");
    assert_eq!(cues[0].start, 6.5);
    assert_eq!(cues[0].end, 8.0);
}

#[test]
fn test_segment_withFastSpeech_shouldUseHalfWordCountChunks() {
    // 4 words in 1s is 240 wpm: chunk = clamp(2, 3, 5) = 3
    let segments = vec![TranscriptSegment::new("one two three four", 10.0, 11.0)];

    let cues = Segmenter::default().segment(&segments, &original(&segments));

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].text, "one two three");
    assert_eq!(cues[1].text, "four");
    assert_close(cues[0].end, 10.75);
    assert_close(cues[1].start, 10.75);
    assert_close(cues[1].end, 11.0);
}

#[test]
fn test_segment_withZeroDuration_shouldStillEmitCues() {
    let segments = vec![TranscriptSegment::new("frozen moment", 3.0, 3.0)];

    let cues = Segmenter::default().segment(&segments, &original(&segments));

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start, 3.0);
    assert_eq!(cues[0].end, 3.0);
}

#[test]
fn test_segment_withInvertedSpan_shouldClampEndToStart() {
    let segments = vec![TranscriptSegment::new("backwards", 5.0, 4.0)];

    let cues = Segmenter::default().segment(&segments, &original(&segments));

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].start, 5.0);
    assert_eq!(cues[0].end, 5.0);
}

#[test]
fn test_segment_withBlankTranslatedText_shouldSkipSegmentButKeepIdsDense() {
    let segments = vec![
        TranscriptSegment::new("first", 0.0, 1.0),
        TranscriptSegment::new("second", 1.0, 2.0),
        TranscriptSegment::new("third", 2.0, 3.0),
    ];
    let texts = vec![
        SegmentText::Translated("erste".to_string()),
        SegmentText::Translated("   ".to_string()),
        SegmentText::Translated("dritte".to_string()),
    ];

    let cues = Segmenter::default().segment(&segments, &texts);

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[0].id, "1");
    assert_eq!(cues[0].text, "erste");
    assert_eq!(cues[1].id, "2");
    assert_eq!(cues[1].text, "dritte");
    assert_eq!(cues[1].start, 2.0);
}

#[test]
fn test_segment_withMissingTexts_shouldFallBackToSegmentText() {
    let segments = vec![
        TranscriptSegment::new("alpha", 0.0, 1.0),
        TranscriptSegment::new("beta", 1.0, 2.0),
    ];
    let texts = vec![SegmentText::Degraded("alpha".to_string())];

    let cues = Segmenter::default().segment(&segments, &texts);

    assert_eq!(cues.len(), 2);
    assert_eq!(cues[1].text, "beta");
}

#[test]
fn test_segment_withTranslatedText_shouldChunkTranslationNotSource() {
    let segments = vec![TranscriptSegment::new("hello", 0.0, 3.0)];
    let texts = vec![SegmentText::Translated("नमस्ते दुनिया".to_string())];

    let cues = Segmenter::default().segment(&segments, &texts);

    assert_eq!(cues.len(), 1);
    assert_eq!(cues[0].text, "नमस्ते दुनिया");
}

#[test]
fn test_segment_withCustomPolicy_shouldHonourBounds() {
    let policy = ChunkPolicy {
        min_chunk_words: 2,
        max_chunk_words: 2,
        ..ChunkPolicy::default()
    };
    let segments = vec![TranscriptSegment::new("a b c d e f", 0.0, 6.0)];

    let cues = Segmenter::new(policy).segment(&segments, &original(&segments));

    assert_eq!(cues.len(), 3);
    assert!(cues.iter().all(|c| c.text.split_whitespace().count() == 2));
}

#[test]
fn test_assign_ids_withSeveralSegments_shouldNumberAcrossSegments() {
    let draft = |text: &str, start: f64| CueDraft {
        text: text.to_string(),
        start,
        end: start + 1.0,
    };
    let cues = assign_ids(vec![
        vec![draft("a", 0.0), draft("b", 1.0)],
        vec![],
        vec![draft("c", 2.0)],
    ]);

    let ids: Vec<&str> = cues.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
    assert_eq!(cues[2].text, "c");
}

#[test]
fn test_segment_withRandomTranscripts_shouldKeepCuesInsideTheirSegments() {
    let vocabulary = ["we", "are", "going", "to", "the", "market", "today", "and", "then", "home"];
    let mut rng = StdRng::seed_from_u64(7);
    let segmenter = Segmenter::default();

    for _ in 0..200 {
        let mut cursor = 0.0;
        let segments: Vec<TranscriptSegment> = (0..rng.random_range(1..6))
            .map(|_| {
                let gap: f64 = rng.random_range(0.0..1.0);
                let length: f64 = rng.random_range(0.0..8.0);
                let word_count = rng.random_range(1..16);
                let text = (0..word_count)
                    .map(|_| vocabulary[rng.random_range(0..vocabulary.len())])
                    .collect::<Vec<_>>()
                    .join(" ");
                let start = cursor + gap;
                cursor = start + length;
                TranscriptSegment::new(text, start, cursor)
            })
            .collect();

        let texts = original(&segments);
        let mut previous_end = f64::NEG_INFINITY;
        let mut expected_id = 1;

        for segment in &segments {
            let drafts = segmenter.chunk_segment(segment, &segment.text);
            let words: usize = drafts.iter().map(|d| d.text.split_whitespace().count()).sum();
            assert_eq!(words, segment.text.split_whitespace().count());

            for draft in &drafts {
                assert!(draft.start >= segment.start);
                assert!(draft.end <= segment.end);
                assert!(draft.start <= draft.end);
                assert!(draft.start >= previous_end - 1e-9);
                previous_end = draft.end;
            }
        }

        for cue in segmenter.segment(&segments, &texts) {
            assert_eq!(cue.id, expected_id.to_string());
            expected_id += 1;
        }
    }
}
